//! Debounced document search inside a collection sub-page.
//!
//! Every edit aborts the previous task and spawns a new one that sleeps for
//! the quiet period before listing. Outcomes come back over a channel tagged
//! with the generation that produced them; anything but the latest
//! generation is dropped, whatever order tasks finish in.

use crate::host::{Backend, ListRequest};
use crate::Result;
use cmdmenu_types::{CollectionSearch, Document, Item, ItemKind, MenuAction};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Maximum documents per listing
pub const PAGE_SIZE: usize = 10;

/// Result of one listing task
#[derive(Debug)]
pub struct SearchOutcome {
    pub generation: u64,
    pub result: Result<Vec<Document>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubSearchState {
    /// No sub-page active
    Idle,
    /// A request is scheduled or in flight
    Loading,
    /// Latest results applied, possibly empty
    Ready,
}

pub struct SubSearch<B: Backend> {
    backend: Arc<B>,
    debounce: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    state: SubSearchState,
    items: Vec<Item>,
    target: Option<CollectionSearch>,
    icon: Option<String>,
    outcome_tx: mpsc::UnboundedSender<SearchOutcome>,
}

impl<B: Backend> SubSearch<B> {
    pub fn new(
        backend: Arc<B>,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let search = Self {
            backend,
            debounce,
            generation: 0,
            pending: None,
            state: SubSearchState::Idle,
            items: Vec::new(),
            target: None,
            icon: None,
            outcome_tx,
        };
        (search, outcome_rx)
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn state(&self) -> SubSearchState {
        self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state == SubSearchState::Loading
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Restart the quiet period for `query` on `target`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, target: &CollectionSearch, query: &str, icon: Option<String>) {
        self.cancel_pending();
        self.generation += 1;
        self.state = SubSearchState::Loading;
        self.target = Some(target.clone());
        self.icon = icon;

        let request = ListRequest {
            slug: target.slug.clone(),
            title_field: target.title_field.clone(),
            filter: (!query.trim().is_empty()).then(|| query.to_string()),
            limit: PAGE_SIZE,
        };
        let generation = self.generation;
        let backend = Arc::clone(&self.backend);
        let outcome_tx = self.outcome_tx.clone();
        let debounce = self.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            debug!(
                "Sub-search gen {} for '{}' query={:?}",
                generation, request.slug, request.filter
            );
            let result = backend.list_documents(request).await;
            let _ = outcome_tx.send(SearchOutcome { generation, result });
        }));
    }

    /// Apply a finished listing. Returns false for stale outcomes.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.generation != self.generation || self.state != SubSearchState::Loading {
            debug!(
                "Discarding stale sub-search outcome (gen {}, current {})",
                outcome.generation, self.generation
            );
            return false;
        }

        self.pending = None;
        self.state = SubSearchState::Ready;
        self.items = match (outcome.result, &self.target) {
            (Ok(docs), Some(target)) => docs
                .iter()
                .map(|doc| document_item(target, doc, self.icon.as_deref()))
                .collect(),
            (Ok(_), None) => Vec::new(),
            (Err(e), _) => {
                warn!("Sub-search listing failed: {}", e);
                Vec::new()
            }
        };
        true
    }

    /// Cancel timers and in-flight requests and drop all results.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.generation += 1;
        self.state = SubSearchState::Idle;
        self.items.clear();
        self.target = None;
        self.icon = None;
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<B: Backend> Drop for SubSearch<B> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Map a listed document to a transient palette item.
#[must_use]
pub fn document_item(target: &CollectionSearch, doc: &Document, icon: Option<&str>) -> Item {
    let label = doc
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(&doc.id)
        .to_string();

    Item {
        slug: format!("{}-{}", target.slug, doc.id),
        kind: ItemKind::Custom,
        label,
        action: MenuAction::navigate(format!("/admin/collections/{}/{}", target.slug, doc.id)),
        title_field: None,
        title_field_label: None,
        icon: icon.map(str::to_string),
    }
}
