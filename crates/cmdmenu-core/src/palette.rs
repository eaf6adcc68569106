//! The palette engine.
//!
//! [`Palette`] owns every piece of UI state: visibility, the current page,
//! the built menu, the highlighted entry and the sub-search. Front ends feed
//! it [`PaletteEvent`]s and render the [`PaletteUpdate`]s it sends back.

use crate::config::PluginConfig;
use crate::dispatch::{self, Dispatch, DispatchContext, Hotkeys, Platform, SearchButton};
use crate::host::{Backend, InvokeRequest};
use crate::menu::{self, Menu, MenuFilter};
use crate::navigation::Navigator;
use crate::subsearch::{SearchOutcome, SubSearch};
use crate::Result;
use cmdmenu_types::{
    Item, KeyPress, MenuAction, Page, PaletteEvent, PaletteUpdate, SourceConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// Command palette engine
pub struct Palette<B: Backend> {
    backend: Arc<B>,
    source: SourceConfig,
    config: PluginConfig,
    locale: String,
    hotkeys: Hotkeys,

    /// Menu as built from source and config
    menu: Menu,

    /// `menu` narrowed by the main-page query
    visible: Menu,
    filter: MenuFilter,

    navigator: Navigator,
    search: SubSearch<B>,
    outcome_rx: UnboundedReceiver<SearchOutcome>,

    open: bool,
    selected: usize,

    /// Channel to send updates to the render surface
    update_tx: UnboundedSender<PaletteUpdate>,
}

/// What woke the run loop
enum Wake {
    Event(PaletteEvent),
    Outcome(SearchOutcome),
}

impl<B: Backend> Palette<B> {
    /// Create a palette and the receiver for its updates.
    pub fn new(
        backend: Arc<B>,
        source: SourceConfig,
        config: PluginConfig,
        locale: &str,
    ) -> (Self, UnboundedReceiver<PaletteUpdate>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let debounce = Duration::from_millis(config.submenu.debounce_ms);
        let (search, outcome_rx) = SubSearch::new(Arc::clone(&backend), debounce);
        let menu = menu::build(&source, locale, &config);

        let palette = Self {
            backend,
            hotkeys: Hotkeys::from_setting(&config.shortcut),
            visible: menu.clone(),
            menu,
            source,
            config,
            locale: locale.to_string(),
            filter: MenuFilter::new(),
            navigator: Navigator::new(),
            search,
            outcome_rx,
            open: false,
            selected: 0,
            update_tx,
        };
        (palette, update_rx)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        self.navigator.page()
    }

    #[must_use]
    pub fn query(&self) -> &str {
        self.navigator.query()
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Main-page menu, filtered by the current query
    #[must_use]
    pub fn menu(&self) -> &Menu {
        &self.visible
    }

    /// Documents shown on the current sub-page
    #[must_use]
    pub fn sub_items(&self) -> &[Item] {
        self.search.items()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.search.is_loading()
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn search_button(&self, platform: Platform) -> Option<SearchButton> {
        SearchButton::from_config(&self.config, platform)
    }

    /// Number of selectable entries on the current page.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        if self.page().is_main() {
            self.visible.len()
        } else {
            self.search.items().len()
        }
    }

    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&Item> {
        if self.page().is_main() {
            self.visible.entries().nth(index)
        } else {
            self.search.items().get(index)
        }
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<&Item> {
        self.entry(self.selected)
    }

    /// Process an event - updates are sent via channel
    pub fn process(&mut self, event: PaletteEvent) {
        match event {
            PaletteEvent::Open => self.open_overlay(),
            PaletteEvent::Close => self.close_overlay(),
            PaletteEvent::Toggle => self.toggle(),
            PaletteEvent::QueryChanged { query } => self.handle_query_changed(&query),
            PaletteEvent::SelectionChanged { index } => self.select(index),
            PaletteEvent::KeyPressed { key } => {
                self.handle_key(&key);
            }
            PaletteEvent::ItemActivated { index } => {
                if !self.open {
                    return;
                }
                self.select(index);
                self.activate_highlighted();
            }
            PaletteEvent::Back => self.back(),
        }
    }

    /// Drive the palette until the event channel closes.
    pub async fn run(&mut self, mut events: UnboundedReceiver<PaletteEvent>) {
        info!("Palette running");
        loop {
            let wake = tokio::select! {
                event = events.recv() => match event {
                    Some(event) => Wake::Event(event),
                    None => break,
                },
                Some(outcome) = self.outcome_rx.recv() => Wake::Outcome(outcome),
            };

            match wake {
                Wake::Event(event) => self.process(event),
                Wake::Outcome(outcome) => self.apply_search_outcome(outcome),
            }
        }
        debug!("Event channel closed, palette stopped");
    }

    /// Wait for the next sub-search outcome without applying it.
    pub async fn next_search_outcome(&mut self) -> Option<SearchOutcome> {
        self.outcome_rx.recv().await
    }

    /// Apply a sub-search outcome; stale ones are dropped.
    pub fn apply_search_outcome(&mut self, outcome: SearchOutcome) {
        if !self.search.apply(outcome) {
            return;
        }
        self.send_sub_results();
        self.reset_selection();
        self.send_footer();
    }

    /// Wait for the next outcome and apply it.
    pub async fn settle(&mut self) {
        if let Some(outcome) = self.next_search_outcome().await {
            self.apply_search_outcome(outcome);
        }
    }

    pub fn set_locale(&mut self, locale: &str) {
        if self.locale == locale {
            return;
        }
        debug!("Locale changed to '{}'", locale);
        self.locale = locale.to_string();
        self.rebuild();
    }

    pub fn set_source(&mut self, source: SourceConfig) {
        self.source = source;
        self.rebuild();
    }

    pub fn set_config(&mut self, config: PluginConfig) {
        self.hotkeys = Hotkeys::from_setting(&config.shortcut);
        self.search
            .set_debounce(Duration::from_millis(config.submenu.debounce_ms));
        self.config = config;

        if self.config.disabled {
            self.close_overlay();
        } else if !self.config.submenu.enabled {
            self.back();
        }
        self.rebuild();
    }

    /// Resolve a key press and carry it out. Returns the decision so hosts
    /// know whether the key was consumed.
    pub fn handle_key(&mut self, press: &KeyPress) -> Dispatch {
        let decision = dispatch::resolve(
            &self.hotkeys,
            press,
            &DispatchContext {
                open: self.open,
                page: self.navigator.page(),
                highlighted: self.highlighted(),
                submenu: &self.config.submenu,
            },
        );

        match decision {
            Dispatch::ToggleOverlay => self.toggle(),
            Dispatch::Back => self.back(),
            Dispatch::OpenSubmenu => {
                if let Some(item) = self.highlighted().cloned()
                    && let Err(e) = self.open_submenu(&item)
                {
                    warn!("Cannot open sub-search: {}", e);
                }
            }
            Dispatch::Execute => self.activate_highlighted(),
            Dispatch::MoveSelection(delta) => self.move_selection(delta),
            Dispatch::Unhandled => {}
        }
        decision
    }

    /// Enter the sub-search of a collection item and start the initial listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is illegal for the current page or
    /// item. State is left untouched.
    pub fn open_submenu(&mut self, item: &Item) -> Result<()> {
        let target = self.navigator.open_submenu(item)?;
        self.search.reset();
        let icon = self
            .config
            .document_icon(&target.slug)
            .map(str::to_string)
            .or_else(|| item.icon.clone());
        self.search.schedule(&target, "", icon);

        self.send_update(PaletteUpdate::Page {
            page: self.navigator.page().clone(),
        });
        self.send_sub_results();
        self.reset_selection();
        self.send_footer();
        Ok(())
    }

    /// Back to the main page; no-op on the main page.
    pub fn back(&mut self) {
        if !self.navigator.back() {
            return;
        }
        self.search.reset();
        self.visible = self.menu.clone();

        self.send_update(PaletteUpdate::Page { page: Page::Main });
        self.send_menu();
        self.reset_selection();
        self.send_footer();
    }

    /// Highlight `index`, clamped to the current entries.
    pub fn select(&mut self, index: usize) {
        let clamped = index.min(self.entry_count().saturating_sub(1));
        if clamped == self.selected {
            return;
        }
        self.selected = clamped;
        self.send_update(PaletteUpdate::Selection { index: clamped });
        self.send_footer();
    }

    /// Move the highlight back to the first entry after the list changed.
    fn reset_selection(&mut self) {
        if std::mem::replace(&mut self.selected, 0) != 0 {
            self.send_update(PaletteUpdate::Selection { index: 0 });
        }
    }

    fn move_selection(&mut self, delta: isize) {
        self.select(self.selected.saturating_add_signed(delta));
    }

    fn toggle(&mut self) {
        if self.open {
            self.close_overlay();
        } else {
            self.open_overlay();
        }
    }

    fn open_overlay(&mut self) {
        if self.config.disabled {
            debug!("Palette disabled, ignoring open");
            return;
        }
        if self.open {
            return;
        }

        debug!("Opening palette");
        self.open = true;
        self.send_update(PaletteUpdate::Visibility { open: true });
        self.send_update(PaletteUpdate::Page {
            page: self.navigator.page().clone(),
        });
        self.send_menu();
        self.send_footer();
    }

    /// Hide the overlay and return to a clean main page.
    fn close_overlay(&mut self) {
        self.search.reset();
        self.navigator.close();
        self.selected = 0;
        self.visible = self.menu.clone();

        if self.open {
            debug!("Closing palette");
            self.open = false;
            self.send_update(PaletteUpdate::Visibility { open: false });
            self.send_update(PaletteUpdate::Page { page: Page::Main });
        }
    }

    fn handle_query_changed(&mut self, query: &str) {
        if !self.open || !self.navigator.set_query(query) {
            return;
        }

        match self.navigator.page().clone() {
            Page::Main => {
                self.visible = self.filter.filter(&self.menu, query);
                self.send_menu();
                self.reset_selection();
            }
            Page::CollectionSearch(target) => {
                let icon = self.config.document_icon(&target.slug).map(str::to_string);
                self.search.schedule(&target, query, icon);
                self.send_sub_results();
            }
        }
        self.send_footer();
    }

    fn activate_highlighted(&mut self) {
        if let Some(item) = self.highlighted().cloned() {
            self.execute(&item);
        }
    }

    /// Run an item's action, then close the overlay.
    pub fn execute(&mut self, item: &Item) {
        debug!("Executing '{}'", item.slug);
        match &item.action {
            MenuAction::Navigate { path } => {
                self.send_update(PaletteUpdate::Navigate { path: path.clone() });
            }
            MenuAction::Invoke {
                endpoint,
                method,
                body,
            } => {
                let request = InvokeRequest {
                    endpoint: endpoint.clone(),
                    method: *method,
                    body: body.clone(),
                };
                let backend = Arc::clone(&self.backend);
                tokio::spawn(async move {
                    let endpoint = request.endpoint.clone();
                    if let Err(e) = backend.invoke(request).await {
                        warn!("Invoke {} failed: {}", endpoint, e);
                    }
                });
            }
        }
        self.close_overlay();
    }

    fn rebuild(&mut self) {
        self.menu = menu::build(&self.source, &self.locale, &self.config);

        if !self.page().is_main() {
            self.visible = self.menu.clone();
            let slug = self.page().collection_search().map(|c| c.slug.clone());
            if let Some(item) = slug.and_then(|slug| self.menu.entries().find(|i| i.slug == slug))
                && self.navigator.refresh(item)
                && self.open
            {
                self.send_update(PaletteUpdate::Page {
                    page: self.navigator.page().clone(),
                });
            }
            return;
        }

        self.visible = self.filter.filter(&self.menu, self.navigator.query());
        let clamped = self.selected.min(self.entry_count().saturating_sub(1));
        if self.open {
            self.send_menu();
        }
        if clamped != self.selected {
            self.selected = clamped;
            if self.open {
                self.send_update(PaletteUpdate::Selection { index: clamped });
            }
        }
        if self.open {
            self.send_footer();
        }
    }

    fn send_menu(&self) {
        self.send_update(self.visible.to_update());
    }

    fn send_sub_results(&self) {
        self.send_update(PaletteUpdate::SubResults {
            items: self.search.items().to_vec(),
            loading: self.search.is_loading(),
        });
    }

    fn send_footer(&self) {
        if !self.open {
            return;
        }
        let hints = dispatch::footer_hints(
            self.navigator.page(),
            self.highlighted(),
            &self.config.submenu,
        );
        self.send_update(PaletteUpdate::Footer { hints });
    }

    /// Send an update to the render surface
    fn send_update(&self, update: PaletteUpdate) {
        if let Err(e) = self.update_tx.send(update) {
            error!("Failed to send update: {}", e);
        }
    }
}
