//! Navigation state machine: the main page and per-collection sub-pages.

use crate::{Error, Result};
use cmdmenu_types::{CollectionSearch, Item, Page};
use tracing::debug;

/// Title field used when a collection declares none
pub const DEFAULT_TITLE_FIELD: &str = "id";

/// Current page plus the query typed on it.
///
/// The query belongs to the page: every transition clears it.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    page: Page,
    query: String,
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the query text. Returns false when it did not change.
    pub fn set_query(&mut self, query: &str) -> bool {
        if self.query == query {
            return false;
        }
        query.clone_into(&mut self.query);
        true
    }

    /// Enter the search sub-page of a collection item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalTransition`] when not on the main page or when
    /// `item` is not collection-backed. State is left untouched.
    pub fn open_submenu(&mut self, item: &Item) -> Result<CollectionSearch> {
        if !self.page.is_main() {
            return Err(Error::IllegalTransition(format!(
                "sub-search for '{}' requested outside the main page",
                item.slug
            )));
        }
        let params = search_target(item)?;

        debug!("Opening sub-search for '{}'", item.slug);
        self.query.clear();
        self.page = Page::CollectionSearch(params.clone());
        Ok(params)
    }

    /// Return to the main page. Returns false when already there.
    pub fn back(&mut self) -> bool {
        if self.page.is_main() {
            return false;
        }
        debug!("Returning to main page");
        self.page = Page::Main;
        self.query.clear();
        true
    }

    /// Re-resolve the current sub-page from a rebuilt menu entry, keeping the
    /// query. Returns false when `item` is not the collection being searched
    /// or nothing changed.
    pub fn refresh(&mut self, item: &Item) -> bool {
        let Page::CollectionSearch(current) = &self.page else {
            return false;
        };
        if current.slug != item.slug {
            return false;
        }
        match search_target(item) {
            Ok(params) if params != *current => {
                self.page = Page::CollectionSearch(params);
                true
            }
            _ => false,
        }
    }

    /// Force the main page and clear the query.
    pub fn close(&mut self) {
        self.page = Page::Main;
        self.query.clear();
    }
}

/// Sub-page parameters for a collection item. The title field defaults to
/// `id` and its label to the field name.
///
/// # Errors
///
/// Returns [`Error::IllegalTransition`] when `item` is not collection-backed.
pub fn search_target(item: &Item) -> Result<CollectionSearch> {
    if !item.is_collection() {
        return Err(Error::IllegalTransition(format!(
            "'{}' is not a collection",
            item.slug
        )));
    }

    let title_field = item
        .title_field
        .clone()
        .unwrap_or_else(|| DEFAULT_TITLE_FIELD.to_string());
    let title_field_label = item
        .title_field_label
        .clone()
        .unwrap_or_else(|| title_field.clone());

    Ok(CollectionSearch {
        slug: item.slug.clone(),
        label: item.label.clone(),
        title_field,
        title_field_label,
    })
}
