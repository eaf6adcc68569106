//! Shared types for the cmdmenu command palette.
//!
//! This crate provides the data model used by cmdmenu-core and front-ends:
//! host source descriptors, plugin custom entries, resolved menu items and
//! groups, the navigation page, and the event/update messages exchanged with
//! the render surface. All types are serializable.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Deserialize a Vec that may be null or missing (both become empty vec)
fn deserialize_null_as_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

// ============================================================================
// Localized strings
// ============================================================================

/// A display value that is either a literal or a locale-keyed mapping.
///
/// Deserialization never fails: anything that is neither a string nor an
/// object (label functions exported as placeholders, numbers, `false`, null)
/// becomes an empty mapping. Non-string entries inside a mapping are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocalizedString {
    Literal(String),
    Localized(BTreeMap<String, String>),
}

impl LocalizedString {
    /// Entry for `locale`. Literals ignore the locale.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Localized(map) => map.get(locale).map(String::as_str),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Literal(s) => s.is_empty(),
            Self::Localized(map) => map.is_empty(),
        }
    }
}

impl Default for LocalizedString {
    fn default() -> Self {
        Self::Localized(BTreeMap::new())
    }
}

impl From<&str> for LocalizedString {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<String> for LocalizedString {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for LocalizedString {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self::Localized(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl From<Value> for LocalizedString {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Literal(s),
            Value::Object(obj) => Self::Localized(
                obj.into_iter()
                    .filter_map(|(k, v)| match v {
                        Value::String(s) => Some((k, s)),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => Self::default(),
        }
    }
}

impl<'de> Deserialize<'de> for LocalizedString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// Actions
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens when an item is executed.
///
/// Wire format keeps the plugin config shape: `{"type": "link", "href": ...}`
/// and `{"type": "api", "href": ..., "method": ..., "body": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MenuAction {
    /// Route the host admin to a path
    #[serde(rename = "link")]
    Navigate {
        #[serde(rename = "href")]
        path: String,
    },

    /// Fire a remote call; never awaited by the UI
    #[serde(rename = "api")]
    Invoke {
        #[serde(rename = "href")]
        endpoint: String,
        #[serde(default)]
        method: HttpMethod,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<serde_json::Map<String, Value>>,
    },
}

impl MenuAction {
    #[must_use]
    pub fn navigate(path: impl Into<String>) -> Self {
        Self::Navigate { path: path.into() }
    }

    #[must_use]
    pub fn is_navigate(&self) -> bool {
        matches!(self, Self::Navigate { .. })
    }
}

// ============================================================================
// Menu items
// ============================================================================

/// Which host entity a navigation target points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavBacking {
    Collection,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Derived from a host collection or global
    NavTarget(NavBacking),
    /// Custom entry whose action is a remote call
    RemoteTarget,
    /// Custom entry or sub-search document
    Custom,
}

/// A single actionable palette entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub slug: String,
    pub kind: ItemKind,
    pub label: String,
    pub action: MenuAction,

    /// Document field used as title in the collection sub-search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_field: Option<String>,

    /// Display label of `title_field`, used for the sub-search placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_field_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Item {
    /// Create a custom item; invoke actions make it a remote target.
    #[must_use]
    pub fn custom(slug: impl Into<String>, label: impl Into<String>, action: MenuAction) -> Self {
        let kind = if action.is_navigate() {
            ItemKind::Custom
        } else {
            ItemKind::RemoteTarget
        };
        Self {
            slug: slug.into(),
            kind,
            label: label.into(),
            action,
            title_field: None,
            title_field_label: None,
            icon: None,
        }
    }

    /// True for navigation targets backed by a collection (sub-search capable)
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.kind == ItemKind::NavTarget(NavBacking::Collection)
    }
}

/// A titled set of items rendered together. The title is the merge key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub items: Vec<Item>,
}

impl Group {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Parameters of the per-collection search sub-page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSearch {
    pub slug: String,
    pub label: String,
    pub title_field: String,
    pub title_field_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Page {
    #[default]
    Main,
    CollectionSearch(CollectionSearch),
}

impl Page {
    #[must_use]
    pub fn is_main(&self) -> bool {
        matches!(self, Self::Main)
    }

    #[must_use]
    pub fn collection_search(&self) -> Option<&CollectionSearch> {
        match self {
            Self::Main => None,
            Self::CollectionSearch(params) => Some(params),
        }
    }
}

// ============================================================================
// Host source descriptors
// ============================================================================

/// Statically declared host entities the menu is derived from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub collections: Vec<CollectionDescriptor>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub globals: Vec<GlobalDescriptor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOptions {
    /// Sidebar group; `false` in the host config means "no group"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<LocalizedString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_as_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionLabels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singular: Option<LocalizedString>,
}

/// A collection field; layout fields have no name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LocalizedString>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    pub slug: String,
    #[serde(default)]
    pub admin: AdminOptions,
    #[serde(default)]
    pub labels: CollectionLabels,
    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub fields: Vec<FieldDescriptor>,
}

impl CollectionDescriptor {
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalDescriptor {
    pub slug: String,
    #[serde(default)]
    pub admin: AdminOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LocalizedString>,
}

impl GlobalDescriptor {
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Custom entries (plugin config)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomItem {
    pub slug: String,
    #[serde(default)]
    pub label: LocalizedString,
    pub action: MenuAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Custom group; merged with any group resolving to the same title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGroup {
    #[serde(default)]
    pub title: LocalizedString,
    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub items: Vec<CustomItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomEntry {
    Group(CustomGroup),
    Item(CustomItem),
}

// ============================================================================
// Remote documents
// ============================================================================

/// A document returned by the collection listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

// ============================================================================
// Keys
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Escape,
    Up,
    Down,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        meta: false,
        shift: true,
        alt: false,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyPress {
    #[must_use]
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    #[must_use]
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

// ============================================================================
// Footer hints
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintAction {
    Navigate,
    SearchIn,
    Execute,
    Select,
    Open,
}

/// A `keys -> action` pair shown in the palette footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterHint {
    pub keys: String,
    pub action: HintAction,
}

impl FooterHint {
    #[must_use]
    pub fn new(keys: &str, action: HintAction) -> Self {
        Self {
            keys: keys.to_string(),
            action,
        }
    }
}

// ============================================================================
// Events and updates
// ============================================================================

/// Events sent from the render surface to the palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaletteEvent {
    Open,
    Close,
    Toggle,

    /// Input text changed
    QueryChanged { query: String },

    /// Highlight moved in the list component
    SelectionChanged { index: usize },

    KeyPressed { key: KeyPress },

    /// Item clicked
    ItemActivated { index: usize },

    /// Back button in the sub-page header
    Back,
}

/// Updates sent from the palette to the render surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaletteUpdate {
    Visibility {
        open: bool,
    },

    Page {
        page: Page,
    },

    /// Main page content, already filtered by the current query
    Menu {
        groups: Vec<Group>,
        items: Vec<Item>,
    },

    /// Sub-page content; `loading` and empty `items` are distinct states
    SubResults {
        items: Vec<Item>,
        loading: bool,
    },

    /// Highlighted entry moved (keyboard or list component)
    Selection {
        index: usize,
    },

    /// Host router should move to `path`
    Navigate {
        path: String,
    },

    Footer {
        hints: Vec<FooterHint>,
    },
}
