use crate::Result;
use cmdmenu_types::{CustomEntry, SourceConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Plugin configuration, as passed by the host alongside its own config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Custom groups and stray items appended after collections and globals
    #[serde(default)]
    pub custom_items: Vec<CustomEntry>,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slugs_to_ignore: Option<SlugsToIgnore>,

    #[serde(default)]
    pub submenu: SubmenuConfig,

    /// Icon names for menu entries
    #[serde(default)]
    pub icons: IconConfig,

    /// Global hotkey(s) toggling the overlay
    #[serde(default)]
    pub shortcut: ShortcutSetting,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_button: Option<SearchButtonConfig>,
}

impl PluginConfig {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Icon for documents listed in a collection's sub-search. Falls back
    /// to the collection's own menu icon.
    #[must_use]
    pub fn document_icon(&self, slug: &str) -> Option<&str> {
        self.submenu
            .icons
            .get(slug)
            .map(String::as_str)
            .or_else(|| self.icons.collection(slug))
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Load the host's collection/global descriptors.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains invalid JSON.
pub fn load_source(path: &Path) -> Result<SourceConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Menu icon names, either scoped per entity kind
/// (`{"collections": {..}, "globals": {..}}`) or one flat slug map shared by
/// collections and globals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconConfig {
    Scoped(ScopedIcons),
    Flat(HashMap<String, String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopedIcons {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub collections: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub globals: HashMap<String, String>,
}

impl IconConfig {
    #[must_use]
    pub fn collection(&self, slug: &str) -> Option<&str> {
        match self {
            Self::Scoped(scoped) => scoped.collections.get(slug),
            Self::Flat(map) => map.get(slug),
        }
        .map(String::as_str)
    }

    #[must_use]
    pub fn global(&self, slug: &str) -> Option<&str> {
        match self {
            Self::Scoped(scoped) => scoped.globals.get(slug),
            Self::Flat(map) => map.get(slug),
        }
        .map(String::as_str)
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self::Flat(HashMap::new())
    }
}

/// Either a plain list appended to the defaults, or an object that may
/// replace them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlugsToIgnore {
    List(Vec<String>),
    Options {
        #[serde(rename = "ignoreList")]
        ignore_list: Vec<String>,
        #[serde(default, rename = "replaceDefaults")]
        replace_defaults: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmenuConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub shortcut: SubmenuShortcut,

    /// Quiet period before a sub-search request is issued
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Icon per collection slug for documents listed in its sub-search
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub icons: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}
fn default_debounce() -> u64 {
    300
}

impl Default for SubmenuConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shortcut: SubmenuShortcut::default(),
            debounce_ms: default_debounce(),
            icons: HashMap::new(),
        }
    }
}

/// Which confirm variant opens the collection sub-search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmenuShortcut {
    /// Enter opens the sub-search, Shift+Enter navigates
    #[serde(rename = "enter")]
    Enter,

    /// Shift+Enter opens the sub-search, Enter navigates
    #[default]
    #[serde(rename = "shift+enter")]
    ShiftEnter,
}

impl SubmenuShortcut {
    #[must_use]
    pub fn opens_submenu(self, shift: bool) -> bool {
        match self {
            Self::Enter => !shift,
            Self::ShiftEnter => shift,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShortcutSetting {
    One(String),
    Many(Vec<String>),
}

impl ShortcutSetting {
    #[must_use]
    pub fn combos(&self) -> Vec<&str> {
        match self {
            Self::One(s) => vec![s.as_str()],
            Self::Many(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

impl Default for ShortcutSetting {
    fn default() -> Self {
        Self::Many(vec!["meta+k".to_string(), "ctrl+k".to_string()])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonPosition {
    /// Navigation rail: icon and keycaps only
    Nav,
    /// Actions row: icon, placeholder text and keycaps
    #[default]
    Actions,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchButtonConfig {
    #[serde(default)]
    pub position: ButtonPosition,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = PluginConfig::default();
        assert!(!config.disabled);
        assert!(config.custom_items.is_empty());
        assert!(config.slugs_to_ignore.is_none());
        assert!(config.submenu.enabled);
        assert_eq!(config.submenu.shortcut, SubmenuShortcut::ShiftEnter);
        assert_eq!(config.submenu.debounce_ms, 300);
        assert_eq!(config.shortcut.combos(), vec!["meta+k", "ctrl+k"]);
        assert!(config.search_button.is_none());
    }

    #[test]
    fn test_config_load_nonexistent_returns_default() {
        let path = std::path::Path::new("/nonexistent/path/config.json");
        let config = PluginConfig::load(path).unwrap();
        assert!(config.submenu.enabled);
    }

    #[test]
    fn test_config_load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"disabled": true, "submenu": {{"shortcut": "enter"}}}}"#
        )
        .unwrap();

        let config = PluginConfig::load(file.path()).unwrap();
        assert!(config.disabled);
        assert_eq!(config.submenu.shortcut, SubmenuShortcut::Enter);
        assert!(config.submenu.enabled);
    }

    #[test]
    fn test_config_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{invalid json}}").unwrap();

        assert!(PluginConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let mut config = PluginConfig::default();
        config.submenu.debounce_ms = 120;
        config.icons = IconConfig::Flat(HashMap::from([(
            "posts".to_string(),
            "newspaper".to_string(),
        )]));

        let file = NamedTempFile::new().unwrap();
        config.save(file.path()).unwrap();

        let loaded = PluginConfig::load(file.path()).unwrap();
        assert_eq!(loaded.submenu.debounce_ms, 120);
        assert_eq!(loaded.icons.collection("posts"), Some("newspaper"));
    }

    #[test]
    fn test_slugs_to_ignore_list() {
        let json = r#"{"slugsToIgnore": ["users", "media"]}"#;
        let config: PluginConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.slugs_to_ignore,
            Some(SlugsToIgnore::List(vec![
                "users".to_string(),
                "media".to_string()
            ]))
        );
    }

    #[test]
    fn test_slugs_to_ignore_options() {
        let json = r#"{"slugsToIgnore": {"ignoreList": ["users"], "replaceDefaults": true}}"#;
        let config: PluginConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.slugs_to_ignore,
            Some(SlugsToIgnore::Options {
                ignore_list: vec!["users".to_string()],
                replace_defaults: true,
            })
        );
    }

    #[test]
    fn test_slugs_to_ignore_options_without_replace() {
        let json = r#"{"slugsToIgnore": {"ignoreList": []}}"#;
        let config: PluginConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(
            config.slugs_to_ignore,
            Some(SlugsToIgnore::Options {
                replace_defaults: false,
                ..
            })
        ));
    }

    #[test]
    fn test_shortcut_single_string() {
        let json = r#"{"shortcut": "ctrl+shift+k"}"#;
        let config: PluginConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.shortcut.combos(), vec!["ctrl+shift+k"]);
    }

    #[test]
    fn test_submenu_policy() {
        assert!(SubmenuShortcut::ShiftEnter.opens_submenu(true));
        assert!(!SubmenuShortcut::ShiftEnter.opens_submenu(false));
        assert!(SubmenuShortcut::Enter.opens_submenu(false));
        assert!(!SubmenuShortcut::Enter.opens_submenu(true));
    }

    #[test]
    fn test_unknown_submenu_shortcut_rejected() {
        let json = r#"{"submenu": {"shortcut": "alt+enter"}}"#;
        assert!(serde_json::from_str::<PluginConfig>(json).is_err());
    }

    #[test]
    fn test_search_button_position() {
        let json = r#"{"searchButton": {"position": "nav"}}"#;
        let config: PluginConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.search_button.map(|b| b.position),
            Some(ButtonPosition::Nav)
        );
    }

    #[test]
    fn test_config_empty_json() {
        let config: PluginConfig = serde_json::from_str("{}").unwrap();
        assert!(config.submenu.enabled);
        assert_eq!(config.shortcut, ShortcutSetting::default());
    }

    #[test]
    fn test_scoped_icons_and_submenu_icons() {
        let json = r#"{
            "icons": {"collections": {"posts": "file-text"}, "globals": {"site": "globe"}},
            "submenu": {"icons": {"posts": "book-open"}}
        }"#;
        let config: PluginConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.icons.collection("posts"), Some("file-text"));
        assert_eq!(config.icons.global("site"), Some("globe"));
        assert_eq!(config.icons.collection("site"), None);
        assert_eq!(config.document_icon("posts"), Some("book-open"));
    }

    #[test]
    fn test_flat_icons_apply_to_both_kinds() {
        let config: PluginConfig =
            serde_json::from_str(r#"{"icons": {"posts": "newspaper", "site": "globe"}}"#).unwrap();

        assert!(matches!(config.icons, IconConfig::Flat(_)));
        assert_eq!(config.icons.collection("posts"), Some("newspaper"));
        assert_eq!(config.icons.global("site"), Some("globe"));
    }

    #[test]
    fn test_document_icon_falls_back_to_collection_icon() {
        let config: PluginConfig = serde_json::from_str(
            r#"{"icons": {"collections": {"posts": "file-text", "pages": "file"}},
                "submenu": {"icons": {"posts": "book-open"}}}"#,
        )
        .unwrap();

        assert_eq!(config.document_icon("posts"), Some("book-open"));
        assert_eq!(config.document_icon("pages"), Some("file"));
        assert_eq!(config.document_icon("media"), None);
    }
}
