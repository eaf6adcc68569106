use crate::config::{ButtonPosition, PluginConfig, ShortcutSetting};
use crate::{Error, Result};
use cmdmenu_types::{Key, KeyPress, Modifiers};
use serde::Serialize;
use tracing::warn;

/// A single key with exact modifiers, parsed from strings like `ctrl+shift+k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the string has no key, more than one
    /// key, or an unknown key name.
    pub fn parse(combo: &str) -> Result<Self> {
        let mut modifiers = Modifiers::NONE;
        let mut key = None;

        for part in combo.split('+').map(|p| p.trim().to_lowercase()) {
            match part.as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "meta" | "cmd" | "command" => modifiers.meta = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" => modifiers.alt = true,
                name => {
                    if key.is_some() {
                        return Err(Error::Config(format!("'{combo}' has more than one key")));
                    }
                    key = Some(parse_key(name).ok_or_else(|| {
                        Error::Config(format!("unknown key '{name}' in '{combo}'"))
                    })?);
                }
            }
        }

        let key = key.ok_or_else(|| Error::Config(format!("'{combo}' has no key")))?;
        Ok(Self { key, modifiers })
    }

    /// Exact match: the same key with the same modifier set.
    #[must_use]
    pub fn matches(&self, press: &KeyPress) -> bool {
        normalize(&press.key) == self.key && press.modifiers == self.modifiers
    }
}

fn parse_key(name: &str) -> Option<Key> {
    match name {
        "enter" | "return" => Some(Key::Enter),
        "escape" | "esc" => Some(Key::Escape),
        "up" | "arrowup" => Some(Key::Up),
        "down" | "arrowdown" => Some(Key::Down),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::Char(c)),
                _ => None,
            }
        }
    }
}

fn normalize(key: &Key) -> Key {
    match key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        other => other.clone(),
    }
}

/// Global overlay toggle combos
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkeys {
    combos: Vec<KeyCombo>,
}

impl Hotkeys {
    /// Parse the configured combos, skipping invalid ones. Falls back to the
    /// defaults when nothing valid remains.
    #[must_use]
    pub fn from_setting(setting: &ShortcutSetting) -> Self {
        let combos: Vec<KeyCombo> = setting
            .combos()
            .into_iter()
            .filter_map(|combo| match KeyCombo::parse(combo) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Ignoring shortcut: {}", e);
                    None
                }
            })
            .collect();

        if combos.is_empty() {
            return Self::default();
        }
        Self { combos }
    }

    #[must_use]
    pub fn combos(&self) -> &[KeyCombo] {
        &self.combos
    }

    #[must_use]
    pub fn matches(&self, press: &KeyPress) -> bool {
        self.combos.iter().any(|combo| combo.matches(press))
    }
}

impl Default for Hotkeys {
    fn default() -> Self {
        let combos = ShortcutSetting::default()
            .combos()
            .into_iter()
            .filter_map(|c| KeyCombo::parse(c).ok())
            .collect();
        Self { combos }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Mac,
    Other,
}

impl Platform {
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::Mac
        } else {
            Self::Other
        }
    }
}

/// Pick the combo shown on the search button.
///
/// A single configured combo is always shown. From a list, macOS prefers a
/// `meta` combo and other platforms a `ctrl` combo, else the first one.
#[must_use]
pub fn display_combo(setting: &ShortcutSetting, platform: Platform) -> String {
    let list = match setting {
        ShortcutSetting::One(combo) => return combo.clone(),
        ShortcutSetting::Many(list) => list,
    };

    let preferred = match platform {
        Platform::Mac => "meta",
        Platform::Other => "ctrl",
    };

    list.iter()
        .find(|c| c.to_lowercase().contains(preferred))
        .or_else(|| list.first())
        .cloned()
        .unwrap_or_else(|| "meta+k".to_string())
}

/// Keycap labels for a combo string.
#[must_use]
pub fn keycaps(combo: &str, platform: Platform) -> Vec<String> {
    let mac = platform == Platform::Mac;
    combo
        .split('+')
        .map(|part| part.trim().to_lowercase())
        .map(|part| {
            let cap = match part.as_str() {
                "ctrl" | "cmd" | "meta" => {
                    if mac {
                        "⌘"
                    } else {
                        "Ctrl"
                    }
                }
                "shift" => {
                    if mac {
                        "⇧"
                    } else {
                        "Shift"
                    }
                }
                "alt" | "option" => {
                    if mac {
                        "⌥"
                    } else {
                        "Alt"
                    }
                }
                _ => return part.to_uppercase(),
            };
            cap.to_string()
        })
        .collect()
}

/// Render description of the host search button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchButton {
    pub position: ButtonPosition,
    pub combo: String,
    pub keycaps: Vec<String>,
    /// Only the actions row has room for placeholder text
    pub show_placeholder: bool,
}

impl SearchButton {
    /// `None` when the plugin is disabled or no button is configured.
    #[must_use]
    pub fn from_config(config: &PluginConfig, platform: Platform) -> Option<Self> {
        if config.disabled {
            return None;
        }
        let button = config.search_button?;
        let combo = display_combo(&config.shortcut, platform);

        Some(Self {
            position: button.position,
            keycaps: keycaps(&combo, platform),
            combo,
            show_placeholder: button.position == ButtonPosition::Actions,
        })
    }
}
