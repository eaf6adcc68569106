mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{
    ButtonPosition, IconConfig, PluginConfig, ScopedIcons, SearchButtonConfig, ShortcutSetting,
    SlugsToIgnore, SubmenuConfig, SubmenuShortcut, load_source,
};
pub use validation::warn_unknown_fields;
