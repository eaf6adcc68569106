pub mod config;
pub mod dispatch;
pub mod host;
pub mod i18n;
pub mod menu;
pub mod navigation;
pub mod subsearch;

mod error;
mod palette;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use palette::Palette;

pub use cmdmenu_types::*;
