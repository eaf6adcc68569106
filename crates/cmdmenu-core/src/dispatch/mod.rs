//! Keyboard dispatch.
//!
//! [`resolve`] maps a key press and the palette's current situation to a
//! [`Dispatch`] decision. It has no side effects; the palette carries the
//! decision out.

mod footer;
mod shortcut;

pub use footer::footer_hints;
pub use shortcut::{Hotkeys, KeyCombo, Platform, SearchButton, display_combo, keycaps};

use crate::config::SubmenuConfig;
use cmdmenu_types::{Item, Key, KeyPress, Page};

/// What a key press should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    ToggleOverlay,
    Back,
    OpenSubmenu,
    Execute,
    MoveSelection(isize),
    /// Left to the host
    Unhandled,
}

/// Palette situation a key press is resolved against
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    pub open: bool,
    pub page: &'a Page,
    pub highlighted: Option<&'a Item>,
    pub submenu: &'a SubmenuConfig,
}

#[must_use]
pub fn resolve(hotkeys: &Hotkeys, press: &KeyPress, ctx: &DispatchContext<'_>) -> Dispatch {
    if hotkeys.matches(press) {
        return Dispatch::ToggleOverlay;
    }
    if !ctx.open {
        return Dispatch::Unhandled;
    }

    match press.key {
        Key::Escape if !ctx.page.is_main() => Dispatch::Back,
        Key::Enter => {
            let Some(item) = ctx.highlighted else {
                return Dispatch::Unhandled;
            };
            let opens_submenu = ctx.page.is_main()
                && ctx.submenu.enabled
                && item.is_collection()
                && ctx.submenu.shortcut.opens_submenu(press.modifiers.shift);
            if opens_submenu {
                Dispatch::OpenSubmenu
            } else {
                Dispatch::Execute
            }
        }
        Key::Up => Dispatch::MoveSelection(-1),
        Key::Down => Dispatch::MoveSelection(1),
        _ => Dispatch::Unhandled,
    }
}
