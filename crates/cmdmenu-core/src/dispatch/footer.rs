use crate::config::{SubmenuConfig, SubmenuShortcut};
use cmdmenu_types::{FooterHint, HintAction, Item, MenuAction, Page};

/// Footer hints for the highlighted item. Nothing highlighted, no hints.
#[must_use]
pub fn footer_hints(
    page: &Page,
    highlighted: Option<&Item>,
    submenu: &SubmenuConfig,
) -> Vec<FooterHint> {
    let Some(item) = highlighted else {
        return Vec::new();
    };

    if !page.is_main() {
        let action = match item.action {
            MenuAction::Navigate { .. } => HintAction::Open,
            MenuAction::Invoke { .. } => HintAction::Select,
        };
        return vec![FooterHint::new("Enter", action)];
    }

    if submenu.enabled && item.is_collection() {
        return match submenu.shortcut {
            SubmenuShortcut::ShiftEnter => vec![
                FooterHint::new("Enter", HintAction::Navigate),
                FooterHint::new("Shift + Enter", HintAction::SearchIn),
            ],
            SubmenuShortcut::Enter => vec![
                FooterHint::new("Enter", HintAction::SearchIn),
                FooterHint::new("Shift + Enter", HintAction::Navigate),
            ],
        };
    }

    let action = match item.action {
        MenuAction::Navigate { .. } => HintAction::Navigate,
        MenuAction::Invoke { .. } => HintAction::Execute,
    };
    vec![FooterHint::new("Enter", action)]
}
