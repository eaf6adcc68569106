//! Menu source adapter.
//!
//! Turns host collection/global descriptors and plugin custom entries into
//! titled groups plus stray items. The result is a pure function of
//! `(source, locale, config)`; callers rebuild on any change instead of
//! patching a previous menu.

mod filter;

pub use filter::MenuFilter;

use crate::config::{PluginConfig, SlugsToIgnore};
use crate::i18n;
use crate::navigation::DEFAULT_TITLE_FIELD;
use cmdmenu_types::{
    CustomEntry, CustomItem, Group, Item, ItemKind, MenuAction, NavBacking, PaletteUpdate,
    SourceConfig,
};
use std::collections::HashMap;
use tracing::debug;

/// Host-internal collections hidden unless the config replaces the defaults
pub const DEFAULT_SLUGS_TO_IGNORE: [&str; 3] = [
    "payload-migrations",
    "payload-preferences",
    "payload-locked-documents",
];

pub const DEFAULT_COLLECTIONS_GROUP: &str = "Collections";
pub const DEFAULT_GLOBALS_GROUP: &str = "Globals";

/// Resolved menu: groups in first-seen order and stray custom items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Menu {
    pub groups: Vec<Group>,
    pub items: Vec<Item>,
}

impl Menu {
    /// Groups worth rendering. Empty groups cannot come out of [`build`], but
    /// filtering can empty one.
    pub fn visible_groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|g| !g.items.is_empty())
    }

    /// All selectable items in render order: grouped items, then stray items.
    pub fn entries(&self) -> impl Iterator<Item = &Item> {
        self.visible_groups()
            .flat_map(|g| g.items.iter())
            .chain(self.items.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Drop zero-item groups.
    #[must_use]
    pub fn into_visible(mut self) -> Self {
        self.groups.retain(|g| !g.items.is_empty());
        self
    }

    /// Render update for the main page; zero-item groups are left out.
    #[must_use]
    pub fn to_update(&self) -> PaletteUpdate {
        PaletteUpdate::Menu {
            groups: self.visible_groups().cloned().collect(),
            items: self.items.clone(),
        }
    }
}

/// Effective ignore list: defaults, extended or replaced by config.
#[must_use]
pub fn effective_ignore_set(defaults: &[&str], setting: Option<&SlugsToIgnore>) -> Vec<String> {
    let mut slugs: Vec<String> = defaults.iter().map(|s| (*s).to_string()).collect();

    match setting {
        None => {}
        Some(SlugsToIgnore::List(extra)) => slugs.extend(extra.iter().cloned()),
        Some(SlugsToIgnore::Options {
            ignore_list,
            replace_defaults,
        }) => {
            if *replace_defaults {
                slugs.clear();
            }
            slugs.extend(ignore_list.iter().cloned());
        }
    }

    slugs
}

/// Get-or-create groups by title, keeping first-seen order.
#[derive(Default)]
struct GroupMap {
    groups: Vec<Group>,
    by_title: HashMap<String, usize>,
}

impl GroupMap {
    fn push(&mut self, title: &str, item: Item) {
        let idx = match self.by_title.get(title) {
            Some(&idx) => idx,
            None => {
                self.groups.push(Group::new(title));
                let idx = self.groups.len() - 1;
                self.by_title.insert(title.to_string(), idx);
                idx
            }
        };
        self.groups[idx].items.push(item);
    }

    fn into_groups(self) -> Vec<Group> {
        self.groups
    }
}

/// Build the palette menu for `locale`.
#[must_use]
pub fn build(source: &SourceConfig, locale: &str, config: &PluginConfig) -> Menu {
    let ignored = effective_ignore_set(&DEFAULT_SLUGS_TO_IGNORE, config.slugs_to_ignore.as_ref());
    let is_ignored = |slug: &str| ignored.iter().any(|s| s == slug);
    let mut groups = GroupMap::default();
    let mut items = Vec::new();

    for collection in &source.collections {
        if is_ignored(&collection.slug) {
            continue;
        }

        let title = i18n::group_name(&collection.admin, locale)
            .unwrap_or_else(|| DEFAULT_COLLECTIONS_GROUP.to_string());

        let (title_field, title_field_label) = if config.submenu.enabled {
            let field = collection
                .admin
                .use_as_title
                .clone()
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE_FIELD.to_string());
            let label = i18n::title_field_label(collection, &field, locale);
            (Some(field), Some(label))
        } else {
            (None, None)
        };

        groups.push(
            &title,
            Item {
                slug: collection.slug.clone(),
                kind: ItemKind::NavTarget(NavBacking::Collection),
                label: i18n::collection_name(collection, locale),
                action: MenuAction::navigate(format!("/admin/collections/{}", collection.slug)),
                title_field,
                title_field_label,
                icon: config.icons.collection(&collection.slug).map(str::to_string),
            },
        );
    }

    for global in &source.globals {
        if is_ignored(&global.slug) {
            continue;
        }

        let title = i18n::group_name(&global.admin, locale)
            .unwrap_or_else(|| DEFAULT_GLOBALS_GROUP.to_string());

        groups.push(
            &title,
            Item {
                slug: global.slug.clone(),
                kind: ItemKind::NavTarget(NavBacking::Global),
                label: i18n::global_name(global, locale),
                action: MenuAction::navigate(format!("/admin/globals/{}", global.slug)),
                title_field: None,
                title_field_label: None,
                icon: config.icons.global(&global.slug).map(str::to_string),
            },
        );
    }

    // Custom entries are user-defined and never filtered by the ignore set
    for entry in &config.custom_items {
        match entry {
            CustomEntry::Group(group) => {
                let title = i18n::resolve(&group.title, locale, None);
                for item in &group.items {
                    groups.push(&title, custom_item(item, locale));
                }
            }
            CustomEntry::Item(item) => items.push(custom_item(item, locale)),
        }
    }

    let menu = Menu {
        groups: groups.into_groups(),
        items,
    };
    debug!(
        "Built menu for locale '{}': {} groups, {} stray items",
        locale,
        menu.groups.len(),
        menu.items.len()
    );
    menu
}

fn custom_item(item: &CustomItem, locale: &str) -> Item {
    let mut resolved = Item::custom(
        item.slug.clone(),
        i18n::resolve(&item.label, locale, Some(&item.slug)),
        item.action.clone(),
    );
    resolved.icon.clone_from(&item.icon);
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_set_defaults() {
        let set = effective_ignore_set(&["a", "b", "c"], None);
        assert_eq!(set, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ignore_set_list_appends() {
        let setting = SlugsToIgnore::List(vec!["d".to_string()]);
        let set = effective_ignore_set(&["a", "b", "c"], Some(&setting));
        assert_eq!(set, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_ignore_set_replace_defaults() {
        let setting = SlugsToIgnore::Options {
            ignore_list: vec!["d".to_string()],
            replace_defaults: true,
        };
        assert_eq!(effective_ignore_set(&["a", "b", "c"], Some(&setting)), vec!["d"]);
    }

    #[test]
    fn test_ignore_set_options_without_replace() {
        let setting = SlugsToIgnore::Options {
            ignore_list: vec!["d".to_string()],
            replace_defaults: false,
        };
        assert_eq!(
            effective_ignore_set(&["a", "b", "c"], Some(&setting)),
            vec!["a", "b", "c", "d"]
        );
    }

    #[test]
    fn test_group_map_first_seen_order() {
        let mut map = GroupMap::default();
        map.push("B", Item::custom("1", "One", MenuAction::navigate("/1")));
        map.push("A", Item::custom("2", "Two", MenuAction::navigate("/2")));
        map.push("B", Item::custom("3", "Three", MenuAction::navigate("/3")));

        let groups = map.into_groups();
        let titles: Vec<_> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        let slugs: Vec<_> = groups[0].items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["1", "3"]);
    }

    #[test]
    fn test_menu_entries_skip_empty_groups() {
        let menu = Menu {
            groups: vec![
                Group::new("Empty"),
                Group {
                    title: "Tools".to_string(),
                    items: vec![Item::custom("docs", "Docs", MenuAction::navigate("/docs"))],
                },
            ],
            items: vec![Item::custom("home", "Home", MenuAction::navigate("/"))],
        };

        let slugs: Vec<_> = menu.entries().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["docs", "home"]);
        assert_eq!(menu.visible_groups().count(), 1);
        assert_eq!(menu.len(), 2);
        assert_eq!(menu.into_visible().groups.len(), 1);
    }

    #[test]
    fn test_menu_update_omits_empty_groups() {
        let menu = Menu {
            groups: vec![
                Group::new("Empty"),
                Group {
                    title: "Tools".to_string(),
                    items: vec![Item::custom("docs", "Docs", MenuAction::navigate("/docs"))],
                },
                Group::new("Also empty"),
            ],
            items: Vec::new(),
        };

        let PaletteUpdate::Menu { groups, items } = menu.to_update() else {
            panic!("expected a menu update");
        };
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "Tools");
        assert!(items.is_empty());

        let rendered: Vec<_> = groups.iter().flat_map(|g| &g.items).collect();
        let indexed: Vec<_> = menu.entries().collect();
        assert_eq!(rendered, indexed);
    }
}
