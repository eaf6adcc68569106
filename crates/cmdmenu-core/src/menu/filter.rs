use super::Menu;
use cmdmenu_types::{Group, Item};
use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use tracing::debug;

/// Client-side filter for the main page.
///
/// Label, slug and group title are matched as one text, so every word of the
/// query must appear in one of them ("content posts" finds Posts in the
/// Content group). Matching keeps menu order; there is no ranking.
pub struct MenuFilter {
    matcher: Matcher,
}

impl MenuFilter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
        }
    }

    /// Filter `menu` by `query`. Empty queries return the menu unchanged.
    pub fn filter(&mut self, menu: &Menu, query: &str) -> Menu {
        let query = query.trim();
        if query.is_empty() {
            return menu.clone();
        }

        let pattern = Pattern::new(
            query,
            CaseMatching::Smart,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );

        let groups: Vec<Group> = menu
            .groups
            .iter()
            .filter_map(|group| {
                let items: Vec<Item> = group
                    .items
                    .iter()
                    .filter(|item| self.matches(&pattern, item, Some(&group.title)))
                    .cloned()
                    .collect();
                (!items.is_empty()).then(|| Group {
                    title: group.title.clone(),
                    items,
                })
            })
            .collect();

        let items: Vec<Item> = menu
            .items
            .iter()
            .filter(|item| self.matches(&pattern, item, None))
            .cloned()
            .collect();

        let filtered = Menu { groups, items };
        debug!("Filter '{}' kept {} of {} entries", query, filtered.len(), menu.len());
        filtered
    }

    fn matches(&mut self, pattern: &Pattern, item: &Item, group_title: Option<&str>) -> bool {
        let mut text = format!("{} {}", item.label, item.slug);
        if let Some(title) = group_title {
            text.push(' ');
            text.push_str(title);
        }

        let mut buf = Vec::new();
        let haystack = Utf32Str::new(&text, &mut buf);
        pattern.score(haystack, &mut self.matcher).is_some()
    }
}

impl Default for MenuFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdmenu_types::MenuAction;

    fn item(slug: &str, label: &str) -> Item {
        Item::custom(slug, label, MenuAction::navigate(format!("/{slug}")))
    }

    fn sample_menu() -> Menu {
        Menu {
            groups: vec![
                Group {
                    title: "Content".to_string(),
                    items: vec![item("posts", "Posts"), item("pages", "Pages")],
                },
                Group {
                    title: "Media".to_string(),
                    items: vec![item("media", "Media"), item("media2", "Media 2")],
                },
            ],
            items: vec![item("account", "Account")],
        }
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let mut filter = MenuFilter::new();
        let menu = sample_menu();
        assert_eq!(filter.filter(&menu, "  "), menu);
    }

    #[test]
    fn test_filter_by_label() {
        let mut filter = MenuFilter::new();
        let filtered = filter.filter(&sample_menu(), "post");
        let slugs: Vec<_> = filtered.entries().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["posts"]);
        assert_eq!(filtered.groups.len(), 1);
    }

    #[test]
    fn test_filter_by_group_title_keyword() {
        let mut filter = MenuFilter::new();
        let filtered = filter.filter(&sample_menu(), "content");
        let slugs: Vec<_> = filtered.entries().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["posts", "pages"]);
    }

    #[test]
    fn test_query_words_span_fields() {
        let mut filter = MenuFilter::new();

        let filtered = filter.filter(&sample_menu(), "content posts");
        let slugs: Vec<_> = filtered.entries().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["posts"]);

        assert!(filter.filter(&sample_menu(), "content account").is_empty());
    }

    #[test]
    fn test_filter_stray_items() {
        let mut filter = MenuFilter::new();
        let filtered = filter.filter(&sample_menu(), "acct");
        assert!(filtered.groups.is_empty());
        assert_eq!(filtered.items.len(), 1);
    }

    #[test]
    fn test_filter_no_match() {
        let mut filter = MenuFilter::new();
        assert!(filter.filter(&sample_menu(), "zzzz").is_empty());
    }
}
