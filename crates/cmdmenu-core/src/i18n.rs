//! Locale resolution for labels coming from host and plugin config.
//!
//! Nothing here fails: a missing translation degrades to a title-cased slug,
//! or to an empty string when there is no slug to fall back on.

use cmdmenu_types::{AdminOptions, CollectionDescriptor, GlobalDescriptor, LocalizedString};

/// "site-settings" -> "Site Settings".
///
/// Hyphens become spaces and every ASCII word character that starts a word
/// is upper-cased. Underscores and digits count as word characters.
#[must_use]
pub fn slug_to_title(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut prev_is_word = false;

    for c in slug.chars() {
        let c = if c == '-' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }

    out
}

/// Resolve `value` for `locale`.
///
/// Literals pass through unchanged. A missing or empty locale entry falls back
/// to [`slug_to_title`] of `fallback_slug`, or to an empty string.
#[must_use]
pub fn resolve(value: &LocalizedString, locale: &str, fallback_slug: Option<&str>) -> String {
    match value {
        LocalizedString::Literal(s) => s.clone(),
        LocalizedString::Localized(map) => match map.get(locale) {
            Some(s) if !s.is_empty() => s.clone(),
            _ => fallback_slug.map(slug_to_title).unwrap_or_default(),
        },
    }
}

/// Collection display name: plural label, then singular, then the slug.
#[must_use]
pub fn collection_name(collection: &CollectionDescriptor, locale: &str) -> String {
    let slug = collection.slug.as_str();
    if let Some(plural) = &collection.labels.plural {
        return resolve(plural, locale, Some(slug));
    }
    if let Some(singular) = &collection.labels.singular {
        return resolve(singular, locale, Some(slug));
    }
    collection.slug.clone()
}

/// Global display name: its label, then the slug.
#[must_use]
pub fn global_name(global: &GlobalDescriptor, locale: &str) -> String {
    match &global.label {
        Some(label) => resolve(label, locale, Some(&global.slug)),
        None => global.slug.clone(),
    }
}

/// Admin sidebar group, trimmed. `None` means "use the default group".
#[must_use]
pub fn group_name(admin: &AdminOptions, locale: &str) -> Option<String> {
    let group = admin.group.as_ref()?;
    let name = resolve(group, locale, None);
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Display label of the field used as document title.
///
/// Looks up the field named `title_field`; an unlabelled or missing field
/// resolves to the title-cased field name.
#[must_use]
pub fn title_field_label(
    collection: &CollectionDescriptor,
    title_field: &str,
    locale: &str,
) -> String {
    let label = collection
        .fields
        .iter()
        .find(|field| field.name.as_deref() == Some(title_field))
        .and_then(|field| field.label.clone())
        .unwrap_or_default();

    let resolved = resolve(&label, locale, Some(title_field));
    if resolved.is_empty() {
        title_field.to_string()
    } else {
        resolved
    }
}
