/// Separator used for theme slugs.
pub const THEME_SEPARATOR: char = '_';

/// Separator used for article slugs.
pub const ARTICLE_SEPARATOR: char = '-';

/// Normalize arbitrary text into a URL-safe slug.
///
/// The text is transliterated to ASCII and lowercased. Every run of
/// characters outside `[a-z0-9]` collapses into a single `separator`, and
/// separators are trimmed from both ends.
///
/// Normalizing an already normalized slug with the same separator returns it
/// unchanged.
pub fn slugify(text: &str, separator: char) -> String {
    let ascii = deunicode::deunicode(text);

    let mut out = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push(separator);
            }
            pending_separator = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    out
}

pub fn theme_slug(text: &str) -> String {
    slugify(text, THEME_SEPARATOR)
}

pub fn article_slug(text: &str) -> String {
    slugify(text, ARTICLE_SEPARATOR)
}

/// Returns true if `slug` is non-empty and consists only of characters a
/// normalized slug can contain.
///
/// Used to reject path segments before they reach a store key path.
pub fn is_slug_like(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-'))
}
