//! Slug normalization
//!
//! A slug is the URL-safe public key of an article. Derived slugs follow the
//! usual web-framework `slugify` rules: NFKD-decomposed and reduced to
//! ASCII (accents fall off their letters), punctuation removed, lowercase,
//! runs of whitespace and hyphens collapsed into one hyphen.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Maximum length of a stored slug
pub const SLUG_MAX_LENGTH: usize = 50;

/// Accepted shape of a client-supplied slug
pub static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug pattern"));

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid pattern"));

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid pattern"));

/// Normalize arbitrary text into a slug.
///
/// The result may be empty when the input has no ASCII word characters
/// even after decomposition.
pub fn slugify(value: &str) -> String {
    let ascii: String = value.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_lowercase();
    let cleaned = DISALLOWED.replace_all(&lowered, "");
    let hyphenated = SEPARATORS.replace_all(cleaned.trim(), "-");
    hyphenated.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Derive the slug for a title, capped at [`SLUG_MAX_LENGTH`].
///
/// Returns `None` when nothing usable is left.
pub fn derive_slug(title: &str) -> Option<String> {
    let mut slug = slugify(title);
    if slug.len() > SLUG_MAX_LENGTH {
        // slugify output is ASCII, byte truncation is safe
        slug.truncate(SLUG_MAX_LENGTH);
        slug = slug.trim_end_matches(['-', '_']).to_string();
    }
    if slug.is_empty() { None } else { Some(slug) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic_title() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_drops_punctuation() {
        assert_eq!(slugify("Rust, Axum & You!"), "rust-axum-you");
        assert_eq!(slugify("don't panic"), "dont-panic");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  a -- b\t\tc  "), "a-b-c");
        assert_eq!(slugify("--edge--"), "edge");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_slugify_strips_accents() {
        assert_eq!(slugify("Crème brûlée"), "creme-brulee");
        assert_eq!(slugify("Été"), "ete");
        assert_eq!(slugify("Ångström naïveté"), "angstrom-naivete");
    }

    #[test]
    fn test_slugify_compatibility_forms() {
        // ligatures and full-width letters decompose to plain ASCII
        assert_eq!(slugify("ﬁne ＡＢＣ"), "fine-abc");
    }

    #[test]
    fn test_slugify_drops_undecomposable_text() {
        assert_eq!(slugify("日本語"), "");
        assert_eq!(slugify("Ølandsk smørrebrød"), "landsk-smrrebrd");
    }

    #[test]
    fn test_derive_slug_accented_title() {
        assert_eq!(derive_slug("Crème brûlée"), Some("creme-brulee".to_string()));
        assert_eq!(derive_slug("Été"), Some("ete".to_string()));
    }

    #[test]
    fn test_slugify_is_deterministic() {
        let title = "The Same Title, Twice";
        assert_eq!(slugify(title), slugify(title));
    }

    #[test]
    fn test_derive_slug_truncates() {
        let title = "word ".repeat(30);
        let slug = derive_slug(&title).expect("non-empty");
        assert!(slug.len() <= SLUG_MAX_LENGTH);
        assert!(!slug.ends_with('-'));
        assert!(slug.starts_with("word-word"));
    }

    #[test]
    fn test_derive_slug_empty_is_none() {
        assert_eq!(derive_slug("!!!"), None);
        assert_eq!(derive_slug("   "), None);
    }
}
