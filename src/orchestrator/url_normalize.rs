//! URL and title normalisation for merge-time deduplication.
//!
//! Canonicalises URLs so that equivalent pages (differing only in
//! capitalisation, trailing slash, fragment, or default port) compare as
//! equal, and normalises titles for entries that carry no URL at all.

use url::Url;

use crate::types::SearchResult;

/// Deduplication key for one merged entry.
///
/// Entries with a URL are keyed by the normalised URL; entries without one
/// fall back to the normalised title so un-linked items still deduplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum DedupeKey {
    Url(String),
    Title(String),
}

/// Compute the deduplication key for a search result.
pub(crate) fn dedupe_key(result: &SearchResult) -> DedupeKey {
    let url = result.url.trim();
    if url.is_empty() {
        DedupeKey::Title(normalize_title(&result.title))
    } else {
        DedupeKey::Url(normalize_url(url))
    }
}

/// Normalise a URL for deduplication comparison.
///
/// Applies the following transformations:
///
/// 1. Trim surrounding whitespace.
/// 2. Remove the fragment.
/// 3. Remove default ports (`:80` for HTTP, `:443` for HTTPS).
/// 4. Remove the trailing slash from the path (unless the path is `/`).
/// 5. Lowercase the whole string. The key never travels back onto the
///    wire, so folding the path is safe here.
///
/// If the input cannot be parsed as a URL it is trimmed and lowercased
/// unchanged.
///
/// # Examples
///
/// ```
/// use fanout_search::orchestrator::url_normalize::normalize_url;
///
/// let a = normalize_url("https://Example.COM/News/");
/// let b = normalize_url("https://example.com/news");
/// assert_eq!(a, b);
/// ```
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut parsed) = Url::parse(trimmed) else {
        return trimmed.to_lowercase();
    };

    parsed.set_fragment(None);

    if is_default_port(&parsed) {
        let _ = parsed.set_port(None);
    }

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(&path[..path.len() - 1]);
    }

    parsed.to_string().to_lowercase()
}

/// Normalise a title for fallback deduplication: trimmed, lowercased,
/// inner whitespace collapsed to single spaces.
pub fn normalize_title(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Returns `true` if the URL uses the default port for its scheme.
fn is_default_port(url: &Url) -> bool {
    matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(url: &str, title: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            url: url.to_string(),
            snippet: String::new(),
            source_domain: String::new(),
            published_date: None,
        }
    }

    #[test]
    fn lowercases_scheme_host_and_path() {
        assert_eq!(
            normalize_url("HTTPS://Example.COM/Path"),
            "https://example.com/path"
        );
    }

    #[test]
    fn removes_trailing_slash() {
        assert_eq!(
            normalize_url("https://example.com/path/"),
            "https://example.com/path"
        );
    }

    #[test]
    fn preserves_root_slash() {
        assert_eq!(normalize_url("https://example.com/"), "https://example.com/");
    }

    #[test]
    fn removes_default_http_port() {
        assert_eq!(
            normalize_url("http://example.com:80/path"),
            "http://example.com/path"
        );
    }

    #[test]
    fn removes_default_https_port() {
        assert_eq!(
            normalize_url("https://example.com:443/path"),
            "https://example.com/path"
        );
    }

    #[test]
    fn preserves_non_default_port() {
        assert_eq!(
            normalize_url("https://example.com:8080/path"),
            "https://example.com:8080/path"
        );
    }

    #[test]
    fn removes_fragment() {
        assert_eq!(
            normalize_url("https://example.com/page#section"),
            "https://example.com/page"
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            normalize_url("  https://example.com/page  "),
            "https://example.com/page"
        );
    }

    #[test]
    fn case_and_slash_variants_normalize_to_same_string() {
        let a = normalize_url("https://Example.COM/News/Article/");
        let b = normalize_url("https://example.com/news/article");
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_url_lowercased_unchanged() {
        assert_eq!(normalize_url("Not A Url"), "not a url");
    }

    #[test]
    fn empty_string_stays_empty() {
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn title_normalisation_collapses_whitespace() {
        assert_eq!(
            normalize_title("  Rust   Async\tRuntime "),
            "rust async runtime"
        );
    }

    #[test]
    fn dedupe_key_prefers_url() {
        let key = dedupe_key(&make_result("https://a.com/X", "Title"));
        assert_eq!(key, DedupeKey::Url("https://a.com/x".into()));
    }

    #[test]
    fn dedupe_key_falls_back_to_title() {
        let key = dedupe_key(&make_result("", "Some  Headline"));
        assert_eq!(key, DedupeKey::Title("some headline".into()));
    }

    #[test]
    fn whitespace_only_url_counts_as_absent() {
        let key = dedupe_key(&make_result("   ", "Headline"));
        assert_eq!(key, DedupeKey::Title("headline".into()));
    }
}
