//! Locator normalization.
//!
//! Items from the upstream API reference series and episodes either by an
//! absolute URL on the source site or by a relative path. Everything keyed or
//! routed on a locator goes through [`extract_path`] first.

use url::Url;

/// Reduce a locator to its path component.
///
/// Absolute URLs lose scheme, host, query and fragment. Anything that does not
/// parse as an absolute URL is returned unchanged, whether or not it starts
/// with `/`.
pub fn extract_path(locator: &str) -> String {
    if locator.is_empty() {
        return String::new();
    }

    match Url::parse(locator) {
        Ok(url) => url.path().to_string(),
        Err(_) => locator.to_string(),
    }
}

/// The original link when present, else the link
pub fn preferred_link<'a>(original_link: &'a str, link: &'a str) -> &'a str {
    if original_link.is_empty() {
        link
    } else {
        original_link
    }
}

/// Episode pages are streamed directly; everything else opens a detail page
pub fn is_episode_path(path: &str) -> bool {
    path.to_lowercase().contains("episode")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_keeps_path_only() {
        assert_eq!(extract_path("https://host/series/x"), "/series/x");
        assert_eq!(
            extract_path("https://host/series/x?page=2#eps"),
            "/series/x"
        );
        assert_eq!(extract_path("https://host"), "/");
    }

    #[test]
    fn test_relative_path_unchanged() {
        assert_eq!(extract_path("/series/x"), "/series/x");
        assert_eq!(extract_path("/series/x?page=2"), "/series/x?page=2");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_path(""), "");
    }

    #[test]
    fn test_unparseable_input_unchanged() {
        assert_eq!(
            extract_path("not a url, no leading slash"),
            "not a url, no leading slash"
        );
        assert_eq!(extract_path("series/x"), "series/x");
    }

    #[test]
    fn test_preferred_link() {
        assert_eq!(preferred_link("https://host/a", "/a"), "https://host/a");
        assert_eq!(preferred_link("", "/a"), "/a");
        assert_eq!(preferred_link("", ""), "");
    }

    #[test]
    fn test_episode_detection() {
        assert!(is_episode_path("/spy-x-family-episode-12"));
        assert!(is_episode_path("/Series/One-Piece-EPISODE-1100"));
        assert!(!is_episode_path("/series/spy-x-family-s3"));
    }
}
