//! Internet connectivity check target selection.
//!
//! The server hands out a newline-separated list of URLs in
//! `session/InternetConnectivityURLs`.  Each check probes one of them, picked
//! uniformly at random, so a single blocked site does not make every check
//! fail.

use rand::seq::SliceRandom;
use rand::Rng;

/// Splits the stored URL list.  Both `\r` and `\n` separate entries; blank
/// entries are dropped.  The literal string `null` (an unset server value)
/// means "no URLs".
pub fn parse_urls(raw: &str) -> Vec<String> {
    if raw.trim() == "null" {
        return Vec::new();
    }
    raw.split(['\r', '\n'])
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

/// Picks one URL uniformly at random; `None` when the list is empty.
pub fn choose_url<'a, R: Rng + ?Sized>(urls: &'a [String], rng: &mut R) -> Option<&'a str> {
    urls.choose(rng).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_urls_splits_on_cr_and_lf() {
        let urls = parse_urls("http://a.example\r\nhttp://b.example\n\nhttp://c.example\r");
        assert_eq!(
            urls,
            vec!["http://a.example", "http://b.example", "http://c.example"]
        );
    }

    #[test]
    fn test_parse_urls_null_and_empty() {
        assert!(parse_urls("null").is_empty());
        assert!(parse_urls("").is_empty());
        assert!(parse_urls("\r\n").is_empty());
    }

    #[test]
    fn test_choose_url_returns_member_of_list() {
        // Arrange
        let urls = parse_urls("http://a\nhttp://b\nhttp://c");
        let mut rng = StdRng::seed_from_u64(7);

        // Act / Assert
        for _ in 0..50 {
            let picked = choose_url(&urls, &mut rng).unwrap();
            assert!(urls.iter().any(|u| u == picked));
        }
    }

    #[test]
    fn test_choose_url_eventually_covers_every_entry() {
        let urls = parse_urls("http://a\nhttp://b");
        let mut rng = StdRng::seed_from_u64(1);
        let picks: Vec<&str> = (0..100).filter_map(|_| choose_url(&urls, &mut rng)).collect();
        assert!(picks.contains(&"http://a"));
        assert!(picks.contains(&"http://b"));
    }

    #[test]
    fn test_choose_url_empty_list() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(choose_url(&[], &mut rng), None);
    }
}
