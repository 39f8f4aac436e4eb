use std::fmt;

use crate::utils;

const SMALL: &str = include_str!("../../wordlists/small.txt");
const MEDIUM: &str = include_str!("../../wordlists/medium.txt");
const LARGE: &str = include_str!("../../wordlists/large.txt");

/// One of the bundled path lists. Each tier is a superset of the one below it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordlistTier {
    Small,
    Medium,
    Large,
}

impl WordlistTier {
    /// Accepts the numeric tokens `1`, `2`, `3` and their names.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "1" | "small" => Some(Self::Small),
            "2" | "medium" => Some(Self::Medium),
            "3" | "large" => Some(Self::Large),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    fn raw(self) -> &'static str {
        match self {
            Self::Small => SMALL,
            Self::Medium => MEDIUM,
            Self::Large => LARGE,
        }
    }

    pub fn paths(self) -> Vec<String> {
        parse_wordlist(self.raw())
    }
}

impl fmt::Display for WordlistTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One wordlist entry as a request path: trimmed, without leading slashes.
/// Blank entries and `#` comments yield `None`.
pub fn clean_entry(entry: &str) -> Option<String> {
    let entry = entry.trim();
    if entry.starts_with('#') {
        return None;
    }
    let path = entry.trim_start_matches('/');
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

pub fn parse_wordlist(raw: &str) -> Vec<String> {
    let words = raw.lines().filter_map(clean_entry).collect::<Vec<_>>();
    utils::dedupe_preserving_order(words)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn tiers_parse_numbers_and_names() {
        assert_eq!(WordlistTier::parse("1"), Some(WordlistTier::Small));
        assert_eq!(WordlistTier::parse("2"), Some(WordlistTier::Medium));
        assert_eq!(WordlistTier::parse(" 3 "), Some(WordlistTier::Large));
        assert_eq!(WordlistTier::parse("Medium"), Some(WordlistTier::Medium));
        assert_eq!(WordlistTier::parse("4"), None);
        assert_eq!(WordlistTier::parse("big"), None);
        assert_eq!(WordlistTier::parse(""), None);
    }

    #[test]
    fn bundled_lists_grow_with_tier() {
        let small = WordlistTier::Small.paths();
        let medium = WordlistTier::Medium.paths();
        let large = WordlistTier::Large.paths();
        assert!(!small.is_empty());
        assert!(small.len() < medium.len());
        assert!(medium.len() < large.len());

        let medium_set: HashSet<_> = medium.iter().collect();
        assert!(small.iter().all(|p| medium_set.contains(p)));
        let large_set: HashSet<_> = large.iter().collect();
        assert!(medium.iter().all(|p| large_set.contains(p)));
    }

    #[test]
    fn bundled_lists_have_no_duplicates_or_comments() {
        for tier in [WordlistTier::Small, WordlistTier::Medium, WordlistTier::Large] {
            let paths = tier.paths();
            let unique: HashSet<_> = paths.iter().collect();
            assert_eq!(unique.len(), paths.len(), "{tier} has duplicates");
            assert!(paths.iter().all(|p| !p.starts_with('#') && !p.starts_with('/')));
        }
    }

    #[test]
    fn parse_wordlist_skips_noise() {
        let out = parse_wordlist("# header\n\n/admin/\nlogin.php\n  \nadmin/\n///\n");
        assert_eq!(out, vec!["admin/".to_string(), "login.php".to_string()]);
    }
}
