//! Filename sanitization.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Leading track number in a file stem: "07 - ", "07. ", "07_".
static TRACK_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d{1,3}\s*[-._]\s*").expect("valid track prefix pattern"));

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Longest prefix of `s` that fits in `max_bytes` without splitting a char.
fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Turns arbitrary tag text into a single safe path component of at most
/// `max_bytes` bytes.
///
/// Returns `None` when nothing usable is left.
pub fn sanitize_component(raw: &str, max_bytes: usize) -> Option<String> {
    let replaced: String = raw
        .chars()
        .map(|c| {
            if FORBIDDEN.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = truncate_bytes(&collapsed, max_bytes)
        .trim()
        .trim_end_matches('.')
        .trim_end();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_' || c == '.') {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Drops a leading track number from a file stem.
pub fn strip_track_prefix(stem: &str) -> &str {
    match TRACK_PREFIX.find(stem) {
        Some(m) if m.end() < stem.len() => &stem[m.end()..],
        _ => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_chars_replaced() {
        assert_eq!(
            sanitize_component("AC/DC: Live? <1991>", 200).as_deref(),
            Some("AC_DC_ Live_ _1991_")
        );
        assert_eq!(sanitize_component("tab\there", 200).as_deref(), Some("tab_here"));
    }

    #[test]
    fn test_whitespace_and_dots() {
        assert_eq!(
            sanitize_component("  Many    spaces  here...  ", 200).as_deref(),
            Some("Many spaces here")
        );
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(sanitize_component("   ", 200), None);
        assert_eq!(sanitize_component("...", 200), None);
        assert_eq!(sanitize_component("???", 200), None);
    }

    #[test]
    fn test_truncation_counts_bytes() {
        // Three bytes per char; 200 bytes holds 66 of them.
        let long = "曲".repeat(300);
        let out = sanitize_component(&long, 200).unwrap();
        assert_eq!(out.len(), 198);
        assert_eq!(out.chars().count(), 66);

        assert_eq!(sanitize_component("ab", 200).as_deref(), Some("ab"));
        assert_eq!(sanitize_component("曲", 2), None);
    }

    #[test]
    fn test_strip_track_prefix() {
        assert_eq!(strip_track_prefix("07 - Song"), "Song");
        assert_eq!(strip_track_prefix("07. Song"), "Song");
        assert_eq!(strip_track_prefix("07_Song"), "Song");
        assert_eq!(strip_track_prefix("Song"), "Song");
        assert_eq!(strip_track_prefix("1999"), "1999");
        assert_eq!(strip_track_prefix("07 - "), "07 - ");
    }
}
