//! Canonical site locations and free-text normalization.

use serde::{Deserialize, Serialize};

/// Canonical site a visit takes place at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "site", rename_all = "snake_case")]
pub enum Site {
    #[default]
    BarwaTowers,
    MarinaFifty,
    Element,
}

impl Site {
    /// Maps a free-text location string to a canonical site.
    ///
    /// Case-insensitive substring matching against a small fixed table.
    /// Unmatched input falls back to the default site rather than failing.
    pub fn normalize(raw: &str) -> Site {
        let needle = raw.to_lowercase();

        if needle.contains("barwa") {
            Site::BarwaTowers
        } else if needle.contains("marina") && needle.contains("50") {
            Site::MarinaFifty
        } else if needle.contains("element") || needle.contains("elemant") {
            Site::Element
        } else {
            Site::default()
        }
    }

    /// Canonical wire name, matching the database enum value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Site::BarwaTowers => "barwa_towers",
            Site::MarinaFifty => "marina_fifty",
            Site::Element => "element",
        }
    }

    /// Human-readable site name for notifications and displays.
    pub fn display_name(&self) -> &'static str {
        match self {
            Site::BarwaTowers => "Barwa Towers",
            Site::MarinaFifty => "Marina 50",
            Site::Element => "Element",
        }
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_barwa() {
        assert_eq!(Site::normalize("Barwa Towers, floor 12"), Site::BarwaTowers);
        assert_eq!(Site::normalize("BARWA"), Site::BarwaTowers);
    }

    #[test]
    fn test_normalize_marina_requires_both_parts() {
        assert_eq!(Site::normalize("Marina 50"), Site::MarinaFifty);
        assert_eq!(Site::normalize("marina tower 50"), Site::MarinaFifty);
        // "marina" alone does not match and falls through to the default
        assert_eq!(Site::normalize("Marina district"), Site::BarwaTowers);
    }

    #[test]
    fn test_normalize_element_and_misspelling() {
        assert_eq!(Site::normalize("Element"), Site::Element);
        assert_eq!(Site::normalize("the elemant building"), Site::Element);
    }

    #[test]
    fn test_normalize_unmatched_falls_back_to_default() {
        assert_eq!(Site::normalize("somewhere else"), Site::default());
        assert_eq!(Site::normalize(""), Site::default());
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(Site::MarinaFifty.to_string(), "marina_fifty");
        assert_eq!(Site::BarwaTowers.as_str(), "barwa_towers");
    }

    #[test]
    fn test_display_name_is_human_readable() {
        assert_eq!(Site::MarinaFifty.display_name(), "Marina 50");
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Site::BarwaTowers).unwrap();
        assert_eq!(json, "\"barwa_towers\"");
        let parsed: Site = serde_json::from_str("\"element\"").unwrap();
        assert_eq!(parsed, Site::Element);
    }
}
