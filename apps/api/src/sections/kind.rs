use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical resume section identifiers. Declaration order is the iteration
/// order used by header matching (first match wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Education,
    Skills,
    Experience,
    Projects,
    Contact,
    Summary,
}

/// Merged section content keyed by kind. Kinds with no content are absent.
pub type SectionMap = BTreeMap<SectionKind, String>;

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Projects,
        SectionKind::Contact,
        SectionKind::Summary,
    ];

    /// Sections that count towards the completeness score.
    pub const REQUIRED: [SectionKind; 4] = [
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Projects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Experience => "experience",
            SectionKind::Projects => "projects",
            SectionKind::Contact => "contact",
            SectionKind::Summary => "summary",
        }
    }

    /// Capitalised name used at the start of user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Experience => "Experience",
            SectionKind::Projects => "Projects",
            SectionKind::Contact => "Contact",
            SectionKind::Summary => "Summary",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }

    /// Parses a canonical name. Unknown names are `None`, not an error.
    #[allow(dead_code)]
    pub fn parse(name: &str) -> Option<SectionKind> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical section after merging every occurrence of its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBlock {
    pub kind: SectionKind,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(SectionKind::parse("Skills"), Some(SectionKind::Skills));
        assert_eq!(SectionKind::parse(" PROJECTS "), Some(SectionKind::Projects));
    }

    #[test]
    fn test_parse_unknown_is_none() {
        assert_eq!(SectionKind::parse("hobbies"), None);
    }

    #[test]
    fn test_required_excludes_contact_and_summary() {
        assert!(!SectionKind::Contact.is_required());
        assert!(!SectionKind::Summary.is_required());
        assert!(SectionKind::Experience.is_required());
    }

    #[test]
    fn test_serializes_as_snake_case_map_key() {
        let mut map = SectionMap::new();
        map.insert(SectionKind::Skills, "Rust".to_string());
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"skills":"Rust"}"#);
    }
}
