use serde::{Deserialize, Serialize};

use crate::sections::kind::SectionKind;
use crate::sections::synonyms::HeaderSynonymTable;

pub const DEFAULT_MIN_WORDS: usize = 10;

/// Filler words that never count towards a section's word count.
const FILLER_WORDS: &[&str] = &["the", "and", "for", "with"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Complete,
    Incomplete,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletenessCheck {
    pub is_complete: bool,
    pub reason: Option<String>,
    pub word_count: usize,
    pub status: SectionStatus,
}

/// Decides whether a section carries enough meaningful words.
///
/// Header phrases for `kind` are removed first; tokens of two characters or
/// fewer and filler words are ignored.
pub fn check_completeness(kind: SectionKind, content: &str, min_words: usize) -> CompletenessCheck {
    let word_count = meaningful_word_count(kind, content);
    let is_complete = word_count >= min_words;

    let reason = if is_complete {
        None
    } else if content.trim().is_empty() {
        Some(format!("{} section is empty", kind.label()))
    } else {
        Some(format!(
            "{} section has insufficient details. Currently {} words, aim for at least {}.",
            kind.label(),
            word_count,
            min_words
        ))
    };

    CompletenessCheck {
        is_complete,
        reason,
        word_count,
        status: if is_complete {
            SectionStatus::Complete
        } else {
            SectionStatus::Incomplete
        },
    }
}

fn meaningful_word_count(kind: SectionKind, content: &str) -> usize {
    let stripped = HeaderSynonymTable::standard().strip_header_phrases(kind, content);
    stripped
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .filter(|word| !FILLER_WORDS.contains(&word.to_lowercase().as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sufficient_content_is_complete() {
        let content = "SKILLS\nPython, JavaScript, React, FastAPI, Docker, Kubernetes,\nMachine Learning, TensorFlow, AWS, Git, CI/CD, PostgreSQL";
        let check = check_completeness(SectionKind::Skills, content, DEFAULT_MIN_WORDS);
        assert!(check.is_complete, "word_count={}", check.word_count);
        assert!(check.reason.is_none());
        assert_eq!(check.status, SectionStatus::Complete);
    }

    #[test]
    fn test_header_only_is_incomplete() {
        let check = check_completeness(SectionKind::Skills, "SKILLS\nPython", DEFAULT_MIN_WORDS);
        assert!(!check.is_complete);
        assert_eq!(check.word_count, 1);
    }

    #[test]
    fn test_empty_reason() {
        let check = check_completeness(SectionKind::Education, "   ", DEFAULT_MIN_WORDS);
        assert_eq!(check.reason.as_deref(), Some("Education section is empty"));
        assert_eq!(check.word_count, 0);
    }

    #[test]
    fn test_insufficient_reason_mentions_counts() {
        let check =
            check_completeness(SectionKind::Experience, "Software Engineer Google", 10);
        let reason = check.reason.unwrap();
        assert!(reason.contains("Currently 3 words"));
        assert!(reason.contains("at least 10"));
        assert!(reason.len() > 10);
    }

    #[test]
    fn test_short_tokens_and_fillers_ignored() {
        // "BS", "in", "at" are too short; "and", "the" are filler.
        let check = check_completeness(
            SectionKind::Education,
            "BS in CS and the MIT at Boston",
            DEFAULT_MIN_WORDS,
        );
        assert_eq!(check.word_count, 2);
    }

    #[test]
    fn test_zero_meaningful_words_in_nonempty_content() {
        let check = check_completeness(SectionKind::Education, "BS CS", DEFAULT_MIN_WORDS);
        assert!(!check.is_complete);
        assert!(check.reason.unwrap().contains("insufficient details"));
    }

    #[test]
    fn test_custom_min_words() {
        let check = check_completeness(SectionKind::Projects, "Resume Analyzer tool", 3);
        assert!(check.is_complete);
    }
}
