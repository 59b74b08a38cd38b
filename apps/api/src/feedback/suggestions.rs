//! Human-readable strengths and improvement suggestions.

use serde::{Deserialize, Serialize};

use crate::sections::completeness::check_completeness;
use crate::sections::{SectionKind, SectionMap, ValidationResult};

pub const ACHIEVEMENTS_TIP: &str =
    "Consider adding quantifiable achievements to strengthen your resume";

const NO_STRENGTHS_FALLBACK: &str = "Resume submitted. Analysis in progress.";

/// What a complete section of `kind` should contain.
pub fn section_suggestion(kind: SectionKind) -> String {
    match kind {
        SectionKind::Education => {
            "Add degree/qualification, institution name, graduation date, and GPA if relevant"
                .to_string()
        }
        SectionKind::Skills => {
            "List technical skills, tools, programming languages, and relevant certifications"
                .to_string()
        }
        SectionKind::Experience => {
            "Include job title, company name, dates, and 2-3 key achievements or responsibilities"
                .to_string()
        }
        SectionKind::Projects => {
            "Describe project name, technologies used, your role, and measurable outcomes"
                .to_string()
        }
        other => format!("Add more detailed information to {other} section"),
    }
}

/// A required section that exists but lacks detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncompleteSection {
    pub section: SectionKind,
    pub message: String,
    pub suggestion: String,
    pub word_count: usize,
}

/// Runs the completeness check over every required section present in `sections`.
pub fn incomplete_sections(sections: &SectionMap, min_words: usize) -> Vec<IncompleteSection> {
    sections
        .iter()
        .filter(|(kind, _)| kind.is_required())
        .filter_map(|(kind, content)| {
            let check = check_completeness(*kind, content, min_words);
            if check.is_complete {
                return None;
            }
            Some(IncompleteSection {
                section: *kind,
                message: check.reason.unwrap_or_default(),
                suggestion: section_suggestion(*kind),
                word_count: check.word_count,
            })
        })
        .collect()
}

/// Never empty.
pub fn strengths(validation: &ValidationResult) -> Vec<String> {
    if validation.has_all_required {
        return vec!["All required sections are present".to_string()];
    }
    if !validation.present_sections.is_empty() {
        let names: Vec<&str> = validation
            .present_sections
            .iter()
            .map(|k| k.as_str())
            .collect();
        return vec![format!(
            "Found {} sections: {}",
            names.len(),
            names.join(", ")
        )];
    }
    vec![NO_STRENGTHS_FALLBACK.to_string()]
}

/// One suggestion per incomplete section, then one per missing section.
pub fn structural_suggestions(
    incomplete: &[IncompleteSection],
    validation: &ValidationResult,
) -> Vec<String> {
    let fix_incomplete = incomplete
        .iter()
        .map(|item| format!("Complete {} section: {}", item.section, item.suggestion));
    let add_missing = validation
        .missing_sections
        .iter()
        .map(|kind| format!("Add {kind} section: {}", section_suggestion(*kind)));
    fix_incomplete.chain(add_missing).collect()
}
