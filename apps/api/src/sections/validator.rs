use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::sections::kind::{SectionKind, SectionMap};

/// Structural validation of a segmented resume against the required sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub present_sections: BTreeSet<SectionKind>,
    /// Required kinds with no content, sorted by name.
    pub missing_sections: Vec<SectionKind>,
    pub has_all_required: bool,
    /// 0–100, two decimals.
    pub completeness_score: f64,
    pub merged_sections: SectionMap,
    /// Job-fit score from the matching collaborator, 0 when no JD was given.
    #[serde(default)]
    pub keyword_match_score: f64,
}

impl ValidationResult {
    pub fn with_job_fit(mut self, score: f64) -> Self {
        self.keyword_match_score = score.clamp(0.0, 100.0);
        self
    }
}

pub fn validate(sections: &SectionMap) -> ValidationResult {
    let present_sections: BTreeSet<SectionKind> = sections.keys().copied().collect();

    let mut missing_sections: Vec<SectionKind> = SectionKind::REQUIRED
        .into_iter()
        .filter(|kind| !present_sections.contains(kind))
        .collect();
    missing_sections.sort_by_key(|kind| kind.as_str());

    let required = SectionKind::REQUIRED.len() as f64;
    let present_required = required - missing_sections.len() as f64;
    let completeness_score = round2(100.0 * present_required / required);

    ValidationResult {
        present_sections,
        has_all_required: missing_sections.is_empty(),
        missing_sections,
        completeness_score,
        merged_sections: sections.clone(),
        keyword_match_score: 0.0,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
