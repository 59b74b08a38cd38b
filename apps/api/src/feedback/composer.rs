//! Feedback & score composer.
//!
//! Builds strengths and suggestions from the structural checks, folds in the
//! action-verb and grammar analyses, and computes the final 0–100 score:
//!
//! ```text
//! quality = 0.60 * penalized_completeness + 0.30 * verbs + 0.10 * grammar
//! final   = job_fit > 0 ? (quality + job_fit) / 2 : quality
//! ```
//!
//! The grammar step is the only fallible one. It is bounded by a time budget
//! and any failure is recorded in the report instead of aborting composition.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::feedback::suggestions::{
    incomplete_sections, strengths, structural_suggestions, IncompleteSection, ACHIEVEMENTS_TIP,
};
use crate::quality::{
    ActionVerbAnalyzer, GrammarResult, GrammarSectionsResult, SectionGrammar, VerbAggregate,
};
use crate::sections::completeness::DEFAULT_MIN_WORDS;
use crate::sections::{SectionKind, SectionMap, ValidationResult};

pub const MAX_SUGGESTIONS: usize = 5;
const MAX_TOP_ERRORS: usize = 5;
const PENALTY_PER_ISSUE: f64 = 15.0;

const COMPLETENESS_WEIGHT: f64 = 0.60;
const VERB_WEIGHT: f64 = 0.30;
const GRAMMAR_WEIGHT: f64 = 0.10;

const GRAMMAR_UNAVAILABLE: &str = "Grammar analysis unavailable";

// ────────────────────────────────────────────────────────────────────────────
// Report data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopGrammarError {
    pub section: SectionKind,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub sentence: String,
    pub suggestion: String,
}

/// Grammar outcome as attached to the report. On failure only `score`,
/// `error` and `message` carry information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarBlock {
    /// 0–100.
    pub score: u32,
    pub total_errors: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub section_analysis: BTreeMap<SectionKind, GrammarResult>,
    #[serde(default)]
    pub top_errors: Vec<TopGrammarError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GrammarBlock {
    fn from_analysis(analysis: GrammarSectionsResult) -> Self {
        let top_errors = analysis
            .section_results
            .iter()
            .flat_map(|(kind, result)| {
                result.errors.iter().take(MAX_TOP_ERRORS).map(|e| TopGrammarError {
                    section: *kind,
                    issue_type: e.issue_type.clone(),
                    sentence: e.sentence.clone(),
                    suggestion: e.suggestions.first().cloned().unwrap_or_default(),
                })
            })
            .take(MAX_TOP_ERRORS)
            .collect();

        Self {
            score: analysis.overall_score,
            total_errors: analysis.total_errors,
            section_analysis: analysis.section_results,
            top_errors,
            error: None,
            message: None,
        }
    }

    fn unavailable(reason: String) -> Self {
        Self {
            score: 0,
            total_errors: 0,
            section_analysis: BTreeMap::new(),
            top_errors: Vec::new(),
            error: Some(reason),
            message: Some(GRAMMAR_UNAVAILABLE.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub strengths: Vec<String>,
    pub incomplete_sections: Vec<IncompleteSection>,
    pub missing_sections: Vec<SectionKind>,
    /// At most [`MAX_SUGGESTIONS`].
    pub suggestions: Vec<String>,
    pub overall_score: u32,
    /// Raw completeness before the per-issue penalty.
    pub completeness_percentage: f64,
    pub penalized_completeness: f64,
    /// Absent when grammar was not requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<GrammarBlock>,
    pub action_verbs: VerbAggregate,
}

// ────────────────────────────────────────────────────────────────────────────
// Composer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct FeedbackComposer {
    grammar: Arc<dyn SectionGrammar>,
    verbs: ActionVerbAnalyzer,
    grammar_budget: Duration,
    min_words: usize,
}

impl FeedbackComposer {
    pub fn new(grammar: Arc<dyn SectionGrammar>, grammar_budget: Duration) -> Self {
        Self {
            grammar,
            verbs: ActionVerbAnalyzer::default(),
            grammar_budget,
            min_words: DEFAULT_MIN_WORDS,
        }
    }

    pub async fn compose(
        &self,
        sections: &SectionMap,
        validation: &ValidationResult,
        include_grammar: bool,
    ) -> FeedbackReport {
        let incomplete = incomplete_sections(sections, self.min_words);
        let mut suggestions = structural_suggestions(&incomplete, validation);

        let completeness_percentage = validation.completeness_score;
        let penalty = PENALTY_PER_ISSUE * suggestions.len() as f64;
        let penalized_completeness = (completeness_percentage - penalty).max(0.0);

        if suggestions.is_empty() && validation.has_all_required {
            suggestions.push(ACHIEVEMENTS_TIP.to_string());
        }

        let grammar = if include_grammar {
            Some(self.grammar_block(sections).await)
        } else {
            info!("grammar analysis skipped");
            None
        };

        if let Some(block) = grammar.as_ref().filter(|b| b.total_errors > 0) {
            suggestions.insert(
                0,
                format!(
                    "Review {} grammar/spelling issues in your resume.",
                    block.total_errors
                ),
            );
        }

        let action_verbs = self.verbs.analyze_sections(sections);
        if action_verbs.total_weak_verbs > 0 {
            suggestions.extend(action_verbs.suggestions.iter().cloned());
        }
        suggestions.truncate(MAX_SUGGESTIONS);

        let grammar_score = grammar.as_ref().map_or(0.0, |b| b.score as f64);
        let overall_score = calculate_final_score(
            penalized_completeness,
            action_verbs.overall_score,
            grammar_score,
            validation.keyword_match_score,
        );
        info!(
            overall_score,
            penalized_completeness,
            verb_score = action_verbs.overall_score,
            grammar_score,
            "feedback composed"
        );

        FeedbackReport {
            strengths: strengths(validation),
            incomplete_sections: incomplete,
            missing_sections: validation.missing_sections.clone(),
            suggestions,
            overall_score,
            completeness_percentage,
            penalized_completeness,
            grammar,
            action_verbs,
        }
    }

    async fn grammar_block(&self, sections: &SectionMap) -> GrammarBlock {
        match tokio::time::timeout(self.grammar_budget, self.grammar.analyze_sections(sections)).await
        {
            Ok(Ok(analysis)) => GrammarBlock::from_analysis(analysis),
            Ok(Err(e)) => {
                error!("Grammar analysis failed: {e}. Scoring without grammar.");
                GrammarBlock::unavailable(e.to_string())
            }
            Err(_) => {
                error!(
                    "Grammar analysis exceeded {:?}. Scoring without grammar.",
                    self.grammar_budget
                );
                GrammarBlock::unavailable(format!(
                    "grammar analysis timed out after {:?}",
                    self.grammar_budget
                ))
            }
        }
    }
}

/// All inputs are on a 0–100 scale and clamped before weighting.
pub fn calculate_final_score(
    penalized_completeness: f64,
    verb_score: f64,
    grammar_score: f64,
    job_fit: f64,
) -> u32 {
    let completeness = penalized_completeness.clamp(0.0, 100.0);
    let verbs = verb_score.clamp(0.0, 100.0);
    let grammar = grammar_score.clamp(0.0, 100.0);
    let job_fit = job_fit.clamp(0.0, 100.0);

    let quality =
        COMPLETENESS_WEIGHT * completeness + VERB_WEIGHT * verbs + GRAMMAR_WEIGHT * grammar;
    let combined = if job_fit > 0.0 {
        (quality + job_fit) / 2.0
    } else {
        quality
    };

    combined.clamp(0.0, 100.0).round() as u32
}
