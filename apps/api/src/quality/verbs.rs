//! Weak action-verb detection with stronger replacements.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::quality::tagger::{LexiconTagger, VerbTagger, WORD_RE};
use crate::sections::validator::round2;
use crate::sections::{SectionKind, SectionMap};

/// Weak verb → stronger alternative. Keys are matched on the lowercased
/// surface form first, then on the lemma.
pub const WEAK_TO_STRONG: &[(&str, &str)] = &[
    ("did", "executed"),
    ("do", "execute"),
    ("done", "implemented"),
    ("work", "developed"),
    ("worked", "engineered"),
    ("help", "assist"),
    ("helped", "supported"),
    ("helping", "collaborating"),
    ("build", "construct"),
    ("built", "architected"),
    ("make", "create"),
    ("made", "developed"),
    ("use", "utilize"),
    ("used", "leveraged"),
    ("manage", "lead"),
    ("managed", "supervised"),
    ("create", "design"),
    ("created", "engineered"),
];

/// Sections whose verbs are scored in aggregate.
pub const VERB_SECTIONS: [SectionKind; 2] = [SectionKind::Experience, SectionKind::Projects];

const WEAK_VERB_PENALTY: f64 = 1.2;

pub fn stronger_verb(word: &str) -> Option<&'static str> {
    WEAK_TO_STRONG
        .iter()
        .find(|(weak, _)| *weak == word)
        .map(|(_, strong)| *strong)
}

/// `100 - 1.2 * weak_ratio * 100`, floored at 0. No verbs scores 100.
pub fn action_verb_score(weak_verbs: usize, total_verbs: usize) -> f64 {
    if total_verbs == 0 {
        return 100.0;
    }
    let ratio = weak_verbs as f64 / total_verbs as f64;
    round2((100.0 - WEAK_VERB_PENALTY * ratio * 100.0).max(0.0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbAnalysisResult {
    /// Lowercased weak verbs in order of appearance.
    pub found: Vec<String>,
    /// Replacement for each entry of `found`, index-aligned.
    pub suggestions: Vec<String>,
    pub total_verbs: usize,
    pub weak_verbs: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbAggregate {
    pub overall_score: f64,
    pub section_scores: BTreeMap<SectionKind, f64>,
    pub total_verbs: usize,
    pub total_weak_verbs: usize,
    pub suggestions: Vec<String>,
}

#[derive(Clone)]
pub struct ActionVerbAnalyzer {
    tagger: Arc<dyn VerbTagger>,
}

impl Default for ActionVerbAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(LexiconTagger))
    }
}

impl ActionVerbAnalyzer {
    pub fn new(tagger: Arc<dyn VerbTagger>) -> Self {
        Self { tagger }
    }

    /// Finds weak verbs in `text`.
    ///
    /// Tagged verbs and auxiliaries are looked up by surface form, then lemma.
    /// A second whole-word pass catches weak keys the tagger did not mark as
    /// verbs; each such hit counts as one more verb.
    pub fn analyze(&self, text: &str) -> VerbAnalysisResult {
        let mut found = Vec::new();
        let mut suggestions = Vec::new();
        let mut total_verbs = 0;

        for token in self.tagger.tag(text).into_iter().filter(|t| t.is_verb_like()) {
            total_verbs += 1;
            let surface = token.text.to_lowercase();
            if let Some(strong) = stronger_verb(&surface).or_else(|| stronger_verb(&token.lemma)) {
                found.push(surface);
                suggestions.push(strong.to_string());
            }
        }

        let lowered = text.to_lowercase();
        for m in WORD_RE.find_iter(&lowered) {
            let word = m.as_str();
            if found.iter().any(|f| f == word) {
                continue;
            }
            if let Some(strong) = stronger_verb(word) {
                found.push(word.to_string());
                suggestions.push(strong.to_string());
                total_verbs += 1;
            }
        }

        let weak_verbs = found.len();
        VerbAnalysisResult {
            score: action_verb_score(weak_verbs, total_verbs),
            found,
            suggestions,
            total_verbs,
            weak_verbs,
        }
    }

    /// Scores the experience and projects sections. The overall score comes
    /// from the pooled counts and is 0 when neither section has any verb.
    pub fn analyze_sections(&self, sections: &SectionMap) -> VerbAggregate {
        let mut section_scores = BTreeMap::new();
        let mut suggestions = Vec::new();
        let mut total_verbs = 0;
        let mut total_weak_verbs = 0;

        for kind in VERB_SECTIONS {
            let Some(content) = sections.get(&kind) else {
                continue;
            };
            let result = self.analyze(content);
            total_verbs += result.total_verbs;
            total_weak_verbs += result.weak_verbs;
            section_scores.insert(kind, result.score);

            for (weak, strong) in result.found.iter().zip(&result.suggestions) {
                suggestions.push(format!(
                    "Replace weak verb '{weak}' with stronger '{strong}' in {kind} section."
                ));
            }
        }

        let overall_score = if total_verbs == 0 {
            0.0
        } else {
            action_verb_score(total_weak_verbs, total_verbs)
        };

        VerbAggregate {
            overall_score,
            section_scores,
            total_verbs,
            total_weak_verbs,
            suggestions,
        }
    }
}
