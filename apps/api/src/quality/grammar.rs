//! Grammar scoring on top of a pluggable checker backend.
//!
//! `GrammarEngine` owns normalisation and resilience: it rejects empty input,
//! bounds every backend call with a timeout, and treats a failing backend as
//! "no issues found". Scores are always 0–100.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::sections::validator::round2;
use crate::sections::{SectionKind, SectionMap};

/// Density is scaled by this factor before it is subtracted from 1.
const DENSITY_WEIGHT: f64 = 0.8;

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("Text cannot be empty")]
    EmptyText,

    #[error("grammar backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("grammar backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("grammar backend timed out after {0:?}")]
    Timeout(Duration),
}

/// One issue reported by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarIssue {
    pub sentence: String,
    pub suggestions: Vec<String>,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub offset: usize,
    pub length: usize,
    pub message: String,
}

#[async_trait]
pub trait GrammarChecker: Send + Sync {
    async fn check(&self, text: &str) -> Result<Vec<GrammarIssue>, GrammarError>;

    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// Backends
// ────────────────────────────────────────────────────────────────────────────

/// Backend used when no grammar service is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChecker;

#[async_trait]
impl GrammarChecker for NoopChecker {
    async fn check(&self, _text: &str) -> Result<Vec<GrammarIssue>, GrammarError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// LanguageTool HTTP API (`POST /v2/check`).
#[derive(Debug, Clone)]
pub struct LanguageToolChecker {
    client: Client,
    base_url: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<CheckMatch>,
}

#[derive(Debug, Deserialize)]
struct CheckMatch {
    message: String,
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<Replacement>,
    #[serde(default)]
    sentence: Option<String>,
    #[serde(default)]
    context: Option<MatchContext>,
    #[serde(default)]
    rule: Option<MatchRule>,
}

#[derive(Debug, Deserialize)]
struct Replacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct MatchContext {
    text: String,
}

#[derive(Debug, Deserialize)]
struct MatchRule {
    #[serde(rename = "issueType")]
    issue_type: Option<String>,
}

impl From<CheckMatch> for GrammarIssue {
    fn from(m: CheckMatch) -> Self {
        let sentence = m
            .context
            .map(|c| c.text)
            .or(m.sentence)
            .unwrap_or_default();
        GrammarIssue {
            sentence,
            suggestions: m.replacements.into_iter().map(|r| r.value).collect(),
            issue_type: m
                .rule
                .and_then(|r| r.issue_type)
                .unwrap_or_else(|| "grammar".to_string()),
            offset: m.offset,
            length: m.length,
            message: m.message,
        }
    }
}

impl LanguageToolChecker {
    pub fn new(
        base_url: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GrammarError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: language.into(),
        })
    }
}

#[async_trait]
impl GrammarChecker for LanguageToolChecker {
    async fn check(&self, text: &str) -> Result<Vec<GrammarIssue>, GrammarError> {
        let url = format!("{}/v2/check", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GrammarError::Backend { status, body });
        }

        let parsed: CheckResponse = response.json().await?;
        Ok(parsed.matches.into_iter().map(GrammarIssue::from).collect())
    }

    fn name(&self) -> &'static str {
        "languagetool"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarResult {
    /// Detailed issues, at most the engine's `max_errors`.
    pub errors: Vec<GrammarIssue>,
    pub total_errors: usize,
    /// 0–100, two decimals.
    pub score: f64,
    pub word_count: usize,
    /// Errors per 100 words.
    pub error_density: f64,
}

impl GrammarResult {
    fn blank() -> Self {
        Self {
            errors: Vec::new(),
            total_errors: 0,
            score: 0.0,
            word_count: 0,
            error_density: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarSectionsResult {
    /// Unweighted mean of the section scores, truncated.
    pub overall_score: u32,
    pub section_results: BTreeMap<SectionKind, GrammarResult>,
    pub total_errors: usize,
}

/// Per-section grammar analysis as consumed by the feedback composer.
#[async_trait]
pub trait SectionGrammar: Send + Sync {
    async fn analyze_sections(
        &self,
        sections: &SectionMap,
    ) -> Result<GrammarSectionsResult, GrammarError>;
}

/// `100 * (1 - min(1, density * 0.8))` with `density = errors / max(1, words)`.
pub fn grammar_score(total_errors: usize, word_count: usize) -> f64 {
    let density = total_errors as f64 / word_count.max(1) as f64;
    round2(100.0 * (1.0 - (density * DENSITY_WEIGHT).min(1.0)))
}

#[derive(Clone)]
pub struct GrammarEngine {
    checker: Arc<dyn GrammarChecker>,
    max_errors: usize,
    call_timeout: Duration,
}

impl GrammarEngine {
    pub fn new(checker: Arc<dyn GrammarChecker>, max_errors: usize, call_timeout: Duration) -> Self {
        Self {
            checker,
            max_errors,
            call_timeout,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.checker.name()
    }

    /// Scores a single text. Empty or whitespace-only input is an error;
    /// backend failures are not.
    pub async fn analyze_text(&self, text: &str) -> Result<GrammarResult, GrammarError> {
        if text.trim().is_empty() {
            return Err(GrammarError::EmptyText);
        }
        Ok(self.score_text(text).await)
    }

    async fn score_text(&self, text: &str) -> GrammarResult {
        let issues = match self.checked(text).await {
            Ok(issues) => issues,
            Err(e) => {
                warn!(backend = self.checker.name(), error = %e, "grammar check failed, treating as no issues");
                Vec::new()
            }
        };

        let word_count = text.split_whitespace().count().max(1);
        let total_errors = issues.len();
        let density = total_errors as f64 / word_count as f64;

        GrammarResult {
            errors: issues.into_iter().take(self.max_errors).collect(),
            total_errors,
            score: grammar_score(total_errors, word_count),
            word_count,
            error_density: round2(density * 100.0),
        }
    }

    async fn checked(&self, text: &str) -> Result<Vec<GrammarIssue>, GrammarError> {
        match tokio::time::timeout(self.call_timeout, self.checker.check(text)).await {
            Ok(result) => result,
            Err(_) => Err(GrammarError::Timeout(self.call_timeout)),
        }
    }
}

#[async_trait]
impl SectionGrammar for GrammarEngine {
    async fn analyze_sections(
        &self,
        sections: &SectionMap,
    ) -> Result<GrammarSectionsResult, GrammarError> {
        let mut section_results = BTreeMap::new();
        let mut total_errors = 0;

        for (kind, content) in sections {
            let result = match self.analyze_text(content).await {
                Ok(result) => result,
                Err(_) => GrammarResult::blank(),
            };
            debug!(section = %kind, score = result.score, errors = result.total_errors, "grammar scored");
            total_errors += result.total_errors;
            section_results.insert(*kind, result);
        }

        let overall_score = if section_results.is_empty() {
            0
        } else {
            let sum: f64 = section_results.values().map(|r| r.score).sum();
            (sum / section_results.len() as f64) as u32
        };

        Ok(GrammarSectionsResult {
            overall_score,
            section_results,
            total_errors,
        })
    }
}
