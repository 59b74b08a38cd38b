//! Job fit scoring: pluggable, trait-based scorer that measures a segmented
//! resume against parsed job requirements.
//!
//! Default: `KeywordJobFitScorer` (rule-based, deterministic). `AppState` holds
//! an `Arc<dyn JobFitScorer>`.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::jd_parser::{DegreeLevel, EducationRequirement, JobRequirements};
use crate::matching::skill_matcher::{SkillMatchDetail, SkillMatcher};
use crate::sections::{SectionKind, SectionMap};

const SKILL_WEIGHT: f64 = 0.60;
const EXPERIENCE_WEIGHT: f64 = 0.20;
const EDUCATION_WEIGHT: f64 = 0.20;

/// Years credited per job title mention when the resume states no number.
const YEARS_PER_ROLE: u32 = 2;
const ROLE_TITLES: &[&str] = &["engineer", "developer", "analyst", "manager"];

static YEARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*\+?\s*(?:years?|yrs?)").expect("valid regex"));

static SKILL_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|•\n]+").expect("valid regex"));

// ────────────────────────────────────────────────────────────────────────────
// Input / output data models
// ────────────────────────────────────────────────────────────────────────────

/// The parts of a resume the scorer looks at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeProfile {
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
}

impl ResumeProfile {
    pub fn from_sections(sections: &SectionMap) -> Self {
        let skills = sections
            .get(&SectionKind::Skills)
            .map(|s| split_skills(s))
            .unwrap_or_default();
        Self {
            skills,
            experience: sections
                .get(&SectionKind::Experience)
                .cloned()
                .unwrap_or_default(),
            education: sections
                .get(&SectionKind::Education)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

/// "Languages: Rust, Go\n- Docker" → ["Rust", "Go", "Docker"]
fn split_skills(text: &str) -> Vec<String> {
    SKILL_SPLIT_RE
        .split(text)
        .map(|item| item.rsplit(':').next().unwrap_or(item))
        .map(|item| item.trim().trim_start_matches(['-', '*']).trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitCategory {
    #[serde(rename = "Excellent Fit")]
    Excellent,
    #[serde(rename = "Good Fit")]
    Good,
    #[serde(rename = "Moderate Fit")]
    Moderate,
    #[serde(rename = "Poor Fit")]
    Poor,
}

impl FitCategory {
    pub fn from_percentage(fit: f64) -> Self {
        if fit >= 80.0 {
            FitCategory::Excellent
        } else if fit >= 60.0 {
            FitCategory::Good
        } else if fit >= 40.0 {
            FitCategory::Moderate
        } else {
            FitCategory::Poor
        }
    }
}

/// Full fit report returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFitReport {
    pub fit_percentage: f64, // 0-100, one decimal
    pub fit_category: FitCategory,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub skill_match_percentage: f64,
    pub experience_match_percentage: f64,
    pub education_match_percentage: f64,
    pub recommendations: Vec<String>,
    pub explanation: String,
    pub match_details: Vec<SkillMatchDetail>,
    pub scorer_backend: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait JobFitScorer: Send + Sync {
    async fn score(
        &self,
        resume: &ResumeProfile,
        requirements: &JobRequirements,
    ) -> Result<JobFitReport, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordJobFitScorer (default)
// ────────────────────────────────────────────────────────────────────────────

/// Weighted fit: skills 60 %, experience 20 %, education 20 %.
///
/// A dimension the JD says nothing about (no skills, no years, no degree)
/// contributes 0 rather than being dropped from the weighting.
#[derive(Default)]
pub struct KeywordJobFitScorer {
    matcher: SkillMatcher,
}

#[async_trait]
impl JobFitScorer for KeywordJobFitScorer {
    async fn score(
        &self,
        resume: &ResumeProfile,
        requirements: &JobRequirements,
    ) -> Result<JobFitReport, AppError> {
        Ok(self.compute(resume, requirements))
    }
}

impl KeywordJobFitScorer {
    fn compute(&self, resume: &ResumeProfile, requirements: &JobRequirements) -> JobFitReport {
        let skill_match = self
            .matcher
            .match_skills(&resume.skills, &requirements.required_skills);

        let skill_pct = if skill_match.total_required == 0 {
            0.0
        } else {
            100.0 * skill_match.match_count as f64 / skill_match.total_required as f64
        };
        let experience_pct =
            experience_match(&resume.experience, requirements.required_experience_years);
        let education_pct = education_match(&resume.education, &requirements.required_education);

        let overall = skill_pct * SKILL_WEIGHT
            + experience_pct * EXPERIENCE_WEIGHT
            + education_pct * EDUCATION_WEIGHT;

        JobFitReport {
            fit_percentage: round1(overall),
            fit_category: FitCategory::from_percentage(overall),
            recommendations: build_recommendations(&skill_match.missing_skills),
            explanation: build_explanation(overall, skill_pct, experience_pct, education_pct),
            matched_skills: skill_match.matched_skills,
            missing_skills: skill_match.missing_skills,
            skill_match_percentage: round1(skill_pct),
            experience_match_percentage: round1(experience_pct),
            education_match_percentage: round1(education_pct),
            match_details: skill_match.match_details,
            scorer_backend: "keyword".to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dimension scores
// ────────────────────────────────────────────────────────────────────────────

fn experience_match(experience: &str, required_years: u32) -> f64 {
    if required_years == 0 {
        return 0.0;
    }

    let lower = experience.trim().to_lowercase();
    let estimated = if lower.is_empty() || matches!(lower.as_str(), "no experience" | "none" | "n/a")
    {
        0
    } else if let Some(years) = YEARS_RE
        .captures(&lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
    {
        years
    } else {
        let roles: usize = ROLE_TITLES.iter().map(|t| lower.matches(t).count()).sum();
        roles as u32 * YEARS_PER_ROLE
    };

    (100.0 * estimated as f64 / required_years as f64).min(100.0)
}

fn education_match(education: &str, required: &EducationRequirement) -> f64 {
    if !required.degree_required {
        return 0.0;
    }
    let lower = education.to_lowercase();
    if lower.trim().is_empty() {
        return 0.0;
    }

    let level_terms: &[&str] = match required.degree_level {
        Some(DegreeLevel::Bachelor) => &["bachelor", "bs", "b.tech", "btech"],
        Some(DegreeLevel::Master) => &["master", "ms", "m.tech", "mtech"],
        Some(DegreeLevel::Phd) => &["phd", "doctorate"],
        None => &[],
    };
    if level_terms.iter().any(|t| lower.contains(t)) {
        return 100.0;
    }

    const DEGREE_TERMS: &[&str] = &["degree", "bachelor", "master", "bs", "ms", "b.tech", "m.tech"];
    if DEGREE_TERMS.iter().any(|t| lower.contains(t)) {
        75.0
    } else {
        50.0
    }
}

fn build_recommendations(missing: &[String]) -> Vec<String> {
    if missing.is_empty() {
        return vec!["Your resume matches all required skills! Great job!".to_string()];
    }
    if missing.len() <= 3 {
        return missing
            .iter()
            .map(|skill| {
                format!(
                    "Add {skill} experience to strengthen your profile. Consider taking online courses or building a project."
                )
            })
            .collect();
    }

    let rest: Vec<&str> = missing.iter().skip(3).take(3).map(String::as_str).collect();
    vec![
        format!(
            "Focus on acquiring these critical skills: {}",
            missing[..3].join(", ")
        ),
        format!("Additional skills to consider: {}", rest.join(", ")),
    ]
}

fn build_explanation(overall: f64, skill: f64, experience: f64, education: f64) -> String {
    let mut parts = vec![format!(
        "Your resume shows a {overall:.1}% match with this position."
    )];
    if skill < 60.0 {
        parts.push(format!(
            "Your skill match is {skill:.1}%, which could be improved by acquiring the missing technical skills."
        ));
    } else {
        parts.push(format!("You have a strong skill match at {skill:.1}%."));
    }
    if experience > 0.0 && experience < 80.0 {
        parts.push(format!(
            "Your experience level ({experience:.1}% match) may need additional development."
        ));
    }
    if education > 0.0 && education < 100.0 {
        parts.push("Consider highlighting relevant education or certifications.".to_string());
    }
    parts.join(" ")
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
