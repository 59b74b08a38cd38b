use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::feedback::{FeedbackComposer, FeedbackReport};
use crate::matching::{parse_job_description, JobFitReport, JobFitScorer, ResumeProfile};
use crate::sections::content_checks::{mask_contact_details, validate_content, ContentReport};
use crate::sections::history::{analyze_history, HistoryReport};
use crate::sections::{segment, validate, SectionMap, ValidationResult};

/// Input to one analysis run, also the body of `POST /api/v1/analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default = "default_include_grammar")]
    pub include_grammar: bool,
}

fn default_include_grammar() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Section bodies with contact values masked.
    pub sections: SectionMap,
    pub validation: ValidationResult,
    /// Contact values are masked.
    pub content: ContentReport,
    /// Length and employment-gap analysis.
    pub history: HistoryReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_fit: Option<JobFitReport>,
    pub feedback: FeedbackReport,
    pub analyzed_at: DateTime<Utc>,
}

/// Segment, validate, check content, score job fit when a description is
/// given, then compose feedback.
pub async fn run_analysis(
    composer: &FeedbackComposer,
    fit_scorer: &dyn JobFitScorer,
    request: &AnalysisRequest,
) -> Result<AnalysisResult, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Resume text cannot be empty".to_string(),
        ));
    }

    let sections = segment(&request.resume_text);
    let mut validation = validate(&sections);
    let content = validate_content(&request.resume_text).masked();
    let history = analyze_history(&request.resume_text, &sections, Utc::now().date_naive());
    debug!(
        sections = sections.len(),
        missing = validation.missing_sections.len(),
        "resume segmented"
    );

    let job_description = request
        .job_description
        .as_deref()
        .filter(|jd| !jd.trim().is_empty());

    let job_fit = match job_description {
        Some(jd) => {
            let requirements = parse_job_description(jd);
            let profile = ResumeProfile::from_sections(&sections);
            let report = fit_scorer.score(&profile, &requirements).await?;
            validation = validation.with_job_fit(report.fit_percentage);
            Some(report)
        }
        None => None,
    };

    let feedback = composer
        .compose(&sections, &validation, request.include_grammar)
        .await;

    info!(
        overall_score = feedback.overall_score,
        job_fit = job_fit.as_ref().map(|r| r.fit_percentage),
        employment_gaps = history.gaps.gap_count,
        grammar_available = feedback.grammar.as_ref().map(|g| g.is_available()),
        "analysis complete"
    );

    validation.merged_sections = mask_sections(&validation.merged_sections);

    Ok(AnalysisResult {
        sections: mask_sections(&sections),
        validation,
        content,
        history,
        job_fit,
        feedback,
        analyzed_at: Utc::now(),
    })
}

fn mask_sections(sections: &SectionMap) -> SectionMap {
    sections
        .iter()
        .map(|(kind, body)| (*kind, mask_contact_details(body)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::matching::KeywordJobFitScorer;
    use crate::quality::{GrammarEngine, NoopChecker};
    use crate::sections::history::WordCountStatus;
    use crate::sections::SectionKind;

    const RESUME: &str = "\
John Doe
john.doe@example.com | (555) 123-4567

EDUCATION
Bachelor of Science in Computer Science, State University, May 2020, GPA 3.8

SKILLS
Python, Rust, Docker, PostgreSQL, AWS, React, Kubernetes, Terraform, Git, Linux

EXPERIENCE
Software Engineer at Acme Corp, Jan 2021 - Present
Designed and launched a billing platform serving 2 million customers across regions
Led a team of five engineers to migrate services to Kubernetes in production

PROJECTS
Resume Analyzer: built a Rust service that scores resumes and reports feedback to users
";

    fn composer() -> FeedbackComposer {
        let engine = GrammarEngine::new(Arc::new(NoopChecker), 10, Duration::from_secs(1));
        FeedbackComposer::new(Arc::new(engine), Duration::from_secs(5))
    }

    fn request(text: &str, jd: Option<&str>) -> AnalysisRequest {
        AnalysisRequest {
            resume_text: text.to_string(),
            job_description: jd.map(str::to_string),
            include_grammar: false,
        }
    }

    #[tokio::test]
    async fn test_empty_resume_is_rejected() {
        let err = run_analysis(&composer(), &KeywordJobFitScorer::default(), &request("  ", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_analysis_without_job_description() {
        let result = run_analysis(&composer(), &KeywordJobFitScorer::default(), &request(RESUME, None))
            .await
            .unwrap();

        assert!(result.validation.has_all_required);
        assert!(result.sections.contains_key(&SectionKind::Skills));
        assert!(result.job_fit.is_none());
        assert_eq!(result.validation.keyword_match_score, 0.0);
        assert!(result.feedback.grammar.is_none());
        assert!(result.feedback.overall_score > 0);
    }

    #[tokio::test]
    async fn test_contact_details_are_masked() {
        let result = run_analysis(&composer(), &KeywordJobFitScorer::default(), &request(RESUME, None))
            .await
            .unwrap();
        let json = serde_json::to_string(&result.content).unwrap();
        assert!(!json.contains("john.doe@example.com"));
        assert!(!json.contains("(555) 123-4567"));
        assert_eq!(
            result.content.contact_info.phone_found.as_deref(),
            Some("(XXX) XXX-4567")
        );
    }

    #[tokio::test]
    async fn test_contact_section_is_masked_in_stored_sections() {
        let text = format!("CONTACT\njane.doe@example.com | (555) 123-4567\n{RESUME}");
        let result = run_analysis(&composer(), &KeywordJobFitScorer::default(), &request(&text, None))
            .await
            .unwrap();

        let contact = &result.sections[&SectionKind::Contact];
        assert!(contact.contains("j*****e@example.com"));
        assert!(contact.contains("(XXX) XXX-4567"));

        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("jane.doe@example.com"));
        assert!(!json.contains("john.doe@example.com"));
        assert!(!json.contains("123-4567"));
    }

    #[tokio::test]
    async fn test_history_reports_length_and_gaps() {
        let text = RESUME.replace(
            "Software Engineer at Acme Corp, Jan 2021 - Present",
            "Software Engineer at Acme Corp, Jan 2021 - Present\nJunior Developer at Globex, Mar 2018 - Jun 2019",
        );
        let result = run_analysis(&composer(), &KeywordJobFitScorer::default(), &request(&text, None))
            .await
            .unwrap();

        assert_eq!(result.history.length.status, WordCountStatus::TooShort);
        assert_eq!(result.history.gaps.gap_count, 1);
        let gap = &result.history.gaps.employment_gaps[0];
        assert_eq!(gap.gap_months, 19);
        assert_eq!(gap.previous_job, "Junior Developer at Globex");
        assert_eq!(gap.next_job, "Software Engineer at Acme Corp");
    }

    #[tokio::test]
    async fn test_job_description_feeds_keyword_score() {
        let jd = "Senior Backend Engineer\nRequirements:\n- 3+ years of experience with Python and Docker\n- Bachelor's degree in Computer Science";
        let result = run_analysis(&composer(), &KeywordJobFitScorer::default(), &request(RESUME, Some(jd)))
            .await
            .unwrap();

        let fit = result.job_fit.expect("job fit computed");
        assert!(fit.fit_percentage > 0.0);
        assert_eq!(result.validation.keyword_match_score, fit.fit_percentage);
    }

    #[tokio::test]
    async fn test_blank_job_description_is_ignored() {
        let result = run_analysis(&composer(), &KeywordJobFitScorer::default(), &request(RESUME, Some("   ")))
            .await
            .unwrap();
        assert!(result.job_fit.is_none());
    }

    #[test]
    fn test_request_defaults() {
        let req: AnalysisRequest = serde_json::from_str(r#"{"resume_text":"SKILLS\nRust"}"#).unwrap();
        assert!(req.include_grammar);
        assert!(req.job_description.is_none());
    }
}
