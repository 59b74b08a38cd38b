pub mod fit_scoring;
pub mod jd_parser;
pub mod skill_matcher;

pub use fit_scoring::{JobFitReport, JobFitScorer, KeywordJobFitScorer, ResumeProfile};
pub use jd_parser::parse_job_description;
