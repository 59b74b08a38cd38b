//! JD parser. Extracts required skills, education, experience years and
//! responsibilities from a raw job description with fixed rules.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const PROGRAMMING_LANGUAGES: &[&str] = &[
    "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "go", "rust", "php",
    "swift", "kotlin", "scala", "r",
];

const FRAMEWORKS: &[&str] = &[
    "react", "angular", "vue", "django", "flask", "spring", "express", "fastapi", "nodejs",
    "nextjs", "nuxt", "laravel", "rails",
];

const DATABASES: &[&str] = &[
    "mysql", "postgresql", "mongodb", "redis", "cassandra", "oracle", "sql server", "dynamodb",
    "elasticsearch", "sqlite",
];

const CLOUD_TOOLS: &[&str] = &[
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "terraform", "ansible", "gitlab",
    "github actions", "circleci",
];

const MAX_RESPONSIBILITIES: usize = 10;

static BACHELOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"bachelor'?s?\s+(?:degree\s+)?(?:in\s+)?([a-z][a-z \t]*)").expect("valid regex")
});

static MASTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"master'?s?\s+(?:degree\s+)?(?:in\s+)?([a-z][a-z \t]*)").expect("valid regex")
});

static FIELD_STOP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s(?:or|and|with|from|preferred|required)\b").expect("valid regex"));

static DOCTORATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:phd|ph\.d|doctorate)\b").expect("valid regex"));

static DEGREE_ABBREV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:bs|ms|mba|btech|mtech)\b").expect("valid regex"));

static EXPERIENCE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    // Ranges first so "3-5 years" yields the lower bound.
    [
        r"(\d+)\s*-\s*(\d+)\s*(?:years?|yrs?)",
        r"(\d+)\+?\s*(?:to\s+\d+)?\s*(?:years?|yrs?)",
        r"minimum\s+(\d+)\s*(?:years?|yrs?)",
        r"at\s+least\s+(\d+)\s*(?:years?|yrs?)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-•*]|\d+\.)\s+").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegreeLevel {
    #[serde(rename = "Bachelor's")]
    Bachelor,
    #[serde(rename = "Master's")]
    Master,
    #[serde(rename = "PhD")]
    Phd,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationRequirement {
    pub degree_required: bool,
    pub degree_level: Option<DegreeLevel>,
    pub field_of_study: Option<String>,
}

/// Structured requirements extracted from a job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    /// Display names, sorted.
    pub required_skills: Vec<String>,
    pub required_education: EducationRequirement,
    /// 0 when the JD states no number of years.
    pub required_experience_years: u32,
    pub responsibilities: Vec<String>,
    pub total_requirements: usize,
}

pub fn parse_job_description(jd_text: &str) -> JobRequirements {
    let lower = jd_text.to_lowercase();
    let required_skills = extract_skills(&lower);

    JobRequirements {
        total_requirements: required_skills.len(),
        required_skills,
        required_education: extract_education(&lower),
        required_experience_years: extract_experience_years(&lower),
        responsibilities: extract_responsibilities(jd_text),
    }
}

fn extract_skills(lower: &str) -> Vec<String> {
    let mut found = BTreeSet::new();

    for skill in PROGRAMMING_LANGUAGES.iter().chain(FRAMEWORKS).chain(DATABASES) {
        if contains_term(lower, skill) {
            found.insert(title_case(skill));
        }
    }
    for skill in CLOUD_TOOLS {
        if contains_term(lower, skill) {
            found.insert(if skill.len() <= 3 {
                skill.to_uppercase()
            } else {
                title_case(skill)
            });
        }
    }

    found.into_iter().collect()
}

/// Occurrence of `term` not glued to another word character on either side.
/// Symbols inside the term (`c++`, `c#`) are matched literally.
pub(crate) fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + term.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Uppercases the first letter of every alphabetic run, like `str.title()`.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn extract_education(lower: &str) -> EducationRequirement {
    let with_field = |re: &Regex, level: DegreeLevel| {
        re.captures(lower).map(|caps| EducationRequirement {
            degree_required: true,
            degree_level: Some(level),
            field_of_study: caps.get(1).and_then(|m| field_of_study(m.as_str())),
        })
    };

    if let Some(req) = with_field(&BACHELOR_RE, DegreeLevel::Bachelor) {
        return req;
    }
    if let Some(req) = with_field(&MASTER_RE, DegreeLevel::Master) {
        return req;
    }
    if DOCTORATE_RE.is_match(lower) {
        return EducationRequirement {
            degree_required: true,
            degree_level: Some(DegreeLevel::Phd),
            field_of_study: None,
        };
    }
    if DEGREE_ABBREV_RE.is_match(lower) {
        return EducationRequirement {
            degree_required: true,
            degree_level: None,
            field_of_study: None,
        };
    }

    EducationRequirement::default()
}

/// "computer science or related field" → "Computer Science"
fn field_of_study(raw: &str) -> Option<String> {
    let cut = FIELD_STOP_RE.find(raw).map_or(raw, |m| &raw[..m.start()]);
    let field = cut.split_whitespace().collect::<Vec<_>>().join(" ");
    (!field.is_empty()).then(|| title_case(&field))
}

fn extract_experience_years(lower: &str) -> u32 {
    EXPERIENCE_RES
        .iter()
        .find_map(|re| re.captures(lower))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn extract_responsibilities(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            let m = BULLET_RE.find(line)?;
            let item = line[m.end()..].trim();
            (item.chars().count() > 10).then(|| item.to_string())
        })
        .take(MAX_RESPONSIBILITIES)
        .collect()
}
