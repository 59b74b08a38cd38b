use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::matching::jd_parser::title_case;

/// Canonical skill → accepted spellings.
const SKILL_SYNONYMS: &[(&str, &[&str])] = &[
    ("javascript", &["js", "ecmascript", "javascript"]),
    ("typescript", &["ts", "typescript"]),
    ("react", &["reactjs", "react.js", "react"]),
    ("nodejs", &["node", "node.js", "nodejs"]),
    ("python", &["python", "python3", "py"]),
    ("postgresql", &["postgres", "postgresql", "psql"]),
    ("mongodb", &["mongo", "mongodb"]),
    ("docker", &["docker", "containerization"]),
    ("kubernetes", &["k8s", "kube", "kubernetes"]),
    ("aws", &["amazon web services", "aws"]),
    ("gcp", &["google cloud", "gcp", "google cloud platform"]),
    ("azure", &["microsoft azure", "azure"]),
    ("machine learning", &["ml", "machine learning"]),
    ("artificial intelligence", &["ai", "artificial intelligence"]),
    ("c++", &["cpp", "c++", "cplusplus"]),
    ("c#", &["csharp", "c#"]),
];

/// Normalised edit similarity a pair must exceed to count as a partial match.
const PARTIAL_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Synonym,
    Partial,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchDetail {
    pub skill: String,
    pub match_type: MatchType,
    pub in_resume: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub match_details: Vec<SkillMatchDetail>,
    pub match_count: usize,
    pub total_required: usize,
}

struct Skill {
    raw: String,
    canonical: String,
}

pub struct SkillMatcher {
    synonyms: HashMap<&'static str, &'static str>,
}

impl Default for SkillMatcher {
    fn default() -> Self {
        let synonyms = SKILL_SYNONYMS
            .iter()
            .flat_map(|(canonical, spellings)| spellings.iter().map(move |s| (*s, *canonical)))
            .collect();
        Self { synonyms }
    }
}

impl SkillMatcher {
    pub fn canonicalize(&self, skill: &str) -> String {
        let lowered = skill.trim().to_lowercase();
        match self.synonyms.get(lowered.as_str()) {
            Some(canonical) => canonical.to_string(),
            None => lowered,
        }
    }

    /// Matches every required skill against the resume skills, trying exact
    /// spelling, then synonyms, then edit similarity.
    pub fn match_skills(&self, resume_skills: &[String], required_skills: &[String]) -> SkillMatch {
        let resume: Vec<Skill> = resume_skills
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| self.skill(s))
            .collect();

        let mut seen = BTreeSet::new();
        let required: Vec<Skill> = required_skills
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| self.skill(s))
            .filter(|s| seen.insert(s.canonical.clone()))
            .collect();

        let mut matched = BTreeSet::new();
        let mut missing = BTreeSet::new();
        let mut match_details = Vec::with_capacity(required.len());

        for req in &required {
            let match_type = best_match(req, &resume);
            let display = title_case(&req.canonical);
            let in_resume = match_type != MatchType::None;
            if in_resume {
                matched.insert(display.clone());
            } else {
                missing.insert(display.clone());
            }
            match_details.push(SkillMatchDetail {
                skill: display,
                match_type,
                in_resume,
            });
        }

        SkillMatch {
            match_count: matched.len(),
            total_required: required.len(),
            matched_skills: matched.into_iter().collect(),
            missing_skills: missing.into_iter().collect(),
            match_details,
        }
    }

    fn skill(&self, s: &str) -> Skill {
        Skill {
            raw: s.trim().to_lowercase(),
            canonical: self.canonicalize(s),
        }
    }
}

fn best_match(req: &Skill, resume: &[Skill]) -> MatchType {
    if resume.iter().any(|r| r.raw == req.raw) {
        MatchType::Exact
    } else if resume.iter().any(|r| r.canonical == req.canonical) {
        MatchType::Synonym
    } else if resume
        .iter()
        .any(|r| strsim::normalized_levenshtein(&r.canonical, &req.canonical) > PARTIAL_THRESHOLD)
    {
        MatchType::Partial
    } else {
        MatchType::None
    }
}
