//! Header canonicalisation. Maps a single line of resume text to a canonical
//! [`SectionKind`] using a static synonym table.
//!
//! A line is treated as a header only when a synonym phrase occupies the start
//! of the line. The remainder after the phrase must be empty, begin with a
//! joining separator (`&`, `/`), be a dated parenthetical (`(2019 - Present)`),
//! or the line must be written in capitals (`EXPERIENCE SUMMARY`). Label lines
//! such as `Skills: Rust`, `Skills - Rust` or `Skills | Rust` are content.

use std::sync::LazyLock;

use regex::Regex;

use crate::sections::kind::SectionKind;

/// Header lines longer than this are treated as content.
const MAX_HEADER_WORDS: usize = 6;

/// Synonym phrases per kind, lowercase. Iterated in `SectionKind::ALL` order.
/// A phrase must never canonicalise to a kind other than its own (see tests).
const STANDARD_SYNONYMS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Education,
        &[
            "education",
            "educational background",
            "education and training",
            "academic background",
            "academic qualifications",
            "academic history",
            "academics",
            "qualifications",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills",
            "technical skills",
            "core skills",
            "key skills",
            "skill set",
            "skillset",
            "core competencies",
            "competencies",
            "technologies",
            "tools and technologies",
            "technical expertise",
            "areas of expertise",
            "expertise",
            "tech stack",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "relevant experience",
            "employment",
            "employment history",
            "work history",
            "career history",
            "professional background",
            "internships",
            "internship experience",
        ],
    ),
    (
        SectionKind::Projects,
        &[
            "projects",
            "project",
            "personal projects",
            "academic projects",
            "key projects",
            "selected projects",
            "side projects",
            "project experience",
            "open source",
            "portfolio",
        ],
    ),
    (
        SectionKind::Contact,
        &[
            "contact",
            "contact information",
            "contact info",
            "contact details",
            "personal information",
            "personal details",
        ],
    ),
    (
        SectionKind::Summary,
        &[
            "summary",
            "professional summary",
            "career summary",
            "profile",
            "professional profile",
            "about me",
            "objective",
            "career objective",
        ],
    ),
];

static STANDARD_TABLE: LazyLock<HeaderSynonymTable> = LazyLock::new(|| {
    HeaderSynonymTable::new(STANDARD_SYNONYMS).expect("built-in synonym table compiles")
});

struct SynonymEntry {
    kind: SectionKind,
    phrases: Vec<String>,
    /// Case-insensitive whole-word matcher for any phrase of this kind.
    remnant: Regex,
}

/// Immutable mapping from section kind to its recognisable header phrases.
pub struct HeaderSynonymTable {
    entries: Vec<SynonymEntry>,
}

impl HeaderSynonymTable {
    pub fn new(table: &[(SectionKind, &[&str])]) -> Result<Self, regex::Error> {
        let mut entries = Vec::with_capacity(table.len());
        for kind in SectionKind::ALL {
            let Some((_, phrases)) = table.iter().find(|(k, _)| *k == kind) else {
                continue;
            };
            let phrases: Vec<String> = phrases.iter().map(|p| p.to_lowercase()).collect();
            entries.push(SynonymEntry {
                kind,
                remnant: build_remnant_regex(&phrases)?,
                phrases,
            });
        }
        Ok(Self { entries })
    }

    /// The process-wide table, built once on first use.
    pub fn standard() -> &'static HeaderSynonymTable {
        &STANDARD_TABLE
    }

    /// Returns the first kind (in enumeration order) whose synonym heads the line.
    pub fn canonicalize(&self, line: &str) -> Option<SectionKind> {
        let normalized = normalize_header(line);
        if normalized.is_empty() || normalized.split(' ').count() > MAX_HEADER_WORDS {
            return None;
        }
        let shouting = is_shouting(line);

        self.entries
            .iter()
            .find(|entry| {
                entry
                    .phrases
                    .iter()
                    .any(|phrase| heads_line(&normalized, phrase, shouting))
            })
            .map(|entry| entry.kind)
    }

    /// Removes every header phrase of `kind` from `content`.
    pub fn strip_header_phrases(&self, kind: SectionKind, content: &str) -> String {
        match self.entries.iter().find(|e| e.kind == kind) {
            Some(entry) => entry.remnant.replace_all(content, " ").into_owned(),
            None => content.to_string(),
        }
    }
}

/// Canonicalises a line against the standard table.
pub fn canonicalize(line: &str) -> Option<SectionKind> {
    HeaderSynonymTable::standard().canonicalize(line)
}

fn build_remnant_regex(phrases: &[String]) -> Result<Regex, regex::Error> {
    let mut sorted: Vec<&String> = phrases.iter().collect();
    // Longest first so "technical skills" is removed whole before "skills".
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternation = sorted
        .iter()
        .map(|p| {
            p.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
}

fn normalize_header(line: &str) -> String {
    let trimmed = line
        .trim()
        .trim_start_matches(|c: char| matches!(c, '#' | '*' | '•' | '=' | '_' | '>'))
        .trim_end_matches(|c: char| {
            c.is_whitespace() || matches!(c, ':' | '-' | '|' | '*' | '#' | '=' | '_')
        });
    trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_shouting(line: &str) -> bool {
    let mut letters = line.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| !c.is_lowercase())
}

fn heads_line(normalized: &str, phrase: &str, shouting: bool) -> bool {
    if normalized == phrase {
        return true;
    }
    let Some(rest) = normalized.strip_prefix(phrase) else {
        return false;
    };
    // "projects" must not match the phrase "project" mid-word.
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() => return false,
        None => return true,
        _ => {}
    }

    let rest = rest.trim_start();
    if let Some((_, value)) = rest.split_once(':') {
        if !value.trim().is_empty() {
            return false;
        }
    }
    // "Skills - Python, Go" and "Skills | Rust" carry values.
    if let Some(value) = rest.strip_prefix(|c: char| matches!(c, '-' | '–' | '—' | '|')) {
        return value.trim().is_empty();
    }
    if rest.starts_with('(') {
        return is_dated_parenthetical(rest);
    }

    match rest.chars().next() {
        None => true,
        Some(c) if !c.is_alphanumeric() => true,
        _ => shouting,
    }
}

/// `(2019 - present)` qualifies a header, `(see github.com/jane)` does not.
fn is_dated_parenthetical(rest: &str) -> bool {
    let Some(inner) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) else {
        return false;
    };
    inner.chars().any(|c| c.is_ascii_digit()) || inner.contains("present") || inner.contains("current")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_headers() {
        assert_eq!(canonicalize("EDUCATION"), Some(SectionKind::Education));
        assert_eq!(canonicalize("Skills"), Some(SectionKind::Skills));
        assert_eq!(canonicalize("  experience  "), Some(SectionKind::Experience));
        assert_eq!(canonicalize("PROJECTS"), Some(SectionKind::Projects));
    }

    #[test]
    fn test_synonyms_map_to_canonical_kind() {
        assert_eq!(canonicalize("TECHNICAL SKILLS"), Some(SectionKind::Skills));
        assert_eq!(canonicalize("Work Experience"), Some(SectionKind::Experience));
        assert_eq!(canonicalize("Personal Projects"), Some(SectionKind::Projects));
        assert_eq!(canonicalize("Professional Summary"), Some(SectionKind::Summary));
        assert_eq!(canonicalize("Contact Information"), Some(SectionKind::Contact));
    }

    #[test]
    fn test_trailing_colon_and_markdown_markers() {
        assert_eq!(canonicalize("Skills:"), Some(SectionKind::Skills));
        assert_eq!(canonicalize("## Education"), Some(SectionKind::Education));
        assert_eq!(canonicalize("**Projects**"), Some(SectionKind::Projects));
    }

    #[test]
    fn test_prefix_with_separator_is_header() {
        assert_eq!(
            canonicalize("Work Experience (2019 - Present)"),
            Some(SectionKind::Experience)
        );
        assert_eq!(canonicalize("Skills & Tools"), Some(SectionKind::Skills));
    }

    #[test]
    fn test_shouting_prefix_is_header() {
        assert_eq!(canonicalize("EXPERIENCE HIGHLIGHTS"), Some(SectionKind::Experience));
    }

    #[test]
    fn test_prose_lines_are_not_headers() {
        assert_eq!(canonicalize("Experience building web apps"), None);
        assert_eq!(canonicalize("Software Engineer at Google"), None);
        assert_eq!(canonicalize("BS Computer Science MIT"), None);
        assert_eq!(canonicalize("My University"), None);
    }

    #[test]
    fn test_label_lines_are_content() {
        assert_eq!(canonicalize("Technologies: React, Node.js"), None);
        assert_eq!(canonicalize("Skills: Python, Go"), None);
    }

    #[test]
    fn test_separator_followed_by_value_is_content() {
        assert_eq!(canonicalize("Skills - Python, Java, Go"), None);
        assert_eq!(canonicalize("Skills | Rust, Go"), None);
        assert_eq!(canonicalize("Experience - 5 years at Google"), None);
        assert_eq!(canonicalize("Skills – Rust"), None);
        assert_eq!(canonicalize("SKILLS | PYTHON"), None);
    }

    #[test]
    fn test_bare_separator_still_header() {
        assert_eq!(canonicalize("Skills -"), Some(SectionKind::Skills));
        assert_eq!(canonicalize("EXPERIENCE |"), Some(SectionKind::Experience));
    }

    #[test]
    fn test_only_dated_parenthetical_marks_header() {
        assert_eq!(
            canonicalize("Experience (Jan 2019 - Current)"),
            Some(SectionKind::Experience)
        );
        assert_eq!(canonicalize("Projects (see github.com/jane)"), None);
        assert_eq!(canonicalize("Experience (2019) at Google"), None);
    }

    #[test]
    fn test_mid_word_prefix_rejected() {
        assert_eq!(canonicalize("Projectile physics"), None);
        assert_eq!(canonicalize("Educationally speaking"), None);
    }

    #[test]
    fn test_long_lines_are_not_headers() {
        assert_eq!(
            canonicalize("EXPERIENCE WITH LARGE SCALE DISTRIBUTED SYSTEMS AND TEAMS"),
            None
        );
    }

    #[test]
    fn test_blank_line_is_none() {
        assert_eq!(canonicalize(""), None);
        assert_eq!(canonicalize("   "), None);
    }

    #[test]
    fn test_every_phrase_canonicalizes_to_its_own_kind() {
        let table = HeaderSynonymTable::standard();
        for (kind, phrases) in STANDARD_SYNONYMS {
            for phrase in *phrases {
                assert_eq!(
                    table.canonicalize(phrase),
                    Some(*kind),
                    "phrase '{phrase}' collides with another kind"
                );
            }
        }
    }

    #[test]
    fn test_strip_header_phrases_removes_longest_match() {
        let table = HeaderSynonymTable::standard();
        let stripped = table.strip_header_phrases(SectionKind::Skills, "TECHNICAL SKILLS\nRust");
        assert_eq!(stripped.split_whitespace().collect::<Vec<_>>(), vec!["Rust"]);
    }
}
