//! Resume length and employment-gap analysis.
//!
//! Stints are read from the experience section: every line carrying a date
//! range (`Jan 2019 - Present`, `05/2020 - 12/2022`, `2018 to 2020`) opens one.
//! Gaps are measured in whole months between one stint's end and the next
//! stint's start, after sorting by end date.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::sections::kind::{SectionKind, SectionMap};

pub const MIN_WORD_COUNT: usize = 300;
pub const MAX_WORD_COUNT: usize = 1500;
pub const GAP_THRESHOLD_MONTHS: i32 = 6;

const DATE: &str = r"(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{4}|\d{1,2}[/-]\d{4}|\d{4})";

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<start>{DATE})\s*(?:-|–|—|to)\s*(?P<end>{DATE}|present|current|now)\b"
    ))
    .expect("valid regex")
});

static MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]{3})[a-z]*\.?\s+(\d{4})$").expect("valid regex")
});

static NUMERIC_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[/-](\d{4})$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordCountStatus {
    TooShort,
    Optimal,
    TooLong,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCountReport {
    pub word_count: usize,
    pub status: WordCountStatus,
    pub feedback: String,
}

/// One dated entry of the experience section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentStint {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentGap {
    /// `Mon YYYY`
    pub gap_start: String,
    pub gap_end: String,
    pub gap_months: u32,
    pub previous_job: String,
    pub next_job: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub employment_gaps: Vec<EmploymentGap>,
    pub gap_count: usize,
    pub gap_feedback: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryReport {
    pub length: WordCountReport,
    pub gaps: GapReport,
}

pub fn analyze_history(raw_text: &str, sections: &SectionMap, today: NaiveDate) -> HistoryReport {
    let stints = sections
        .get(&SectionKind::Experience)
        .map(|body| parse_stints(body, today))
        .unwrap_or_default();
    HistoryReport {
        length: analyze_word_count(raw_text),
        gaps: detect_employment_gaps(stints),
    }
}

pub fn analyze_word_count(text: &str) -> WordCountReport {
    let word_count = text.split_whitespace().count();
    let (status, feedback) = if word_count < MIN_WORD_COUNT {
        (
            WordCountStatus::TooShort,
            format!(
                "Your resume is only {word_count} words. Aim for at least {MIN_WORD_COUNT} words to provide sufficient detail about your experience and skills."
            ),
        )
    } else if word_count > MAX_WORD_COUNT {
        (
            WordCountStatus::TooLong,
            format!(
                "Your resume is {word_count} words, which is quite lengthy. Consider condensing to under {MAX_WORD_COUNT} words to maintain recruiter attention."
            ),
        )
    } else {
        (
            WordCountStatus::Optimal,
            format!(
                "Your resume length ({word_count} words) is appropriate. Good balance of detail and brevity."
            ),
        )
    };
    WordCountReport {
        word_count,
        status,
        feedback,
    }
}

/// Open-ended ranges (`present`, `current`, `now`) end in `today`'s month.
pub fn parse_stints(experience: &str, today: NaiveDate) -> Vec<EmploymentStint> {
    let mut stints = Vec::new();
    let mut previous_line = "";

    for line in experience.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(caps) = RANGE_RE.captures(line) else {
            previous_line = line;
            continue;
        };
        let (Some(start), Some(end)) = (
            parse_date(&caps["start"], today),
            parse_date(&caps["end"], today),
        ) else {
            continue;
        };
        if end < start {
            continue;
        }

        let range = caps.get(0).map_or(0..0, |m| m.range());
        let inline = format!("{} {}", &line[..range.start], &line[range.end..]);
        let inline = inline
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '|' | '-' | '–' | '—' | '@' | '(' | ')'))
            .to_string();
        let label = if !inline.is_empty() {
            inline
        } else if !previous_line.is_empty() {
            previous_line.to_string()
        } else {
            "Unknown position".to_string()
        };

        stints.push(EmploymentStint { label, start, end });
        previous_line = "";
    }
    stints
}

pub fn detect_employment_gaps(mut stints: Vec<EmploymentStint>) -> GapReport {
    if stints.is_empty() {
        return GapReport {
            employment_gaps: Vec::new(),
            gap_count: 0,
            gap_feedback: vec!["No employment history provided".to_string()],
        };
    }

    stints.sort_by_key(|s| s.end);

    let mut employment_gaps = Vec::new();
    let mut gap_feedback = Vec::new();
    for pair in stints.windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);
        let months = months_between(previous.end, next.start);
        if months <= GAP_THRESHOLD_MONTHS {
            continue;
        }
        let gap = EmploymentGap {
            gap_start: month_label(previous.end),
            gap_end: month_label(next.start),
            gap_months: months.unsigned_abs(),
            previous_job: previous.label.clone(),
            next_job: next.label.clone(),
        };
        gap_feedback.push(format!(
            "Gap detected: {} months between {} and {} ({} - {}). Consider adding explanation or including relevant activities.",
            gap.gap_months, gap.previous_job, gap.next_job, gap.gap_start, gap.gap_end
        ));
        employment_gaps.push(gap);
    }

    if employment_gaps.is_empty() {
        gap_feedback.push(
            "No significant employment gaps detected. Your work history shows consistent employment."
                .to_string(),
        );
    }

    GapReport {
        gap_count: employment_gaps.len(),
        employment_gaps,
        gap_feedback,
    }
}

fn parse_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let raw = raw.trim().to_lowercase();
    if matches!(raw.as_str(), "present" | "current" | "now") {
        return today.with_day(1);
    }

    let (year, month) = if let Some(caps) = MONTH_YEAR_RE.captures(&raw) {
        (caps[2].parse().ok()?, month_from_name(&caps[1])?)
    } else if let Some(caps) = NUMERIC_DATE_RE.captures(&raw) {
        (caps[2].parse().ok()?, caps[1].parse().ok()?)
    } else {
        (raw.parse().ok()?, 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn month_from_name(prefix: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}

fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let years = end.year() - start.year();
    let months = end.month() as i32 - start.month() as i32;
    years * 12 + months
}

fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}
