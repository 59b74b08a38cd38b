//! Content format checks over the raw resume text: date-format consistency and
//! presence of contact details. Contact values are masked before storage.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{4}\b|\b(?:0[1-9]|1[0-2])/\d{4}\b",
    )
    .expect("valid regex")
});

static MONTH_NAME_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}\s+\d{4}$").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b")
        .expect("valid regex")
});

static EMAIL_MASK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z0-9])[A-Za-z0-9._%+-]*([A-Za-z0-9])@").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "MMM YYYY")]
    MonthName,
    #[serde(rename = "MM/YYYY")]
    Numeric,
    #[serde(rename = "mixed")]
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateReport {
    pub consistent: bool,
    pub format: Option<DateFormat>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactIssue {
    pub field: String,
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email_found: Option<String>,
    pub phone_found: Option<String>,
    pub issues: Vec<ContactIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentReport {
    pub dates: DateReport,
    pub contact_info: ContactInfo,
}

impl ContentReport {
    /// Copy with contact values masked, safe to hand to other readers.
    pub fn masked(mut self) -> Self {
        self.contact_info.email_found = self.contact_info.email_found.map(|e| mask_email(&e));
        self.contact_info.phone_found = self.contact_info.phone_found.map(|p| mask_phone(&p));
        self
    }
}

pub fn validate_content(raw_text: &str) -> ContentReport {
    let dates: Vec<&str> = DATE_RE.find_iter(raw_text).map(|m| m.as_str().trim()).collect();

    let email = EMAIL_RE.find(raw_text).map(|m| m.as_str().to_string());
    let phone = PHONE_RE.find(raw_text).map(|m| m.as_str().trim().to_string());

    let mut issues = Vec::new();
    if email.is_none() {
        issues.push(ContactIssue {
            field: "email".to_string(),
            error: "Missing".to_string(),
            message: "No valid email address found. A professional resume should include an email."
                .to_string(),
        });
    }
    if phone.is_none() {
        issues.push(ContactIssue {
            field: "phone".to_string(),
            error: "Missing".to_string(),
            message:
                "No valid phone number found. A professional resume should include a phone number."
                    .to_string(),
        });
    }

    ContentReport {
        dates: check_date_consistency(&dates),
        contact_info: ContactInfo {
            email_found: email,
            phone_found: phone,
            issues,
        },
    }
}

fn check_date_consistency(dates: &[&str]) -> DateReport {
    let Some((first, rest)) = dates.split_first() else {
        return DateReport {
            consistent: true,
            format: None,
            message: "No dates found to check.".to_string(),
        };
    };

    let first_is_month_name = MONTH_NAME_DATE_RE.is_match(first);
    if rest
        .iter()
        .any(|d| MONTH_NAME_DATE_RE.is_match(d) != first_is_month_name)
    {
        return DateReport {
            consistent: false,
            format: Some(DateFormat::Mixed),
            message: "Invalid date format. Inconsistent formats found. Please use either 'MMM YYYY' or 'MM/YYYY' consistently.".to_string(),
        };
    }

    DateReport {
        consistent: true,
        format: Some(if first_is_month_name {
            DateFormat::MonthName
        } else {
            DateFormat::Numeric
        }),
        message: "Date formats are consistent.".to_string(),
    }
}

/// `jane.doe@example.com` → `j*****e@example.com`
pub fn mask_email(email: &str) -> String {
    EMAIL_MASK_RE.replace(email, "${1}*****${2}@").into_owned()
}

/// Masks every digit except the last four, keeping the original punctuation.
/// `(555) 123-4567` → `(XXX) XXX-4567`
pub fn mask_phone(phone: &str) -> String {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let keep_from = digits.saturating_sub(4);
    let mut seen = 0;
    phone
        .chars()
        .map(|c| {
            if !c.is_ascii_digit() {
                return c;
            }
            seen += 1;
            if seen > keep_from {
                c
            } else {
                'X'
            }
        })
        .collect()
}

/// Masks every email address and phone number found in free text.
pub fn mask_contact_details(text: &str) -> String {
    let text = EMAIL_RE.replace_all(text, |caps: &regex::Captures| mask_email(&caps[0]));
    PHONE_RE
        .replace_all(&text, |caps: &regex::Captures| mask_phone(&caps[0]))
        .into_owned()
}
