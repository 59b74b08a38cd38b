//! Single-pass section segmentation with merge of synonymous headers.
//!
//! Every recognised header closes the running section and opens a new one.
//! Bodies of repeated kinds are concatenated in document order, separated by a
//! blank line. Text before the first header is discarded.

use crate::sections::kind::{SectionBlock, SectionKind, SectionMap};
use crate::sections::synonyms::HeaderSynonymTable;

const MERGE_SEPARATOR: &str = "\n\n";

/// Splits resume text into one merged body per detected section kind.
pub fn segment(text: &str) -> SectionMap {
    segment_with(HeaderSynonymTable::standard(), text)
}

/// Same as [`segment`] but ordered by first appearance in the document.
#[allow(dead_code)]
pub fn segment_blocks(text: &str) -> Vec<SectionBlock> {
    let table = HeaderSynonymTable::standard();
    let mut order: Vec<SectionKind> = Vec::new();
    for line in text.lines() {
        if let Some(kind) = table.canonicalize(line) {
            if !order.contains(&kind) {
                order.push(kind);
            }
        }
    }

    let mut merged = segment_with(table, text);
    order
        .into_iter()
        .filter_map(|kind| {
            merged
                .remove(&kind)
                .map(|content| SectionBlock { kind, content })
        })
        .collect()
}

pub fn segment_with(table: &HeaderSynonymTable, text: &str) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut current: Option<SectionKind> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(kind) = table.canonicalize(line) {
            flush(&mut sections, current, &mut buffer);
            current = Some(kind);
        } else if current.is_some() {
            buffer.push(line);
        }
    }
    flush(&mut sections, current, &mut buffer);

    sections
}

fn flush(sections: &mut SectionMap, kind: Option<SectionKind>, buffer: &mut Vec<&str>) {
    let body = buffer.join("\n");
    buffer.clear();

    let Some(kind) = kind else {
        return;
    };
    let body = body.trim();
    if body.is_empty() {
        return;
    }

    sections
        .entry(kind)
        .and_modify(|existing| {
            existing.push_str(MERGE_SEPARATOR);
            existing.push_str(body);
        })
        .or_insert_with(|| body.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE: &str = "EDUCATION\nBS Computer Science MIT\n\nSKILLS\nPython, JavaScript, React, FastAPI, Docker, Kubernetes\n\nEXPERIENCE\nSoftware Engineer Google\n\nPROJECTS\nAI Resume Analyzer";

    const DUPLICATES: &str = "SKILLS\nPython, Java, C++\n\nEXPERIENCE\nJob1\n\nTECHNICAL SKILLS\nSQL, Docker, Git\n\nWork Experience\nJob2";

    #[test]
    fn test_detects_all_four_sections() {
        let sections = segment(COMPLETE);
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[&SectionKind::Education], "BS Computer Science MIT");
        assert_eq!(sections[&SectionKind::Projects], "AI Resume Analyzer");
    }

    #[test]
    fn test_merges_synonymous_headers() {
        let sections = segment(DUPLICATES);
        assert_eq!(
            sections[&SectionKind::Skills],
            "Python, Java, C++\n\nSQL, Docker, Git"
        );
        assert_eq!(sections[&SectionKind::Experience], "Job1\n\nJob2");
    }

    #[test]
    fn test_preamble_before_first_header_is_discarded() {
        let sections = segment("JOHN DOE\njohn@example.com\nSKILLS\nRust");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[&SectionKind::Skills], "Rust");
    }

    #[test]
    fn test_empty_occurrence_produces_no_entry() {
        let sections = segment("PROJECTS\n\nSKILLS\nRust, Go");
        assert!(!sections.contains_key(&SectionKind::Projects));
        assert!(sections.contains_key(&SectionKind::Skills));
    }

    #[test]
    fn test_empty_occurrence_does_not_add_separator() {
        let sections = segment("SKILLS\nRust\nTECHNICAL SKILLS\n\nSKILLS\nGo");
        assert_eq!(sections[&SectionKind::Skills], "Rust\n\nGo");
    }

    #[test]
    fn test_header_line_is_never_content() {
        let sections = segment("EXPERIENCE\nEngineer at Acme");
        assert!(!sections[&SectionKind::Experience].contains("EXPERIENCE"));
    }

    #[test]
    fn test_indented_lines_are_kept_verbatim_inside_body() {
        let sections = segment("    EXPERIENCE\n    Engineer\n      - shipped things");
        assert_eq!(
            sections[&SectionKind::Experience],
            "Engineer\n      - shipped things"
        );
    }

    #[test]
    fn test_segmentation_is_idempotent() {
        assert_eq!(segment(DUPLICATES), segment(DUPLICATES));
    }

    #[test]
    fn test_no_headers_yields_empty_map() {
        assert!(segment("just some prose\nwithout headers").is_empty());
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_three_occurrences_keep_every_body() {
        let text = "SKILLS\nA1\nEXPERIENCE\nJ\nKEY SKILLS\nB2\nCORE SKILLS\nC3";
        let skills = &segment(text)[&SectionKind::Skills];
        assert_eq!(skills.matches("\n\n").count(), 2);
        for body in ["A1", "B2", "C3"] {
            assert!(skills.contains(body));
        }
    }

    #[test]
    fn test_blocks_follow_document_order() {
        let blocks = segment_blocks(DUPLICATES);
        let kinds: Vec<_> = blocks.iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![SectionKind::Skills, SectionKind::Experience]);
        assert_eq!(blocks[1].content, "Job1\n\nJob2");
    }

    #[test]
    fn test_label_with_dash_value_stays_in_section() {
        let sections = segment("EXPERIENCE\nEngineer at Acme\nSkills - Python, Java, Go\nLed migration");
        assert!(!sections.contains_key(&SectionKind::Skills));
        assert_eq!(
            sections[&SectionKind::Experience],
            "Engineer at Acme\nSkills - Python, Java, Go\nLed migration"
        );
    }

    #[test]
    fn test_pipe_and_link_lines_are_content() {
        let text = "EXPERIENCE\nAcme\nSkills | Rust, Go\nProjects (see github.com/jane)";
        let sections = segment(text);
        assert_eq!(sections.len(), 1);
        let body = &sections[&SectionKind::Experience];
        assert!(body.contains("Rust, Go"));
        assert!(body.contains("github.com/jane"));
    }

    #[test]
    fn test_dated_header_still_opens_section() {
        let sections = segment("SKILLS\nRust\nWork Experience (2019 - Present)\nAcme");
        assert_eq!(sections[&SectionKind::Experience], "Acme");
    }

    #[test]
    fn test_crlf_input() {
        let sections = segment("SKILLS\r\nRust\r\nEXPERIENCE\r\nAcme");
        assert_eq!(sections[&SectionKind::Skills], "Rust");
        assert_eq!(sections[&SectionKind::Experience], "Acme");
    }
}
