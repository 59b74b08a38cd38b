//! Lightweight verb tagger. Classifies tokens as verb, auxiliary or other and
//! produces a base form from a verb lexicon, irregular forms and suffix rules.
//!
//! Good enough for resume prose, where most verbs are past-tense action verbs.
//! Any statistical tagger can be plugged in behind [`VerbTagger`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub(crate) static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Verb,
    Aux,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
}

impl TaggedToken {
    pub fn is_verb_like(&self) -> bool {
        matches!(self.pos, PartOfSpeech::Verb | PartOfSpeech::Aux)
    }
}

pub trait VerbTagger: Send + Sync {
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

const AUXILIARIES: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("be", "be"),
    ("been", "be"),
    ("being", "be"),
    ("have", "have"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("do", "do"),
    ("does", "do"),
    ("did", "do"),
    ("will", "will"),
    ("would", "would"),
    ("shall", "shall"),
    ("should", "should"),
    ("can", "can"),
    ("could", "could"),
    ("may", "may"),
    ("might", "might"),
    ("must", "must"),
];

const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("built", "build"),
    ("rebuilt", "rebuild"),
    ("made", "make"),
    ("done", "do"),
    ("doing", "do"),
    ("led", "lead"),
    ("ran", "run"),
    ("wrote", "write"),
    ("written", "write"),
    ("began", "begin"),
    ("begun", "begin"),
    ("brought", "bring"),
    ("taught", "teach"),
    ("thought", "think"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("won", "win"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("kept", "keep"),
    ("found", "find"),
    ("sent", "send"),
    ("spent", "spend"),
    ("got", "get"),
    ("held", "hold"),
    ("met", "meet"),
    ("paid", "pay"),
    ("sold", "sell"),
    ("told", "tell"),
    ("went", "go"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("spoke", "speak"),
    ("oversaw", "oversee"),
    ("overseen", "oversee"),
];

/// Base forms recognised as verbs.
const BASE_VERBS: &[&str] = &[
    "achieve", "analyze", "apply", "architect", "assist", "automate", "build", "coach",
    "collaborate", "conduct", "configure", "construct", "contribute", "coordinate", "create",
    "debug", "define", "deliver", "deploy", "design", "develop", "direct", "do", "drive",
    "earn", "engineer", "ensure", "establish", "evaluate", "execute", "expand", "fix",
    "generate", "handle", "help", "implement", "improve", "increase", "integrate", "launch",
    "lead", "learn", "leverage", "maintain", "make", "manage", "mentor", "migrate", "monitor",
    "negotiate", "operate", "optimize", "organize", "own", "participate", "perform", "plan",
    "prepare", "present", "produce", "provide", "publish", "reduce", "refactor", "research",
    "resolve", "review", "run", "scale", "ship", "spearhead", "streamline", "study",
    "supervise", "support", "teach", "test", "train", "use", "utilize", "work", "write",
];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "my", "our", "their", "his", "her", "its", "this", "that", "these",
    "those", "your",
];

/// Default tagger backed by the static lexicons above.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconTagger;

impl VerbTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let mut tokens: Vec<TaggedToken> = Vec::new();
        let mut previous: Option<String> = None;

        for m in WORD_RE.find_iter(text) {
            let word = m.as_str();
            let lower = word.to_lowercase();
            let after_determiner = previous
                .as_deref()
                .is_some_and(|p| DETERMINERS.contains(&p));

            let (pos, lemma) = if let Some(lemma) = lookup(AUXILIARIES, &lower) {
                (PartOfSpeech::Aux, lemma.to_string())
            } else if let Some(lemma) = verb_lemma(&lower) {
                if after_determiner {
                    (PartOfSpeech::Other, lower.clone())
                } else {
                    (PartOfSpeech::Verb, lemma)
                }
            } else {
                (PartOfSpeech::Other, lower.clone())
            };

            tokens.push(TaggedToken {
                text: word.to_string(),
                lemma,
                pos,
            });
            previous = Some(lower);
        }

        tokens
    }
}

fn lookup(table: &[(&str, &'static str)], word: &str) -> Option<&'static str> {
    table.iter().find(|(form, _)| *form == word).map(|(_, lemma)| *lemma)
}

fn is_base_verb(word: &str) -> bool {
    BASE_VERBS.contains(&word)
}

/// Base form for a known or regularly inflected verb, `None` otherwise.
fn verb_lemma(word: &str) -> Option<String> {
    if is_base_verb(word) {
        return Some(word.to_string());
    }
    if let Some(lemma) = lookup(IRREGULAR_FORMS, word) {
        return Some(lemma.to_string());
    }

    for (suffix, replacement) in [("ied", "y"), ("ies", "y")] {
        if let Some(stem) = word.strip_suffix(suffix) {
            let candidate = format!("{stem}{replacement}");
            if is_base_verb(&candidate) {
                return Some(candidate);
            }
        }
    }

    for suffix in ["ed", "ing", "es", "s", "d"] {
        let Some(stem) = word.strip_suffix(suffix) else {
            continue;
        };
        if let Some(lemma) = stem_candidates(stem).into_iter().find(|c| is_base_verb(c)) {
            return Some(lemma);
        }
    }

    // Unlisted regular past tense ("spearheaded", "pioneered" is excluded by "eed").
    if word.len() > 4 && word.ends_with("ed") && !word.ends_with("eed") {
        return word.strip_suffix("ed").map(str::to_string);
    }

    None
}

fn stem_candidates(stem: &str) -> Vec<String> {
    let mut candidates = vec![stem.to_string(), format!("{stem}e")];
    let bytes = stem.as_bytes();
    if bytes.len() >= 2 && bytes[bytes.len() - 1] == bytes[bytes.len() - 2] {
        candidates.push(stem[..stem.len() - 1].to_string());
    }
    candidates
}
