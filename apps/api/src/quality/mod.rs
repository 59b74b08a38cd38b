pub mod grammar;
pub mod tagger;
pub mod verbs;

pub use grammar::{
    GrammarChecker, GrammarEngine, GrammarResult, GrammarSectionsResult, LanguageToolChecker,
    NoopChecker, SectionGrammar,
};
pub use verbs::{ActionVerbAnalyzer, VerbAggregate};
