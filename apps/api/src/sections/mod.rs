// Section detection pipeline: header canonicalisation, single-pass segmentation
// with merge, structural validation and per-section completeness checks.
// Everything here is pure and synchronous.

pub mod completeness;
pub mod content_checks;
pub mod history;
pub mod kind;
pub mod segmenter;
pub mod synonyms;
pub mod validator;

pub use kind::{SectionKind, SectionMap};
pub use segmenter::segment;
pub use validator::{validate, ValidationResult};
