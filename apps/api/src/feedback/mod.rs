pub mod composer;
pub mod suggestions;

pub use composer::{FeedbackComposer, FeedbackReport};
