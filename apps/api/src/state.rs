use std::sync::Arc;

use crate::config::Config;
use crate::feedback::FeedbackComposer;
use crate::jobs::store::JobStore;
use crate::matching::JobFitScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub composer: FeedbackComposer,
    /// Pluggable fit scorer. Default: KeywordJobFitScorer.
    pub fit_scorer: Arc<dyn JobFitScorer>,
    pub jobs: Arc<dyn JobStore>,
}
