mod config;
mod errors;
mod feedback;
mod jobs;
mod matching;
mod quality;
mod routes;
mod sections;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, GrammarBackend};
use crate::feedback::FeedbackComposer;
use crate::jobs::InMemoryJobStore;
use crate::matching::KeywordJobFitScorer;
use crate::quality::{GrammarChecker, GrammarEngine, LanguageToolChecker, NoopChecker};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Initialize grammar backend
    let checker: Arc<dyn GrammarChecker> = match config.grammar_backend {
        GrammarBackend::LanguageTool => Arc::new(LanguageToolChecker::new(
            &config.languagetool_url,
            &config.grammar_language,
            config.grammar_timeout,
        )?),
        GrammarBackend::None => Arc::new(NoopChecker),
    };
    let grammar = GrammarEngine::new(checker, config.grammar_max_errors, config.grammar_timeout);
    info!(
        "Grammar backend: {} (budget {:?})",
        grammar.backend(),
        config.grammar_budget
    );

    let composer = FeedbackComposer::new(Arc::new(grammar), config.grammar_budget);

    // Build app state
    let state = AppState {
        config: config.clone(),
        composer,
        fit_scorer: Arc::new(KeywordJobFitScorer::default()),
        jobs: Arc::new(InMemoryJobStore::with_ttl(config.job_ttl)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
