use std::sync::Arc;

use crate::config::Config;
use crate::ranking::scorer::{FilenameOverlapScorer, ResumeScorer};
use crate::session::flows::FlowStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable resume scorer. Default: FilenameOverlapScorer.
    pub scorer: Arc<dyn ResumeScorer>,
    /// Per-visitor flows and the transient links their batches issued.
    pub flows: Arc<FlowStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            scorer: Arc::new(FilenameOverlapScorer),
            flows: Arc::new(FlowStore::new()),
        }
    }
}
