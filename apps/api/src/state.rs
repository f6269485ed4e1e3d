use std::sync::Arc;

use crate::analysis::MatchEngine;
use crate::config::Config;
use crate::narrative::NarrativeGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; read-only, shared without locking.
    pub engine: Arc<MatchEngine>,
    /// Pluggable narrative backend. `None` when ANTHROPIC_API_KEY is unset.
    pub narrator: Option<Arc<dyn NarrativeGenerator>>,
    pub config: Config,
}
