use std::sync::Arc;

use crate::enrichment::ProfileEnricher;
use crate::resume::service::ResumeService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub resumes: Arc<ResumeService>,
    /// Disabled unless an enrichment endpoint is configured.
    pub enricher: Arc<dyn ProfileEnricher>,
}
