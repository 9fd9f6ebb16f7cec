use std::sync::Arc;

use sqlx::PgPool;

use crate::assessment::generator::AssessmentGenerator;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Owns the completion provider and the configured failure policy.
    pub generator: Arc<AssessmentGenerator>,
    pub config: Config,
}
