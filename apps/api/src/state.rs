use std::sync::Arc;

use sqlx::PgPool;

use crate::bias::classifier::BiasClassifier;
use crate::config::Config;
use crate::embeddings::Embedder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable embedding capability. Default: VoyageEmbedder.
    /// The matching service degrades to skill-only scoring when it fails.
    pub embedder: Arc<dyn Embedder>,
    /// Pluggable bias classifier. Default: LlmBiasClassifier over Claude.
    /// Audit paths treat its failures as fail-soft (empty findings + marker).
    pub classifier: Arc<dyn BiasClassifier>,
}
