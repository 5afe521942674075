//! Embedding capability — `get_text_embedding` behind a pluggable trait.
//!
//! The matching engine never talks to a provider directly; it sees an
//! `Arc<dyn Embedder>` in `AppState` and treats every error as a signal to
//! degrade to skill-only scoring, per the failure policy.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const VOYAGE_API_URL: &str = "https://api.voyageai.com/v1/embeddings";
const EMBEDDING_MODEL: &str = "voyage-3";
/// Embedding lookups sit on the compute_match path; a slow provider must not
/// hold the request, so the client carries a hard timeout.
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding provider returned no vectors")]
    EmptyResponse,
}

/// The `get_text_embedding` capability.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    input: [&'a str; 1],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRecord>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRecord {
    embedding: Vec<f32>,
}

/// Voyage AI embeddings client. One request per text; bulk batching is left
/// to the external scheduler that drives re-scoring jobs.
#[derive(Clone)]
pub struct VoyageEmbedder {
    client: Client,
    api_key: String,
}

impl VoyageEmbedder {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl Embedder for VoyageEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let response = self
            .client
            .post(VOYAGE_API_URL)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingsRequest {
                input: [text],
                model: EMBEDDING_MODEL,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(EmbeddingError::Unavailable)?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|r| r.embedding)
            .ok_or(EmbeddingError::EmptyResponse)?;

        debug!("embedding retrieved: {} dimensions", vector.len());
        Ok(vector)
    }
}
