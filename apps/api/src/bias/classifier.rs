//! The `classify_bias` capability — an LLM pass that catches phrasing the
//! lexicon cannot. Strictly supplementary: every caller must treat a
//! classification failure as "no extra findings" plus a degradation marker.

use async_trait::async_trait;
use thiserror::Error;

use crate::bias::models::BiasFinding;
use crate::llm_client::prompts::{CLASSIFY_PROMPT_TEMPLATE, CLASSIFY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("bias classifier unavailable: {0}")]
    Unavailable(#[from] LlmError),
}

#[async_trait]
pub trait BiasClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<BiasFinding>, ClassificationError>;
}

/// Claude-backed classifier. The prompt pins the finding schema to the same
/// tagged shape `BiasFinding` deserializes, so no adaptation layer is needed.
pub struct LlmBiasClassifier {
    llm: LlmClient,
}

impl LlmBiasClassifier {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl BiasClassifier for LlmBiasClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<BiasFinding>, ClassificationError> {
        let prompt = CLASSIFY_PROMPT_TEMPLATE.replace("{text}", text);
        let findings = self
            .llm
            .call_json::<Vec<BiasFinding>>(&prompt, CLASSIFY_SYSTEM)
            .await?;
        Ok(findings)
    }
}
