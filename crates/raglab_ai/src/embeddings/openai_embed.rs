use raglab_core::error::AppError;
use raglab_core::Embedding;
use serde::{Deserialize, Serialize};

use super::Embedder;
use crate::openai::OpenAiClient;

#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: OpenAiClient,
}

impl OpenAiEmbedder {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        &self.client.config().embedding_model
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl Embedder for OpenAiEmbedder {
    /// One request for the whole batch. The response is put back into input
    /// order by its `index` field.
    fn embed(&self, inputs: &[&str]) -> Result<Vec<Embedding>, AppError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let req = EmbeddingsRequest {
            model: self.model(),
            input: inputs,
        };
        let mut resp: EmbeddingsResponse =
            self.client.post_json("embeddings", &req, "AI_EMBEDDINGS_FAILED")?;

        resp.data.sort_by_key(|d| d.index);
        if resp.data.len() != inputs.len() {
            return Err(AppError::new(
                "AI_EMBEDDINGS_FAILED",
                "Embeddings response count does not match input count",
            )
            .with_details(format!("inputs={}; embeddings={}", inputs.len(), resp.data.len())));
        }
        if let Some((pos, d)) = resp.data.iter().enumerate().find(|(pos, d)| d.index != *pos) {
            return Err(AppError::new(
                "AI_EMBEDDINGS_FAILED",
                "Embeddings response indices are not a permutation of the inputs",
            )
            .with_details(format!("position={pos}; index={}", d.index)));
        }

        tracing::debug!(count = inputs.len(), model = self.model(), "embedded batch");
        Ok(resp.data.into_iter().map(|d| d.embedding).collect())
    }
}
