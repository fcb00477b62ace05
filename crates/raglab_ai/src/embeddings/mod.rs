use raglab_core::error::AppError;
use raglab_core::Embedding;

/// Maps texts to embeddings, one per input, in input order.
pub trait Embedder {
    fn embed(&self, inputs: &[&str]) -> Result<Vec<Embedding>, AppError>;

    fn embed_one(&self, input: &str) -> Result<Embedding, AppError> {
        self.embed(&[input])?.into_iter().next().ok_or_else(|| {
            AppError::new("AI_EMBEDDINGS_FAILED", "Embeddings response was empty")
        })
    }
}

pub mod openai_embed;

pub use openai_embed::OpenAiEmbedder;
