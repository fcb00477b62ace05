use raglab_core::error::AppError;
use raglab_core::{SearchHit, VectorStore};
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::embeddings::Embedder;
use crate::llm::Llm;

mod prompts;

pub const DEFAULT_TOP_K: usize = 3;

/// Generation settings for the answer step.
#[derive(Debug, Clone, PartialEq)]
pub struct RagOptions {
    pub model: String,
    pub temperature: f32,
}

impl RagOptions {
    pub fn from_config(config: &AiConfig) -> Self {
        Self {
            model: config.chat_model.clone(),
            temperature: config.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagAnswer {
    pub answer: String,
    pub hits: Vec<SearchHit>,
}

/// Embed, retrieve, prompt, generate.
pub struct RagEngine<'a> {
    embedder: &'a dyn Embedder,
    llm: &'a dyn Llm,
    store: VectorStore,
    options: RagOptions,
}

impl<'a> RagEngine<'a> {
    pub fn new(
        embedder: &'a dyn Embedder,
        llm: &'a dyn Llm,
        store: VectorStore,
        options: RagOptions,
    ) -> Self {
        Self {
            embedder,
            llm,
            store,
            options,
        }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn into_store(self) -> VectorStore {
        self.store
    }

    /// Embed `chunks` in a single batch and append them in order.
    pub fn ingest<S: AsRef<str>>(&mut self, chunks: &[S]) -> Result<usize, AppError> {
        if chunks.is_empty() {
            return Ok(0);
        }
        let inputs: Vec<&str> = chunks.iter().map(|c| c.as_ref()).collect();
        let embeddings = self.embedder.embed(&inputs)?;
        self.store.add_many(&inputs, embeddings)?;
        tracing::info!(added = inputs.len(), total = self.store.len(), "ingested chunks");
        Ok(inputs.len())
    }

    pub fn retrieve(&self, question: &str, k: usize) -> Result<Vec<SearchHit>, AppError> {
        let qv = self.embedder.embed_one(question)?;
        Ok(self.store.search(&qv, k))
    }

    pub fn query(&self, question: &str, k: usize) -> Result<String, AppError> {
        Ok(self.query_with_hits(question, k)?.answer)
    }

    /// Like [`RagEngine::query`], also returning the chunks the answer was
    /// conditioned on. An empty store still produces an answer, from a prompt
    /// with an empty context block.
    pub fn query_with_hits(&self, question: &str, k: usize) -> Result<RagAnswer, AppError> {
        let hits = self.retrieve(question, k)?;
        let chunks: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
        let prompt = build_prompt(question, &chunks);

        tracing::debug!(
            hits = hits.len(),
            prompt_chars = prompt.len(),
            model = %self.options.model,
            "generating answer"
        );
        let answer = self
            .llm
            .complete(&prompt, &self.options.model, self.options.temperature)?;

        Ok(RagAnswer {
            answer: answer.trim().to_string(),
            hits,
        })
    }
}

/// Fixed preamble, chunks joined by blank lines in ranked order, the question,
/// then the answer cue.
pub fn build_prompt(question: &str, chunks: &[&str]) -> String {
    prompts::answer_prompt(question, &chunks.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prompt_layout_is_stable() {
        let p = build_prompt("Why?", &["first chunk", "second chunk"]);
        assert_eq!(
            p,
            "You are a helpful assistant.\n\nHere is some context:\n\nfirst chunk\n\nsecond chunk\n\nNow answer the following question:\n\nWhy?\n\nAnswer:"
        );
    }

    #[test]
    fn prompt_without_chunks_has_empty_context_block() {
        let p = build_prompt("Why?", &[]);
        assert!(p.contains("Here is some context:\n\n\n\nNow answer"));
    }

    #[test]
    fn options_follow_config() {
        let cfg = AiConfig::new("sk-test");
        let opts = RagOptions::from_config(&cfg);
        assert_eq!(opts.model, "gpt-3.5-turbo");
        assert_eq!(opts.temperature, 0.7);
    }
}
