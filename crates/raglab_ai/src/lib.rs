pub mod config;
pub mod download;
pub mod embeddings;
pub mod llm;
pub mod openai;
pub mod rag;

pub use config::AiConfig;
pub use embeddings::{Embedder, OpenAiEmbedder};
pub use llm::{Llm, OpenAiLlm};
pub use openai::OpenAiClient;
pub use rag::{RagAnswer, RagEngine, RagOptions};
