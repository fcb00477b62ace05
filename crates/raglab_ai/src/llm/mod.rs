use raglab_core::error::AppError;

pub trait Llm {
    fn complete(&self, prompt: &str, model: &str, temperature: f32) -> Result<String, AppError>;
}

pub mod openai_llm;

pub use openai_llm::OpenAiLlm;
