use raglab_core::error::AppError;
use serde::{Deserialize, Serialize};

use super::Llm;
use crate::openai::OpenAiClient;

#[derive(Debug, Clone)]
pub struct OpenAiLlm {
    client: OpenAiClient,
}

impl OpenAiLlm {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl Llm for OpenAiLlm {
    /// Sends `prompt` as the single user message and returns the first
    /// choice's content untouched.
    fn complete(&self, prompt: &str, model: &str, temperature: f32) -> Result<String, AppError> {
        let req = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };
        let resp: ChatResponse =
            self.client.post_json("chat/completions", &req, "AI_COMPLETION_FAILED")?;

        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                AppError::new("AI_COMPLETION_FAILED", "Completion response had no content")
                    .with_details(format!("model={model}"))
            })
    }
}
