use std::fmt;

use raglab_core::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::AiConfig;

/// Blocking HTTP client for OpenAI-compatible endpoints. Shared by the
/// embedder and the chat model.
#[derive(Clone)]
pub struct OpenAiClient {
    agent: ureq::Agent,
    config: AiConfig,
}

impl OpenAiClient {
    /// Fails eagerly on a missing key or a base URL that is not http(s).
    pub fn new(config: AiConfig) -> Result<Self, AppError> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::new(
                "AI_CONFIG_MISSING_KEY",
                "OpenAI API key must not be empty",
            ));
        }

        let mut config = config;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(AppError::new(
                "AI_CONFIG_INVALID",
                "OpenAI base URL must start with http:// or https://",
            )
            .with_details(format!("base_url={}", config.base_url)));
        }

        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            agent: builder.build(),
            config,
        })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// POST `body` as JSON to `{base_url}/{path}` and decode the response.
    ///
    /// Every failure is reported under `code`; transport errors are flagged
    /// retryable, HTTP error statuses are not.
    pub(crate) fn post_json<B, R>(&self, path: &str, body: &B, code: &str) -> Result<R, AppError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.config.base_url, path);
        tracing::debug!(%url, "calling OpenAI endpoint");

        let resp = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.config.api_key.trim()))
            .send_json(body);

        match resp {
            Ok(r) => r.into_json::<R>().map_err(|e| {
                AppError::new(code, "Failed to decode OpenAI response")
                    .with_details(format!("url={url}; err={e}"))
            }),
            Err(ureq::Error::Status(status, r)) => {
                let body = r
                    .into_string()
                    .unwrap_or_else(|_| "<body unavailable>".to_string());
                Err(AppError::new(code, "OpenAI request failed")
                    .with_details(format!("url={url}; status={status}; body={body}")))
            }
            Err(e) => Err(AppError::new(code, "Failed to reach OpenAI endpoint")
                .with_details(format!("url={url}; err={e}"))
                .with_retryable(true)),
        }
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
