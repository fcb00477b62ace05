use std::fmt;
use std::time::Duration;

use raglab_core::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Everything the remote collaborators need, passed explicitly into their
/// constructors.
#[derive(Clone, PartialEq)]
pub struct AiConfig {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub temperature: f32,
    /// `None` leaves requests without a client-side timeout.
    pub timeout: Option<Duration>,
}

impl AiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: None,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `OPENAI_API_KEY` is required; the
    /// other keys fall back to defaults when absent or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("OPENAI_API_KEY").ok_or_else(|| {
            AppError::new("AI_CONFIG_MISSING_KEY", "OPENAI_API_KEY not set in environment")
        })?;
        let mut cfg = Self::new(api_key);

        if let Some(v) = get("OPENAI_BASE_URL") {
            cfg.base_url = v;
        }
        if let Some(v) = get("RAGLAB_EMBEDDING_MODEL") {
            cfg.embedding_model = v;
        }
        if let Some(v) = get("RAGLAB_CHAT_MODEL") {
            cfg.chat_model = v;
        }
        if let Some(v) = get("RAGLAB_TEMPERATURE") {
            const MESSAGE: &str = "RAGLAB_TEMPERATURE must be a number between 0 and 2";
            let t: f32 = v
                .parse()
                .map_err(|_| AppError::config_invalid(MESSAGE, &v))?;
            if !t.is_finite() || !(0.0..=2.0).contains(&t) {
                return Err(AppError::config_invalid(MESSAGE, &v));
            }
            cfg.temperature = t;
        }
        if let Some(v) = get("RAGLAB_TIMEOUT_SECS") {
            let secs: u64 = v.parse().map_err(|_| {
                AppError::config_invalid("RAGLAB_TIMEOUT_SECS must be a whole number of seconds", &v)
            })?;
            cfg.timeout = Some(Duration::from_secs(secs));
        }

        Ok(cfg)
    }
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("embedding_model", &self.embedding_model)
            .field("chat_model", &self.chat_model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}
