use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::error::AppError;
use crate::tokenizer::{BpeTokenizer, Tokenizer};

pub const DEFAULT_MAX_TOKENS: usize = 200;
pub const DEFAULT_OVERLAP: usize = 20;

/// Splits text into overlapping windows measured in tokens.
pub struct Chunker {
    tokenizer: Box<dyn Tokenizer>,
}

impl Chunker {
    /// Chunker over the `cl100k_base` encoding.
    pub fn new() -> Result<Self, AppError> {
        Ok(Self::with_tokenizer(Box::new(BpeTokenizer::cl100k()?)))
    }

    pub fn with_tokenizer(tokenizer: Box<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    pub fn chunk_text(
        &self,
        text: &str,
        max_tokens: usize,
        overlap: usize,
    ) -> Result<Vec<String>, AppError> {
        validate_params(max_tokens, overlap)?;

        let tokens = self.tokenizer.encode(text);
        let chunks: Vec<String> = windows(tokens.len(), max_tokens, overlap)
            .into_iter()
            .map(|w| self.tokenizer.decode(&tokens[w]))
            .collect();

        tracing::debug!(
            tokens = tokens.len(),
            chunks = chunks.len(),
            max_tokens,
            overlap,
            "chunked text"
        );
        Ok(chunks)
    }

    pub fn chunk_file(
        &self,
        path: impl AsRef<Path>,
        max_tokens: usize,
        overlap: usize,
    ) -> Result<Vec<String>, AppError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::io_read("Failed to read text file for chunking", path, &e))?;
        self.chunk_text(&text, max_tokens, overlap)
    }
}

impl std::fmt::Debug for Chunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunker").finish_non_exhaustive()
    }
}

/// Token ranges of every window, in emission order.
///
/// Starts at 0 and advances by `max_tokens - overlap` until the start reaches
/// `token_count`; the last window may be shorter than `max_tokens`. Callers are
/// expected to have passed [`validate_params`].
pub fn windows(token_count: usize, max_tokens: usize, overlap: usize) -> Vec<Range<usize>> {
    let stride = max_tokens.saturating_sub(overlap);
    if stride == 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(token_count.div_ceil(stride));
    let mut start = 0usize;
    while start < token_count {
        let end = (start + max_tokens).min(token_count);
        out.push(start..end);
        start += stride;
    }
    out
}

/// `max_tokens` must be positive and strictly larger than `overlap`, otherwise
/// the window never advances.
pub fn validate_params(max_tokens: usize, overlap: usize) -> Result<(), AppError> {
    if max_tokens == 0 {
        return Err(AppError::new(
            "CHUNK_INVALID_PARAMS",
            "max_tokens must be greater than zero",
        ));
    }
    if overlap >= max_tokens {
        return Err(AppError::new(
            "CHUNK_INVALID_PARAMS",
            "overlap must be smaller than max_tokens",
        )
        .with_details(format!("max_tokens={max_tokens}; overlap={overlap}")));
    }
    Ok(())
}
