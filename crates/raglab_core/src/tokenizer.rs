use tiktoken_rs::CoreBPE;

use crate::error::AppError;

/// Maps text to an ordered token sequence and back.
///
/// Only token counts matter to the chunker; implementations are free to pick
/// any vocabulary as long as `decode(encode(t))` reads like `t`.
pub trait Tokenizer {
    fn encode(&self, text: &str) -> Vec<usize>;

    /// Decode a token window. Windows may start or end inside a multi-byte
    /// character; implementations must still return readable text.
    fn decode(&self, tokens: &[usize]) -> String;
}

/// `cl100k_base` byte-pair encoding, the vocabulary of the OpenAI embedding
/// and chat models this workspace talks to.
pub struct BpeTokenizer {
    bpe: CoreBPE,
}

impl BpeTokenizer {
    pub fn cl100k() -> Result<Self, AppError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| {
            AppError::new(
                "CHUNK_TOKENIZER_FAILED",
                "Failed to load cl100k_base encoding",
            )
            .with_details(e.to_string())
        })?;
        Ok(Self { bpe })
    }
}

impl std::fmt::Debug for BpeTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BpeTokenizer").finish_non_exhaustive()
    }
}

impl Tokenizer for BpeTokenizer {
    fn encode(&self, text: &str) -> Vec<usize> {
        self.bpe.encode_ordinary(text)
    }

    fn decode(&self, tokens: &[usize]) -> String {
        // Cut points can split a UTF-8 sequence; replace the stray bytes
        // instead of failing the whole window.
        let bytes = self.bpe._decode_native(tokens);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
