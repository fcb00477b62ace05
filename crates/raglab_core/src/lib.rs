pub mod chunking;
pub mod error;
pub mod similarity;
pub mod tokenizer;
pub mod vector_store;

pub use chunking::Chunker;
pub use vector_store::{Embedding, SearchHit, VectorStore};

#[cfg(test)]
mod tests {
    use super::error::AppError;

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new("IO_READ_FAILED", "read failed")
            .with_details("path=missing.txt")
            .with_retryable(false);
        assert_eq!(err.code, "IO_READ_FAILED");
        assert_eq!(err.message, "read failed");
        assert_eq!(err.details.as_deref(), Some("path=missing.txt"));
        assert_eq!(err.retryable, false);
        assert_eq!(err.to_string(), "[IO_READ_FAILED] read failed");
    }
}
