use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::similarity;

pub type Embedding = Vec<f32>;

/// One stored `(text, embedding)` pair. Immutable once added.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub text: String,
    pub embedding: Embedding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub text: String,
    pub score: f32,
}

/// Append-only in-memory store ranked by exact cosine similarity.
///
/// Texts and embeddings live side by side in one `Vec`, so index `i` of the
/// texts always pairs with index `i` of the vectors. Embedding dimensionality is
/// not validated on insert; mixing dimensions is a caller error.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    records: Vec<StoredRecord>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, text: impl Into<String>, embedding: Embedding) {
        self.records.push(StoredRecord {
            text: text.into(),
            embedding,
        });
    }

    /// Add parallel sequences of texts and embeddings, keeping their order.
    /// Nothing is added when the lengths differ.
    pub fn add_many<S>(&mut self, texts: &[S], embeddings: Vec<Embedding>) -> Result<(), AppError>
    where
        S: AsRef<str>,
    {
        if texts.len() != embeddings.len() {
            return Err(AppError::new(
                "STORE_LENGTH_MISMATCH",
                "Texts and embeddings must have the same length",
            )
            .with_details(format!(
                "texts={}; embeddings={}",
                texts.len(),
                embeddings.len()
            )));
        }
        self.records.reserve(texts.len());
        for (text, embedding) in texts.iter().zip(embeddings) {
            self.add(text.as_ref(), embedding);
        }
        tracing::debug!(added = texts.len(), total = self.records.len(), "stored embeddings");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredRecord> {
        self.records.iter()
    }

    /// Top `k` records by cosine similarity to `query`, best first.
    ///
    /// Equal scores keep insertion order. A zero-norm query or record scores NaN
    /// and ranks after every real score; the NaN is returned as-is. A record
    /// whose dimension differs from the query's is scored over the shorter
    /// length (using each side's full norm) rather than rejected.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchHit> {
        if k == 0 || self.records.is_empty() {
            return Vec::new();
        }

        let qnorm = similarity::l2_norm(query);
        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                let vnorm = similarity::l2_norm(&rec.embedding);
                (i, similarity::cosine_similarity(query, &rec.embedding, qnorm, vnorm))
            })
            .collect();

        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, rank_order);
            scored.truncate(k);
        }
        scored.sort_by(rank_order);

        scored
            .into_iter()
            .map(|(i, score)| SearchHit {
                text: self.records[i].text.clone(),
                score,
            })
            .collect()
    }
}

/// Score descending with NaN last, then insertion index ascending. Total, so
/// partial selection and the final sort agree with a stable full sort.
fn rank_order(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    let by_score = match (a.1.is_nan(), b.1.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal),
    };
    by_score.then(a.0.cmp(&b.0))
}
