use std::path::Path;

use raglab_ai::download::download_file;
use raglab_ai::{AiConfig, Embedder, OpenAiClient, OpenAiEmbedder, OpenAiLlm, RagEngine, RagOptions};
use raglab_core::error::AppError;
use raglab_core::{Chunker, VectorStore};

const PREVIEW_CHARS: usize = 200;

pub fn download(url: &str, out: &Path) -> Result<(), AppError> {
    let summary = download_file(url, out)?;
    println!(
        "Downloaded {} bytes and saved to {}",
        summary.bytes,
        summary.path.display()
    );
    Ok(())
}

pub fn chunk(file: &Path, max_tokens: usize, overlap: usize) -> Result<(), AppError> {
    let chunks = Chunker::new()?.chunk_file(file, max_tokens, overlap)?;
    println!("Chunks created: {}", chunks.len());
    if let Some(first) = chunks.first() {
        println!("\nFirst chunk:\n\n{first}");
    }
    Ok(())
}

pub fn embed(file: &Path, max_tokens: usize, overlap: usize) -> Result<(), AppError> {
    let chunks = Chunker::new()?.chunk_file(file, max_tokens, overlap)?;
    println!("Chunks created: {}", chunks.len());

    let client = OpenAiClient::new(AiConfig::from_env()?)?;
    let embedder = OpenAiEmbedder::new(client);
    let inputs: Vec<&str> = chunks.iter().map(String::as_str).collect();
    let embeddings = embedder.embed(&inputs)?;

    println!("Embeddings created: {}", embeddings.len());
    if let Some(first) = embeddings.first() {
        println!("Embedding dimension: {}", first.len());
        println!("\nFirst embedding:\n\n{first:?}");
    }
    Ok(())
}

pub fn ask(
    file: &Path,
    questions: &[String],
    k: usize,
    max_tokens: usize,
    overlap: usize,
) -> Result<(), AppError> {
    let config = AiConfig::from_env()?;
    let options = RagOptions::from_config(&config);
    let client = OpenAiClient::new(config)?;
    let embedder = OpenAiEmbedder::new(client.clone());
    let llm = OpenAiLlm::new(client);

    let chunks = Chunker::new()?.chunk_file(file, max_tokens, overlap)?;
    println!("Processing {}: {} chunks", file.display(), chunks.len());

    let mut engine = RagEngine::new(&embedder, &llm, VectorStore::new(), options);
    let added = engine.ingest(&chunks)?;
    println!("Added {added} chunks to the vector store");

    for question in questions {
        println!("\nQuery: '{question}'");
        let res = engine.query_with_hits(question, k)?;

        println!("\nTop {} most relevant passages:", res.hits.len());
        for (i, hit) in res.hits.iter().enumerate() {
            println!("\n{}. Score: {:.4}", i + 1, hit.score);
            println!("Text: {}", preview(&hit.text, PREVIEW_CHARS));
        }
        println!("\nAnswer: {}", res.answer);
    }
    Ok(())
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
