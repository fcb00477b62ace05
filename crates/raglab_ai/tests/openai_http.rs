use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use pretty_assertions::assert_eq;
use raglab_ai::download::download_file;
use raglab_ai::{AiConfig, Embedder, Llm, OpenAiClient, OpenAiEmbedder, OpenAiLlm};

/// Serves exactly one HTTP response and hands back the raw request it got.
fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).expect("read");
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if let Some(head_end) = find_head_end(&raw) {
                let head = String::from_utf8_lossy(&raw[..head_end]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= head_end + 4 + len {
                    break;
                }
            }
        }
        stream.write_all(response.as_bytes()).expect("write");
        stream.flush().expect("flush");
        let _ = tx.send(String::from_utf8_lossy(&raw).into_owned());
    });

    (format!("http://{addr}/v1"), rx)
}

fn find_head_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n")
}

fn client(base_url: &str) -> OpenAiClient {
    let mut cfg = AiConfig::new("sk-test-key");
    cfg.base_url = base_url.to_string();
    OpenAiClient::new(cfg).expect("client")
}

/// Port from a listener that has already been dropped, so connects fail.
fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}/v1")
}

#[test]
fn embedder_restores_input_order_from_indices() {
    let (url, rx) = serve_once(
        "200 OK",
        r#"{"object":"list","data":[
            {"object":"embedding","index":1,"embedding":[0.0,1.0]},
            {"object":"embedding","index":0,"embedding":[1.0,0.0]}
        ],"model":"text-embedding-3-small"}"#,
    );
    let embedder = OpenAiEmbedder::new(client(&url));
    let out = embedder.embed(&["first", "second"]).expect("embed");
    assert_eq!(out, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);

    let req = rx.recv().expect("request");
    assert!(req.starts_with("POST /v1/embeddings "));
    assert!(req.contains("Bearer sk-test-key"));
    assert!(req.contains(r#""model":"text-embedding-3-small""#));
    assert!(req.contains(r#""input":["first","second"]"#));
}

#[test]
fn embedder_rejects_count_mismatch() {
    let (url, _rx) = serve_once(
        "200 OK",
        r#"{"data":[{"index":0,"embedding":[1.0]}]}"#,
    );
    let embedder = OpenAiEmbedder::new(client(&url));
    let err = embedder.embed(&["a", "b"]).expect_err("mismatch");
    assert_eq!(err.code, "AI_EMBEDDINGS_FAILED");
}

#[test]
fn embedder_rejects_duplicate_indices() {
    let (url, _rx) = serve_once(
        "200 OK",
        r#"{"data":[{"index":0,"embedding":[1.0]},{"index":0,"embedding":[2.0]}]}"#,
    );
    let embedder = OpenAiEmbedder::new(client(&url));
    let err = embedder.embed(&["a", "b"]).expect_err("duplicate index");
    assert_eq!(err.code, "AI_EMBEDDINGS_FAILED");
    assert!(err.message.contains("not a permutation"), "{}", err.message);
}

#[test]
fn embedder_skips_the_network_for_empty_batches() {
    let embedder = OpenAiEmbedder::new(client(&closed_port_url()));
    assert!(embedder.embed(&[]).expect("empty").is_empty());
}

#[test]
fn http_error_status_is_not_retryable() {
    let (url, _rx) = serve_once(
        "401 Unauthorized",
        r#"{"error":{"message":"Incorrect API key provided"}}"#,
    );
    let embedder = OpenAiEmbedder::new(client(&url));
    let err = embedder.embed(&["a"]).expect_err("401");
    assert_eq!(err.code, "AI_EMBEDDINGS_FAILED");
    assert!(!err.retryable);
    let details = err.details.unwrap_or_default();
    assert!(details.contains("status=401"), "{details}");
    assert!(details.contains("Incorrect API key"), "{details}");
}

#[test]
fn transport_failure_is_flagged_retryable() {
    let embedder = OpenAiEmbedder::new(client(&closed_port_url()));
    let err = embedder.embed(&["a"]).expect_err("refused");
    assert_eq!(err.code, "AI_EMBEDDINGS_FAILED");
    assert!(err.retryable);
}

#[test]
fn llm_sends_single_user_message_and_returns_first_choice() {
    let (url, rx) = serve_once(
        "200 OK",
        r#"{"id":"chatcmpl-1","choices":[{"index":0,"message":{"role":"assistant","content":"  Be calm.  "},"finish_reason":"stop"}]}"#,
    );
    let llm = OpenAiLlm::new(client(&url));
    let out = llm
        .complete("How should one deal with anger?", "gpt-3.5-turbo", 0.5)
        .expect("complete");
    assert_eq!(out, "  Be calm.  ");

    let req = rx.recv().expect("request");
    assert!(req.starts_with("POST /v1/chat/completions "));
    assert!(req.contains(r#""messages":[{"role":"user","content":"How should one deal with anger?"}]"#));
    assert!(req.contains(r#""model":"gpt-3.5-turbo""#));
    assert!(req.contains(r#""temperature":0.5"#));
}

#[test]
fn llm_without_choices_is_an_error() {
    let (url, _rx) = serve_once("200 OK", r#"{"choices":[]}"#);
    let llm = OpenAiLlm::new(client(&url));
    let err = llm.complete("q", "gpt-3.5-turbo", 0.7).expect_err("no choices");
    assert_eq!(err.code, "AI_COMPLETION_FAILED");
}

#[test]
fn download_writes_body_and_creates_parent_dirs() {
    let (url, _rx) = serve_once("200 OK", "Book I. From my grandfather Verus.");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("data").join("meditations.txt");

    let summary = download_file(&format!("{url}/pg2680.txt"), &path).expect("download");
    assert_eq!(summary.path, path);
    assert_eq!(summary.bytes, 34);
    assert_eq!(
        std::fs::read_to_string(&path).expect("read"),
        "Book I. From my grandfather Verus."
    );
}

#[test]
fn download_fails_on_bad_status_without_writing() {
    let (url, _rx) = serve_once("404 Not Found", "missing");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.txt");

    let err = download_file(&format!("{url}/nope.txt"), &path).expect_err("404");
    assert_eq!(err.code, "DOWNLOAD_FAILED");
    assert!(err.details.unwrap_or_default().contains("status=404"));
    assert!(!path.exists());
}
