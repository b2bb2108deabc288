//! End-to-end pipeline scenarios: chunk → embed → index → retrieve →
//! generate, with fake embedding and generation collaborators.

use crate::chunker::chunk_words;
use crate::embeddings::EmbeddingProvider;
use crate::retriever::Retriever;
use crate::session::{route_input, ChatSession, Route, CONTEXT_SEPARATOR};
use docchat_core::{AppError, AppResult};
use docchat_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::{Arc, Mutex};

/// Embedder producing fixed 2D vectors per known text.
#[derive(Debug)]
struct FixedEmbedder {
    plan: Vec<(&'static str, [f32; 2])>,
}

#[async_trait::async_trait]
impl EmbeddingProvider for FixedEmbedder {
    fn provider_name(&self) -> &str {
        "fixed"
    }

    fn model_name(&self) -> &str {
        "fixed-v1"
    }

    fn dimensions(&self) -> usize {
        2
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                self.plan
                    .iter()
                    .find(|(t, _)| t == text)
                    .map(|(_, v)| v.to_vec())
                    .ok_or_else(|| AppError::Embedding(format!("unplanned text: {}", text)))
            })
            .collect()
    }
}

/// Generator that records every request and returns a canned answer.
struct RecordingLlm {
    requests: Mutex<Vec<LlmRequest>>,
    answer: &'static str,
}

impl RecordingLlm {
    fn new(answer: &'static str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            answer,
        }
    }

    fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for RecordingLlm {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(LlmResponse {
            content: self.answer.to_string(),
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

/// Generator that always fails, for failed-turn scenarios.
struct BrokenLlm;

#[async_trait::async_trait]
impl LlmClient for BrokenLlm {
    fn provider_name(&self) -> &str {
        "broken"
    }

    async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
        Err(AppError::Llm("connection refused".to_string()))
    }
}

fn three_chunk_embedder() -> Arc<dyn EmbeddingProvider> {
    // Question lands closest to chunk 0, then chunk 2
    Arc::new(FixedEmbedder {
        plan: vec![
            ("alpha beta", [0.0, 0.0]),
            ("gamma delta", [10.0, 10.0]),
            ("epsilon zeta", [2.0, 0.0]),
            ("which greek letters?", [0.5, 0.0]),
        ],
    })
}

fn three_chunks() -> Vec<String> {
    vec![
        "alpha beta".to_string(),
        "gamma delta".to_string(),
        "epsilon zeta".to_string(),
    ]
}

#[tokio::test]
async fn grounded_turn_passes_joined_context_to_generator() {
    let retriever = Retriever::build(three_chunks(), three_chunk_embedder())
        .await
        .unwrap();
    let llm = Arc::new(RecordingLlm::new("they are greek letters"));
    let session = ChatSession::new(retriever, Arc::clone(&llm) as Arc<dyn LlmClient>, "test-model", 2);

    let answer = session
        .answer_document_question("which greek letters?")
        .await
        .unwrap();
    assert_eq!(answer, "they are greek letters");

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);

    let expected_context = format!("alpha beta{}epsilon zeta", CONTEXT_SEPARATOR);
    let expected_prompt = format!(
        "Context:\n{}\n\nQuestion: which greek letters?",
        expected_context
    );
    assert_eq!(requests[0].prompt, expected_prompt);
    assert_eq!(requests[0].model, "test-model");
    assert!(requests[0].system.is_some());
}

#[tokio::test]
async fn open_turn_sends_bare_question() {
    let retriever = Retriever::build(three_chunks(), three_chunk_embedder())
        .await
        .unwrap();
    let llm = Arc::new(RecordingLlm::new("hello!"));
    let session = ChatSession::new(retriever, Arc::clone(&llm) as Arc<dyn LlmClient>, "test-model", 2);

    let answer = session.answer_general_question("hello").await.unwrap();
    assert_eq!(answer, "hello!");

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt, "hello");
    // No retrieval context leaks into an open turn
    assert!(!requests[0].prompt.contains("Context:"));
}

#[tokio::test]
async fn generator_failure_is_a_turn_error_not_a_crash() {
    let retriever = Retriever::build(three_chunks(), three_chunk_embedder())
        .await
        .unwrap();
    let session = ChatSession::new(retriever, Arc::new(BrokenLlm), "test-model", 2);

    let result = session.answer_document_question("which greek letters?").await;
    assert!(matches!(result, Err(AppError::Llm(_))));

    // The session survives for the next turn
    let result = session.answer_document_question("which greek letters?").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn chunked_corpus_round_trips_through_retrieval() {
    // A tiny corpus chunked at 2 words per chunk gives positional chunks
    // whose texts must come back verbatim from retrieval.
    let text = "alpha beta gamma delta epsilon zeta";
    let chunks = chunk_words(text, 2);
    assert_eq!(chunks, three_chunks());

    let retriever = Retriever::build(chunks, three_chunk_embedder())
        .await
        .unwrap();
    let hits = retriever.retrieve("which greek letters?", 3).await.unwrap();

    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].position, 0);
    assert_eq!(hits[0].text, "alpha beta");
    assert_eq!(hits[1].position, 2);
    assert_eq!(hits[2].position, 1);
}

#[test]
fn routing_table() {
    assert_eq!(
        route_input("doc: what is the policy?"),
        Route::Document("what is the policy?".to_string())
    );
    assert_eq!(route_input("chat: hello"), Route::General("hello".to_string()));
    assert_eq!(route_input("doc:"), Route::MissingQuestion("doc:"));
    assert_eq!(route_input("banana"), Route::Unrecognized);
    assert_eq!(route_input("exit"), Route::Exit);
}
