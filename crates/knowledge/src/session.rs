//! Per-turn routing and answer orchestration.
//!
//! Every line of user input is classified into a document question, a
//! general question, an exit request, or an input error. Only the two
//! question kinds ever reach a collaborator.

use crate::retriever::{RetrievedChunk, Retriever};
use docchat_core::AppResult;
use docchat_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Marker prefix for questions answered from the documents.
pub const DOC_PREFIX: &str = "doc:";

/// Marker prefix for general questions answered without grounding.
pub const CHAT_PREFIX: &str = "chat:";

/// Separator used to join retrieved chunk texts into one context string.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Tokens that end the session.
const EXIT_TOKENS: [&str; 2] = ["exit", "quit"];

const DOC_SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions about \
     the provided documents. Use the context to answer accurately and concisely.";

const CHAT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer the user's questions as best as you can.";

/// Classification of one line of user input.
///
/// Only [`Route::Document`] and [`Route::General`] reach a collaborator;
/// the other variants resolve locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Question to answer from the document corpus
    Document(String),

    /// Question to answer without document context
    General(String),

    /// A marker with nothing after it; carries the offending marker
    MissingQuestion(&'static str),

    /// Input matching no marker and no exit token
    Unrecognized,

    /// Session exit request
    Exit,
}

/// Classify one line of input.
///
/// Exit tokens and markers match case-insensitively; the question is the
/// remainder after the marker, trimmed of surrounding whitespace.
pub fn route_input(input: &str) -> Route {
    let trimmed = input.trim();

    if EXIT_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
    {
        return Route::Exit;
    }

    if let Some(rest) = strip_prefix_ci(trimmed, DOC_PREFIX) {
        let question = rest.trim();
        if question.is_empty() {
            return Route::MissingQuestion(DOC_PREFIX);
        }
        return Route::Document(question.to_string());
    }

    if let Some(rest) = strip_prefix_ci(trimmed, CHAT_PREFIX) {
        let question = rest.trim();
        if question.is_empty() {
            return Route::MissingQuestion(CHAT_PREFIX);
        }
        return Route::General(question.to_string());
    }

    Route::Unrecognized
}

/// Strip an ASCII prefix, ignoring case.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    s.get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &s[prefix.len()..])
}

/// One interactive session over an indexed corpus.
///
/// Owns its collaborators explicitly (no process-wide clients), so tests
/// can inject fakes and two sessions never share state.
pub struct ChatSession {
    retriever: Retriever,
    llm: Arc<dyn LlmClient>,
    model: String,
    top_k: usize,
}

impl ChatSession {
    /// Create a session from a built retriever and a generation client.
    pub fn new(
        retriever: Retriever,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            llm,
            model: model.into(),
            top_k,
        }
    }

    /// Number of chunks in the session corpus.
    pub fn corpus_len(&self) -> usize {
        self.retriever.len()
    }

    /// Answer a question grounded in the document corpus.
    ///
    /// Retrieves the top chunks for the question, joins their texts into a
    /// single context string, and asks the generator to answer from it.
    pub async fn answer_document_question(&self, question: &str) -> AppResult<String> {
        let hits = self.retriever.retrieve(question, self.top_k).await?;

        tracing::debug!(
            "Retrieved {} chunks for question (closest distance: {:?})",
            hits.len(),
            hits.first().map(|h| h.distance)
        );

        let context = join_context(&hits);
        let prompt = format!("Context:\n{}\n\nQuestion: {}", context, question);

        let request = LlmRequest::new(prompt, &self.model).with_system(DOC_SYSTEM_PROMPT);
        let response = self.llm.complete(&request).await?;

        Ok(response.content.trim().to_string())
    }

    /// Answer a general question without document context.
    pub async fn answer_general_question(&self, question: &str) -> AppResult<String> {
        answer_general(self.llm.as_ref(), &self.model, question).await
    }
}

/// Answer a general question with the given client, without any document
/// context. Used by the session and by one-shot callers that have no
/// corpus at all.
pub async fn answer_general(
    llm: &dyn LlmClient,
    model: &str,
    question: &str,
) -> AppResult<String> {
    let request = LlmRequest::new(question, model).with_system(CHAT_SYSTEM_PROMPT);
    let response = llm.complete(&request).await?;

    Ok(response.content.trim().to_string())
}

/// Join retrieved chunk texts into the single context string handed to the
/// generator.
pub fn join_context(hits: &[RetrievedChunk]) -> String {
    hits.iter()
        .map(|hit| hit.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_document_question() {
        assert_eq!(
            route_input("doc: what is the policy?"),
            Route::Document("what is the policy?".to_string())
        );
    }

    #[test]
    fn test_route_general_question() {
        assert_eq!(
            route_input("chat: hello"),
            Route::General("hello".to_string())
        );
    }

    #[test]
    fn test_route_markers_case_insensitive() {
        assert_eq!(
            route_input("DOC: where is it defined?"),
            Route::Document("where is it defined?".to_string())
        );
        assert_eq!(
            route_input("Chat: hi there"),
            Route::General("hi there".to_string())
        );
    }

    #[test]
    fn test_route_trims_question() {
        assert_eq!(
            route_input("  doc:   spaced out?   "),
            Route::Document("spaced out?".to_string())
        );
    }

    #[test]
    fn test_route_missing_question() {
        assert_eq!(route_input("doc:"), Route::MissingQuestion(DOC_PREFIX));
        assert_eq!(route_input("doc:    "), Route::MissingQuestion(DOC_PREFIX));
        assert_eq!(route_input("chat:"), Route::MissingQuestion(CHAT_PREFIX));
    }

    #[test]
    fn test_route_unrecognized() {
        assert_eq!(route_input("banana"), Route::Unrecognized);
        assert_eq!(route_input(""), Route::Unrecognized);
        assert_eq!(route_input("document: hm"), Route::Unrecognized);
    }

    #[test]
    fn test_route_exit_tokens() {
        assert_eq!(route_input("exit"), Route::Exit);
        assert_eq!(route_input("quit"), Route::Exit);
        assert_eq!(route_input("  EXIT  "), Route::Exit);
        // An exit word inside a question is not an exit
        assert_eq!(
            route_input("chat: how do I exit vim?"),
            Route::General("how do I exit vim?".to_string())
        );
    }

    #[test]
    fn test_join_context() {
        let hits = vec![
            RetrievedChunk {
                position: 0,
                text: "alpha beta".to_string(),
                distance: 0.1,
            },
            RetrievedChunk {
                position: 2,
                text: "epsilon zeta".to_string(),
                distance: 0.4,
            },
        ];

        assert_eq!(join_context(&hits), "alpha beta\n\nepsilon zeta");
    }

    #[test]
    fn test_join_context_empty() {
        assert_eq!(join_context(&[]), "");
    }
}
