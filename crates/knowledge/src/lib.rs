//! Retrieval pipeline for docchat.
//!
//! This crate owns the core of the system: extracting text from a document
//! folder, chunking it into word windows, embedding the chunks, building an
//! in-memory exact nearest-neighbor index, and routing each conversation
//! turn to a grounded or open answer.
//!
//! Data flow: folder → [`extract`] → text → [`chunker`] → chunks →
//! embedding provider → vectors → [`index::FlatIndex`] (built once) → per
//! question: embed → search → top-k chunks → answer generation with the
//! chunk texts as context.

pub mod chunker;
pub mod embeddings;
pub mod extract;
pub mod index;
pub mod retriever;
pub mod session;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider};
pub use retriever::{RetrievedChunk, Retriever};
pub use session::{route_input, ChatSession, Route};
