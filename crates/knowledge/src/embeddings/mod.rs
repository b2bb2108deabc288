//! Embedding generation for the retrieval pipeline.
//!
//! Provider-agnostic: the retriever only sees the [`EmbeddingProvider`]
//! trait, so tests inject deterministic fakes and the CLI picks a real
//! backend from configuration.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
