//! Ask command handler.
//!
//! One-shot question answering: grounded in a document folder when one is
//! given, open chat otherwise.

use clap::Args;
use docchat_core::{config::AppConfig, AppResult};
use docchat_knowledge::session::answer_general;
use docchat_llm::create_client;
use std::path::PathBuf;

use super::chat::build_session;

/// Ask a single question and exit
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Folder of documents to ground the answer in
    #[arg(short, long)]
    pub folder: Option<PathBuf>,

    /// Words per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Chunks retrieved for a grounded answer
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut config = config.clone();
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        config.validate()?;

        let (answer, mode) = match self.folder {
            Some(ref folder) => {
                let session = build_session(&config, folder).await?;
                let answer = session.answer_document_question(&self.question).await?;
                (answer, "document")
            }
            None => {
                let llm = create_client(
                    &config.provider,
                    config.endpoint.as_deref(),
                    config.resolve_api_key().as_deref(),
                )?;
                let answer = answer_general(llm.as_ref(), &config.model, &self.question).await?;
                (answer, "general")
            }
        };

        if self.json {
            let output = serde_json::json!({
                "answer": answer,
                "mode": mode,
                "provider": config.provider,
                "model": config.model,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", answer);
        }

        Ok(())
    }
}
