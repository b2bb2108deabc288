//! Chat command handler.
//!
//! Builds the retrieval pipeline over a document folder, then runs the
//! interactive question loop.

use clap::Args;
use docchat_core::{config::AppConfig, AppResult};
use docchat_knowledge::{
    chunker, create_provider, extract, route_input, ChatSession, EmbeddingConfig, Retriever, Route,
};
use docchat_llm::create_client;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Interactive chat over a folder of documents
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Folder containing the documents to chat about
    pub folder: PathBuf,

    /// Words per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Chunks retrieved per document question
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut config = config.clone();
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        config.validate()?;

        // Index construction happens once, before the loop; a slow
        // embedding backend makes this a noticeable one-time startup cost.
        let session = build_session(&config, &self.folder).await?;

        println!("=== docchat: ask questions about your documents ===");
        println!(
            "Indexed {} chunks from {}.",
            session.corpus_len(),
            self.folder.display()
        );
        println!("Prefix questions with 'doc:' (documents) or 'chat:' (general). Type 'exit' to quit.");

        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        let mut input = String::new();

        loop {
            print!("\n> ");
            stdout.flush()?;

            input.clear();
            // EOF closes the session like an explicit exit
            if stdin.lock().read_line(&mut input)? == 0 {
                break;
            }

            match route_input(&input) {
                Route::Exit => break,
                Route::Document(question) => {
                    match session.answer_document_question(&question).await {
                        Ok(answer) => println!("\nAssistant: {}", answer),
                        Err(e) => println!("[error] {}", e),
                    }
                }
                Route::General(question) => {
                    match session.answer_general_question(&question).await {
                        Ok(answer) => println!("\nAssistant: {}", answer),
                        Err(e) => println!("[error] {}", e),
                    }
                }
                Route::MissingQuestion(marker) => {
                    println!("[error] Please enter a question after '{}'.", marker);
                }
                Route::Unrecognized => {
                    println!(
                        "Prefix your input with 'doc:' for document questions or 'chat:' for general chat. Type 'exit' to quit."
                    );
                }
            }
        }

        Ok(())
    }
}

/// Build a chat session over `folder`: extract text, chunk it, embed and
/// index the chunks, and wire up the generation client.
///
/// Every fatal startup condition (missing folder, no extractable text,
/// empty corpus, dimension mismatch, unreachable embedding backend)
/// surfaces here, before any input is read.
pub(crate) async fn build_session(config: &AppConfig, folder: &Path) -> AppResult<ChatSession> {
    let text = extract::extract_folder(folder)?;

    let chunks = chunker::chunk_words(&text, config.chunk_size);
    tracing::info!("Split text into {} chunks", chunks.len());

    let api_key = config.resolve_api_key();

    let embedding_config = EmbeddingConfig::from_app(config);
    let embedder = create_provider(&embedding_config, api_key.as_deref())?;
    let retriever = Retriever::build(chunks, embedder).await?;

    let llm = create_client(
        &config.provider,
        config.endpoint.as_deref(),
        api_key.as_deref(),
    )?;

    Ok(ChatSession::new(
        retriever,
        llm,
        config.model.clone(),
        config.top_k,
    ))
}
