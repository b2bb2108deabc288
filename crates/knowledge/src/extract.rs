//! Document text extraction.
//!
//! Walks a folder of documents and concatenates their extracted text into
//! the session corpus. Supported formats are text-like: plain text,
//! markdown, and HTML.

use docchat_core::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Content type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Markdown,
    Html,
    PlainText,
    Unsupported,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("md") | Some("markdown") => Self::Markdown,
            Some("html") | Some("htm") => Self::Html,
            Some("txt") => Self::PlainText,
            _ => Self::Unsupported,
        }
    }
}

/// Extract the text of every supported file under `folder`, concatenated
/// in sorted path order.
///
/// Sorted order keeps the corpus deterministic across runs, so chunk
/// positions are stable for a given folder. Files that fail to read are
/// skipped with a warning; a folder that yields no text at all is a fatal
/// condition, since no retrieval index can be built over nothing.
pub fn extract_folder(folder: &Path) -> AppResult<String> {
    if !folder.is_dir() {
        return Err(AppError::Ingestion(format!(
            "document folder {:?} not found or is not a directory",
            folder
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| ContentType::from_path(e.path()) != ContentType::Unsupported)
        .map(|e| e.into_path())
        .collect();
    files.sort();

    let mut corpus = String::new();
    for path in &files {
        match extract_file(path) {
            Ok(text) => {
                if !text.is_empty() {
                    if !corpus.is_empty() {
                        corpus.push('\n');
                    }
                    corpus.push_str(&text);
                }
            }
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", path, e);
            }
        }
    }

    if corpus.trim().is_empty() {
        return Err(AppError::NoContent {
            path: folder.to_path_buf(),
        });
    }

    tracing::info!(
        "Extracted {} bytes of text from {} files in {:?}",
        corpus.len(),
        files.len(),
        folder
    );

    Ok(corpus)
}

/// Parse a single file and extract clean text.
fn extract_file(path: &Path) -> AppResult<String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Ingestion(format!("Failed to read {:?}: {}", path, e)))?;

    let cleaned = match ContentType::from_path(path) {
        ContentType::Markdown => clean_markdown(&raw),
        ContentType::Html => clean_html(&raw),
        ContentType::PlainText => raw.trim().to_string(),
        ContentType::Unsupported => {
            return Err(AppError::Ingestion(format!(
                "Unsupported file type: {:?}",
                path
            )))
        }
    };

    Ok(cleaned)
}

/// Clean markdown by removing headers, fences, and rules.
fn clean_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim_start_matches('#').trim();

        // Skip horizontal rules and code fences
        if trimmed.starts_with("---") || trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            continue;
        }

        if !trimmed.is_empty() {
            result.push_str(trimmed);
            result.push('\n');
        }
    }

    result.trim().to_string()
}

/// Clean HTML by stripping tags and script/style bodies.
fn clean_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;

    for (i, ch) in text.char_indices() {
        if ch == '<' {
            in_tag = true;

            if tag_at(text, i, "<script") {
                in_script = true;
            } else if tag_at(text, i, "</script") {
                in_script = false;
            } else if tag_at(text, i, "<style") {
                in_style = true;
            } else if tag_at(text, i, "</style") {
                in_style = false;
            }
        } else if ch == '>' {
            in_tag = false;
        } else if !in_tag && !in_script && !in_style {
            result.push(ch);
        }
    }

    // Collapse whitespace
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive check for `tag` starting at byte offset `i`.
fn tag_at(text: &str, i: usize, tag: &str) -> bool {
    text.get(i..i + tag.len())
        .is_some_and(|s| s.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_content_type_detection() {
        assert_eq!(
            ContentType::from_path(Path::new("notes.md")),
            ContentType::Markdown
        );
        assert_eq!(
            ContentType::from_path(Path::new("page.HTML")),
            ContentType::Html
        );
        assert_eq!(
            ContentType::from_path(Path::new("file.txt")),
            ContentType::PlainText
        );
        assert_eq!(
            ContentType::from_path(Path::new("report.pdf")),
            ContentType::Unsupported
        );
        assert_eq!(
            ContentType::from_path(Path::new("no_extension")),
            ContentType::Unsupported
        );
    }

    #[test]
    fn test_extract_folder_concatenates_sorted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "second file").unwrap();
        fs::write(temp.path().join("a.txt"), "first file").unwrap();

        let corpus = extract_folder(temp.path()).unwrap();
        assert_eq!(corpus, "first file\nsecond file");
    }

    #[test]
    fn test_extract_folder_missing() {
        let result = extract_folder(Path::new("/definitely/not/a/folder"));
        assert!(matches!(result, Err(AppError::Ingestion(_))));
    }

    #[test]
    fn test_extract_folder_empty_is_no_content() {
        let temp = TempDir::new().unwrap();
        let result = extract_folder(temp.path());
        assert!(matches!(result, Err(AppError::NoContent { .. })));
    }

    #[test]
    fn test_extract_folder_unsupported_only_is_no_content() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("image.png"), [0u8, 1, 2, 3]).unwrap();

        let result = extract_folder(temp.path());
        assert!(matches!(result, Err(AppError::NoContent { .. })));
    }

    #[test]
    fn test_clean_markdown() {
        let input = "# Header\n\nSome text\n\n```rust\ncode\n```\n\nMore text\n\n---\n";
        let output = clean_markdown(input);
        assert!(output.contains("Header"));
        assert!(output.contains("Some text"));
        assert!(output.contains("More text"));
        assert!(!output.contains("```"));
        assert!(!output.contains("---"));
    }

    #[test]
    fn test_clean_html() {
        let input = "<html><head><style>p { color: red }</style></head>\
                     <body><p>Hello <b>world</b></p><script>var x = 1;</script></body></html>";
        let output = clean_html(input);
        assert_eq!(output, "Hello world");
    }
}
