//! Document loading: plain-text directories and PDF uploads.

use std::path::Path;

use crate::error::{KnowledgeError, KnowledgeResult};

/// A document's extracted text plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub source: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Load every `*.txt` file directly inside `dir`, sorted by file name.
pub async fn load_text_dir(dir: &Path) -> KnowledgeResult<Vec<SourceDocument>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| KnowledgeError::Io(format!("{}: {e}", dir.display())))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| KnowledgeError::Io(format!("{}: {e}", dir.display())))?
    {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "txt") && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| KnowledgeError::Io(format!("{}: {e}", path.display())))?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        docs.push(SourceDocument::new(source, text));
    }

    tracing::debug!(dir = %dir.display(), files = docs.len(), "loaded knowledge documents");
    Ok(docs)
}

/// Extract the text layer of a PDF held in memory.
pub fn extract_pdf_text(bytes: &[u8]) -> KnowledgeResult<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| KnowledgeError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_only_txt_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_menu.txt"), "Lamb rogan josh").unwrap();
        std::fs::write(dir.path().join("a_hours.txt"), "Open 5-11 PM").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let docs = load_text_dir(dir.path()).await.unwrap();
        assert_eq!(
            docs,
            vec![
                SourceDocument::new("a_hours.txt", "Open 5-11 PM"),
                SourceDocument::new("b_menu.txt", "Lamb rogan josh"),
            ]
        );
    }

    #[tokio::test]
    async fn missing_directory_is_io_error() {
        let err = load_text_dir(Path::new("/definitely/not/here"))
            .await
            .unwrap_err();
        assert!(matches!(err, KnowledgeError::Io(_)));
    }

    #[test]
    fn invalid_pdf_is_pdf_error() {
        let err = extract_pdf_text(b"not a pdf").unwrap_err();
        assert!(matches!(err, KnowledgeError::Pdf(_)));
    }
}
