//! Text extraction for uploaded documents.
//!
//! PDFs go through `pdf-extract`; plain-text formats are read as UTF-8.
//! Unsupported extensions are rejected before any file is stored.

use crate::types::{AppError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Text => "text",
        }
    }

    pub fn extraction_method(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf-extract",
            FileType::Text => "utf8",
        }
    }
}

/// Classify a filename by extension; `None` for unsupported formats.
pub fn file_type(file_name: &str) -> Option<FileType> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase();

    match extension.as_str() {
        "pdf" => Some(FileType::Pdf),
        "txt" | "md" => Some(FileType::Text),
        _ => None,
    }
}

/// Extract plain text from uploaded bytes.
pub fn extract_text(bytes: &[u8], file_type: FileType) -> Result<String> {
    let content = match file_type {
        FileType::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::InvalidInput(format!("PDF extraction failed: {}", e)))?,
        FileType::Text => String::from_utf8(bytes.to_vec())
            .map_err(|e| AppError::InvalidInput(format!("File is not valid UTF-8: {}", e)))?,
    };

    Ok(content.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_supported_extensions() {
        assert_eq!(file_type("paper.pdf"), Some(FileType::Pdf));
        assert_eq!(file_type("notes.TXT"), Some(FileType::Text));
        assert_eq!(file_type("readme.md"), Some(FileType::Text));
        assert_eq!(file_type("photo.png"), None);
        assert_eq!(file_type("no_extension"), None);
    }

    #[test]
    fn extracts_utf8_text() {
        let text = extract_text("hello world\n".as_bytes(), FileType::Text).unwrap();
        assert_eq!(text, "hello world");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let result = extract_text(&[0xff, 0xfe, 0x00], FileType::Text);
        assert!(result.is_err());
    }
}
