//! Upload validation and plain-text extraction.

use std::path::Path;

use thiserror::Error;

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Text,
}

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "txt" => Ok(DocumentFormat::Text),
            _ => Err(ExtractionError::UnsupportedFormat(if ext.is_empty() {
                filename.to_string()
            } else {
                format!(".{ext}")
            })),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}. Allowed: .pdf, .txt")]
    UnsupportedFormat(String),

    #[error("File is empty")]
    Empty,

    #[error("File too large: {size} bytes. Maximum: {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("{0}")]
    InvalidContent(String),

    #[error("Could not read document: {0}")]
    Unreadable(String),
}

/// Checks name, size and signature before any parsing happens.
pub fn validate_upload(
    filename: &str,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<DocumentFormat, ExtractionError> {
    let format = DocumentFormat::from_filename(filename)?;

    if bytes.is_empty() {
        return Err(ExtractionError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(ExtractionError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }

    match format {
        DocumentFormat::Pdf if !bytes.starts_with(PDF_MAGIC) => Err(
            ExtractionError::InvalidContent("File does not appear to be a valid PDF".to_string()),
        ),
        DocumentFormat::Text if std::str::from_utf8(bytes).is_err() => Err(
            ExtractionError::InvalidContent("File does not appear to be valid text".to_string()),
        ),
        _ => Ok(format),
    }
}

/// Extracts plain text. PDF parsing is CPU-bound; async callers should run
/// this on a blocking thread.
pub fn extract_text(format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = match format {
        DocumentFormat::Text => std::str::from_utf8(bytes)
            .map_err(|e| ExtractionError::InvalidContent(e.to_string()))?
            .to_string(),
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Unreadable(e.to_string()))?,
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::Unreadable(
            "no text could be extracted".to_string(),
        ));
    }
    Ok(text)
}
