use std::sync::Arc;

use lopdf::Document;

use crate::{
    errors::{AppError, AppResult},
    models::dto::response::ProcessedDocument,
};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DEFAULT_FILE_NAME: &str = "document.pdf";

const UNREADABLE_PDF: &str =
    "Failed to process PDF. Please ensure the file is a valid PDF with readable text content.";
const TOO_LITTLE_TEXT: &str = "PDF appears to be empty or contains very little readable text. \
     Please ensure the PDF contains text content that can be extracted.";

/// The `pdf` part of a multipart upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Raw text pulled out of a document, one entry per page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPages {
    pub pages: Vec<String>,
}

#[cfg_attr(test, mockall::automock)]
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> AppResult<ExtractedPages>;
}

pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn extract(&self, bytes: &[u8]) -> AppResult<ExtractedPages> {
        let document = Document::load_mem(bytes).map_err(|e| {
            log::warn!("Could not parse uploaded PDF: {}", e);
            AppError::DocumentError(UNREADABLE_PDF.to_string())
        })?;

        let mut pages = Vec::new();
        for page_number in document.get_pages().keys() {
            match document.extract_text(&[*page_number]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    log::debug!("No text extracted from page {}: {}", page_number, e);
                    pages.push(String::new());
                }
            }
        }

        Ok(ExtractedPages { pages })
    }
}

pub struct DocumentService {
    extractor: Arc<dyn TextExtractor>,
    min_document_chars: usize,
}

impl DocumentService {
    pub fn new(extractor: Arc<dyn TextExtractor>, min_document_chars: usize) -> Self {
        Self {
            extractor,
            min_document_chars,
        }
    }

    /// Checks the upload, extracts its text and rejects documents with too little of it.
    pub fn process(&self, upload: Option<UploadedFile>) -> AppResult<ProcessedDocument> {
        let upload = upload
            .ok_or_else(|| AppError::ValidationError("No PDF file uploaded".to_string()))?;

        if !is_pdf(upload.content_type.as_deref()) {
            return Err(AppError::ValidationError(
                "Only PDF files are allowed".to_string(),
            ));
        }
        if upload.bytes.is_empty() {
            return Err(AppError::ValidationError("No PDF file uploaded".to_string()));
        }

        let file_name = upload
            .file_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        let bytes = upload.bytes;

        let extracted = self.extractor.extract(&bytes)?;
        let content = join_pages(&extracted.pages);

        if content.chars().count() < self.min_document_chars {
            log::info!(
                "Rejected '{}': only {} characters of text",
                file_name,
                content.chars().count()
            );
            return Err(AppError::DocumentError(TOO_LITTLE_TEXT.to_string()));
        }

        log::info!(
            "Extracted {} characters from {} pages of '{}'",
            content.chars().count(),
            extracted.pages.len(),
            file_name
        );

        Ok(ProcessedDocument {
            content,
            page_count: extracted.pages.len().max(1),
            file_name,
            file_size: bytes.len(),
        })
    }
}

fn is_pdf(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
}

/// Collapses each page's whitespace and joins the pages with single spaces.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .flat_map(|page| page.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
