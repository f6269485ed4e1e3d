//! Document text extraction for uploaded resumes and job descriptions.
//!
//! Supported: PDF (via `pdf-extract`), DOCX (the `word/document.xml` part,
//! read with `zip` + `quick-xml`) and plain text. Anything else fails with
//! `ExtractionError::UnsupportedFormat` so callers can tell format problems
//! apart from broken files.

use std::io::{Cursor, Read};

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::{debug, warn};
use zip::ZipArchive;

const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format '{0}'. Upload a PDF, DOCX or plain-text file.")]
    UnsupportedFormat(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not read DOCX: {0}")]
    Docx(String),

    #[error("Text file is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Detects the format from the file extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractionError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::PlainText),
            "" => Err(ExtractionError::UnsupportedFormat(file_name.to_string())),
            other => Err(ExtractionError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Extracts trimmed plain text from an uploaded document.
///
/// PDF and DOCX parsing are CPU-bound and run on the blocking pool.
pub async fn extract_text(file_name: &str, bytes: Bytes) -> Result<String, ExtractionError> {
    let format = DocumentFormat::from_file_name(file_name)?;
    debug!(file_name, ?format, size = bytes.len(), "extracting document text");

    let text = match format {
        DocumentFormat::PlainText => String::from_utf8(bytes.to_vec())?,
        DocumentFormat::Pdf => {
            run_blocking(file_name, ExtractionError::Pdf, move || {
                pdf_extract::extract_text_from_mem(&bytes)
                    .map_err(|e| ExtractionError::Pdf(format!("{e:?}")))
            })
            .await?
        }
        DocumentFormat::Docx => {
            run_blocking(file_name, ExtractionError::Docx, move || docx_text(&bytes)).await?
        }
    };

    Ok(text.trim().to_string())
}

/// Runs `parse` on the blocking pool. `pdf-extract` can panic on malformed
/// input; a panicked task is reported through `on_panic`.
async fn run_blocking<F>(
    file_name: &str,
    on_panic: fn(String) -> ExtractionError,
    parse: F,
) -> Result<String, ExtractionError>
where
    F: FnOnce() -> Result<String, ExtractionError> + Send + 'static,
{
    match tokio::task::spawn_blocking(parse).await {
        Ok(result) => result,
        Err(join_err) => {
            warn!("Extraction task failed for {file_name}: {join_err}");
            Err(on_panic("the document could not be parsed".to_string()))
        }
    }
}

/// Reads the main document part of a DOCX archive as plain text.
fn docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx_err = |e: &dyn std::fmt::Display| ExtractionError::Docx(e.to_string());

    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| docx_err(&e))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| docx_err(&e))?
        .read_to_string(&mut xml)
        .map_err(|e| docx_err(&e))?;

    document_xml_text(&xml).map_err(|e| docx_err(&e))
}

/// Text runs (`w:t`) of a WordprocessingML body. Paragraphs and breaks become
/// newlines, tabs stay tabs.
fn document_xml_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" | b"p" => out.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => out.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}
