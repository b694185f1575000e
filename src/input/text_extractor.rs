//! Text extraction from various file formats

use crate::error::ExtractionError;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

pub type ExtractResult = std::result::Result<String, ExtractionError>;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = ExtractResult> + Send;
}

async fn read_bytes(path: &Path) -> std::result::Result<Vec<u8>, ExtractionError> {
    fs::read(path).await.map_err(|source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> ExtractResult {
        let bytes = read_bytes(path).await?;

        // pdf-extract panics on some malformed inputs; the blocking pool
        // turns a panic into a JoinError instead of tearing down the caller.
        let parsed = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

        match parsed {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractionError::Pdf {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
            Err(e) => Err(ExtractionError::Pdf {
                path: path.to_path_buf(),
                reason: format!("parser aborted: {}", e),
            }),
        }
    }
}

/// Office Open XML (.docx) text extraction.
///
/// Reads the header parts, the main document and the footer parts, in that
/// order. Only run text (`w:t`) is kept, so deleted revisions and field
/// codes never reach the output.
///
/// Legacy binary `.doc` files are not zip archives and fail with
/// [`ExtractionError::Word`].
pub struct WordExtractor {
    header_part: Regex,
    footer_part: Regex,
}

impl Default for WordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl WordExtractor {
    const DOCUMENT_PART: &'static str = "word/document.xml";

    pub fn new() -> Self {
        Self {
            header_part: Regex::new(r"^word/header[0-9]*\.xml$").expect("Invalid header part regex"),
            footer_part: Regex::new(r"^word/footer[0-9]*\.xml$").expect("Invalid footer part regex"),
        }
    }

    /// Extract text from the bytes of a .docx archive
    pub fn extract_from_bytes(&self, bytes: &[u8]) -> std::result::Result<String, String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| format!("not an Office Open XML archive: {}", e))?;

        // Parts are read in archive order
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        if !names.iter().any(|name| name == Self::DOCUMENT_PART) {
            return Err(format!("missing {}", Self::DOCUMENT_PART));
        }

        let headers = names.iter().filter(|name| self.header_part.is_match(name));
        let footers = names.iter().filter(|name| self.footer_part.is_match(name));

        let mut text = String::new();
        for part in headers {
            text.push_str(&part_text(&mut archive, part)?);
        }

        text.push_str(&part_text(&mut archive, Self::DOCUMENT_PART)?);

        for part in footers {
            text.push_str(&part_text(&mut archive, part)?);
        }

        Ok(text.trim().to_string())
    }
}

fn part_text(
    archive: &mut zip::ZipArchive<Cursor<&[u8]>>,
    part: &str,
) -> std::result::Result<String, String> {
    let mut xml = String::new();
    archive
        .by_name(part)
        .map_err(|e| format!("missing {}: {}", part, e))?
        .read_to_string(&mut xml)
        .map_err(|e| format!("unreadable {}: {}", part, e))?;

    wordprocessing_xml_to_text(&xml).map_err(|e| format!("malformed {}: {}", part, e))
}

/// Text of one WordprocessingML part: `w:t` contents, tabs and breaks
/// inside runs, and a newline after every paragraph.
fn wordprocessing_xml_to_text(xml: &str) -> std::result::Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = true,
                b"w:tab" if run_depth > 0 => text.push('\t'),
                b"w:br" | b"w:cr" if run_depth > 0 => text.push('\n'),
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" if run_depth > 0 => text.push('\t'),
                b"w:br" | b"w:cr" if run_depth > 0 => text.push('\n'),
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => text.push_str(&t.unescape()?),
            Event::CData(t) if in_text => text.push_str(&String::from_utf8_lossy(&t)),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

impl TextExtractor for WordExtractor {
    async fn extract(&self, path: &Path) -> ExtractResult {
        let bytes = read_bytes(path).await?;

        self.extract_from_bytes(&bytes)
            .map_err(|reason| ExtractionError::Word {
                path: path.to_path_buf(),
                reason,
            })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> ExtractResult {
        let bytes = read_bytes(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
