//! File type detection

use std::path::Path;

/// Extensions accepted by the upload endpoint
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Word,
    PlainText,
}

impl FileType {
    /// Anything that is not a PDF or Word document is read as text.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "doc" | "docx" => FileType::Word,
            _ => FileType::PlainText,
        }
    }
}

/// Extension of a filename, lowercased, without the dot
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

pub fn is_allowed_upload(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| ALLOWED_UPLOAD_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_is_case_insensitive() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("Docx"), FileType::Word);
        assert_eq!(FileType::from_extension("doc"), FileType::Word);
        assert_eq!(FileType::from_extension("txt"), FileType::PlainText);
        assert_eq!(FileType::from_extension("md"), FileType::PlainText);
        assert_eq!(FileType::from_extension(""), FileType::PlainText);
    }

    #[test]
    fn test_upload_gate() {
        assert!(is_allowed_upload("cv.pdf"));
        assert!(is_allowed_upload("CV.DOCX"));
        assert!(is_allowed_upload("notes.txt"));
        assert!(!is_allowed_upload("photo.png"));
        assert!(!is_allowed_upload("no_extension"));
        assert!(!is_allowed_upload(""));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("archive.tar.GZ"), Some("gz".to_string()));
        assert_eq!(extension_of("resume"), None);
    }
}
