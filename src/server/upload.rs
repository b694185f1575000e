//! Saving uploaded files under collision-free names

use crate::error::Result;
use crate::input::file_detector::extension_of;
use log::warn;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Used when nothing of the client's filename survives sanitizing
const FALLBACK_NAME: &str = "upload";

#[derive(Debug, Clone)]
pub struct SavedUpload {
    pub path: PathBuf,
    pub original_name: String,
    /// Lowercased extension of the original filename, empty if none
    pub extension: String,
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Accents are folded (NFKD) and remaining non-ASCII characters are
/// dropped, path separators and whitespace runs
/// become `_`, anything outside `[A-Za-z0-9._-]` is removed and leading or
/// trailing dots and underscores are stripped.
pub fn sanitize_filename(name: &str) -> String {
    let spaced: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// `<8 hex chars>_<sanitized name>`, with a fresh random prefix per call
pub fn unique_upload_name(original_name: &str) -> String {
    let sanitized = sanitize_filename(original_name);
    let sanitized = if sanitized.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        sanitized
    };

    let token = Uuid::new_v4().simple().to_string();
    format!("{}_{}", &token[..8], sanitized)
}

/// Write an upload to `upload_dir`. Never overwrites an existing file.
pub async fn save_upload(upload_dir: &Path, original_name: &str, data: &[u8]) -> Result<SavedUpload> {
    let path = upload_dir.join(unique_upload_name(original_name));

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await?;
    write_or_discard(file, &path, data).await?;

    Ok(SavedUpload {
        path,
        original_name: original_name.to_string(),
        extension: extension_of(original_name).unwrap_or_default(),
    })
}

/// Write `data`, deleting `path` if the write does not complete
async fn write_or_discard<W>(mut writer: W, path: &Path, data: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(data).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        drop(writer);
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            warn!("Could not remove partial upload {}: {}", path.display(), remove_err);
        }
        return Err(e.into());
    }

    Ok(())
}
