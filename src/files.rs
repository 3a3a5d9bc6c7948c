//! Storage for uploaded training documents. Files land under a per-plan
//! subdirectory with a random name; the original filename lives only in the
//! database record.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// Maximum accepted upload size: 10 MB.
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Accepted document extensions.
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".pdf", ".txt", ".doc", ".docx"];

/// Lower-cased extension of a filename, including the dot.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

/// Validate an upload's extension and size, returning the normalized
/// extension.
pub fn validate_upload(filename: &str, size: usize) -> Result<String, ApiError> {
    let ext = file_extension(filename).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "File type not allowed. Allowed types: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ))
    })?;

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ApiError::BadRequest(format!(
            "File type {} not allowed. Allowed types: {}",
            ext,
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    if size > MAX_UPLOAD_SIZE {
        return Err(ApiError::BadRequest(format!(
            "File size exceeds maximum allowed size of {}MB",
            MAX_UPLOAD_SIZE / (1024 * 1024)
        )));
    }

    Ok(ext)
}

/// Save an upload under `<upload_dir>/<subdir>/` with a random filename and
/// return the stored path.
pub fn save_upload(
    upload_dir: &str,
    subdir: &str,
    filename: &str,
    data: &[u8],
) -> Result<String, ApiError> {
    let ext = validate_upload(filename, data.len())?;

    let dir: PathBuf = [upload_dir, subdir].iter().collect();
    std::fs::create_dir_all(&dir)
        .map_err(|e| ApiError::Internal(format!("Failed to create upload directory: {e}")))?;

    let stored_name = format!("{}{}", Uuid::new_v4(), ext);
    let path = dir.join(stored_name);

    std::fs::write(&path, data)
        .map_err(|e| ApiError::Internal(format!("Failed to write uploaded file: {e}")))?;

    debug!("Stored upload {} at {}", filename, path.display());
    Ok(path.to_string_lossy().into_owned())
}

/// Delete a stored file. Failures are logged and swallowed: removing the
/// database record must succeed even when the file is already gone.
pub fn delete_file(path: &str) {
    if Path::new(path).exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Failed to delete file {}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_extraction() {
        assert_eq!(file_extension("plan.pdf"), Some(".pdf".to_string()));
        assert_eq!(file_extension("Plan.PDF"), Some(".pdf".to_string()));
        assert_eq!(file_extension("notes.tar.gz"), Some(".gz".to_string()));
        assert_eq!(file_extension("no_extension"), None);
    }

    #[test]
    fn test_validate_upload_rejects_bad_extension() {
        assert!(validate_upload("malware.exe", 100).is_err());
        assert!(validate_upload("no_extension", 100).is_err());
        assert!(validate_upload("plan.pdf", 100).is_ok());
        assert!(validate_upload("plan.DOCX", 100).is_ok());
    }

    #[test]
    fn test_validate_upload_rejects_oversize() {
        assert!(validate_upload("plan.pdf", MAX_UPLOAD_SIZE + 1).is_err());
        assert!(validate_upload("plan.pdf", MAX_UPLOAD_SIZE).is_ok());
    }

    #[test]
    fn test_delete_missing_file_is_silent() {
        // Must not panic or error
        delete_file("/nonexistent/path/file.pdf");
    }
}
