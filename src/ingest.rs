use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::HumanizeError;

/// Hard ceiling on uploads, checked before the file is read.
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Extensions offered in the file chooser. The filter is advisory; only
/// the size ceiling is enforced.
pub const ACCEPTED_EXTENSIONS: [&str; 8] =
    ["pdf", "txt", "doc", "docx", "jpg", "jpeg", "png", "webp"];

/// An accepted upload, encoded for transport. Created once per selection
/// and never mutated; replaced wholesale when the user picks a new file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub name: String,
    pub mime_type: String,
    /// Base64-encoded file bytes (standard alphabet).
    pub data: String,
    pub size: u64,
}

impl FileRecord {
    /// Encode raw bytes into a record, enforcing the size ceiling. The
    /// ceiling is inclusive: a file of exactly [`MAX_UPLOAD_BYTES`] passes.
    pub fn from_bytes(
        name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, HumanizeError> {
        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(HumanizeError::FileTooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            });
        }
        Ok(Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            data: BASE64.encode(&bytes),
            size,
        })
    }

    /// Size in KB, for the file summary row.
    pub fn size_display(&self) -> String {
        format!("{:.1} KB", self.size as f64 / 1024.0)
    }
}

/// MIME type for the upload, derived from the extension. Unknown
/// extensions fall back to a generic binary type rather than being
/// rejected.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Read a selected file into a [`FileRecord`]. The metadata size check
/// runs first so an oversized file is rejected without reading it.
pub async fn load_file(path: &Path) -> Result<FileRecord, HumanizeError> {
    let read_err = |source| HumanizeError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let meta = tokio::fs::metadata(path).await.map_err(read_err)?;
    if meta.len() > MAX_UPLOAD_BYTES {
        return Err(HumanizeError::FileTooLarge {
            size: meta.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(read_err)?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    FileRecord::from_bytes(&name, mime_for_path(path), bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_at_exactly_the_ceiling_is_accepted() {
        let bytes = vec![0u8; MAX_UPLOAD_BYTES as usize];
        let record = FileRecord::from_bytes("big.txt", "text/plain", bytes).unwrap();
        assert_eq!(record.size, MAX_UPLOAD_BYTES);
        assert_eq!(record.name, "big.txt");
    }

    #[test]
    fn file_one_byte_over_the_ceiling_is_rejected() {
        let bytes = vec![0u8; MAX_UPLOAD_BYTES as usize + 1];
        let err = FileRecord::from_bytes("big.txt", "text/plain", bytes).unwrap_err();
        assert!(matches!(
            err,
            HumanizeError::FileTooLarge { size, limit }
                if size == MAX_UPLOAD_BYTES + 1 && limit == MAX_UPLOAD_BYTES
        ));
    }

    #[test]
    fn bytes_are_base64_encoded() {
        let record =
            FileRecord::from_bytes("hi.txt", "text/plain", b"hello".to_vec()).unwrap();
        assert_eq!(record.data, "aGVsbG8=");
        assert_eq!(record.size, 5);
    }

    #[test]
    fn mime_mapping_covers_the_accepted_extensions() {
        assert_eq!(mime_for_path(Path::new("a.pdf")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("a.txt")), "text/plain");
        assert_eq!(mime_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.webp")), "image/webp");
        assert_eq!(
            mime_for_path(Path::new("a.unknown")),
            "application/octet-stream"
        );
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn load_file_reads_and_encodes_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, b"from disk").unwrap();

        let record = load_file(&path).await.unwrap();
        assert_eq!(record.name, "note.txt");
        assert_eq!(record.mime_type, "text/plain");
        assert_eq!(record.size, 9);
        assert_eq!(record.data, BASE64.encode(b"from disk"));
    }

    #[tokio::test]
    async fn load_file_reports_a_missing_path() {
        let err = load_file(Path::new("/no/such/file.txt")).await.unwrap_err();
        assert!(matches!(err, HumanizeError::FileRead { .. }));
    }
}
