//! Binary attachments for multipart bodies.

use std::path::Path;

use crate::error::ProxyError;
use crate::utils::mime::guess_mime;

/// Binary content with a file name and content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Build an attachment, guessing the content type from the bytes or the
    /// file name extension.
    pub fn guessed(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let filename = filename.into();
        let data = data.into();
        let content_type = guess_mime(Some(data.as_slice()), Some(&filename));
        Self {
            filename,
            content_type,
            data,
        }
    }

    /// Read a file into an attachment named after the file's last path component.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ProxyError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|e| {
            ProxyError::invalid_request(format!(
                "Failed to read attachment '{}': {e}",
                path.display()
            ))
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::guessed(filename, data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn guesses_from_extension_when_bytes_are_unknown() {
        let attachment = Attachment::guessed("notes.txt", b"plain words".to_vec());
        assert_eq!(attachment.content_type, "text/plain");
    }

    #[test]
    fn falls_back_to_octet_stream() {
        let attachment = Attachment::guessed("blob", vec![0u8, 1, 2]);
        assert_eq!(attachment.content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn reads_files_from_disk() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("temp file");
        file.write_all(br#"{"a":1}"#).expect("write");

        let attachment = Attachment::from_path(file.path()).await.expect("read");
        assert_eq!(attachment.data, br#"{"a":1}"#.to_vec());
        assert_eq!(attachment.content_type, "application/json");
        assert!(attachment.filename.ends_with(".json"));
    }

    #[tokio::test]
    async fn missing_files_are_invalid_requests() {
        let err = Attachment::from_path("/definitely/not/here.bin")
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::InvalidRequest(_)));
    }
}
