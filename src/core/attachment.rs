use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Could not read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{0}` is not a supported image (png, jpg, gif, webp)")]
    UnsupportedType(String),
    #[error("File is {size} bytes; the limit is 5 MB")]
    TooLarge { size: usize },
    #[error("File is empty")]
    Empty,
}

/// Payment screenshot held by a single wizard.
#[derive(Clone, PartialEq, Eq)]
pub struct AttachedFile {
    name: String,
    content_type: &'static str,
    bytes: Vec<u8>,
    preview: String,
}

impl AttachedFile {
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        // Check the type before reading a possibly large unrelated file.
        content_type_for(&name)?;
        let bytes = fs::read(path).map_err(|source| AttachmentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(name, bytes)
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AttachmentError> {
        let name = name.into();
        let content_type = content_type_for(&name)?;
        if bytes.is_empty() {
            return Err(AttachmentError::Empty);
        }
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge { size: bytes.len() });
        }
        let preview = format!("data:{};base64,{}", content_type, STANDARD.encode(&bytes));
        Ok(Self {
            name,
            content_type,
            bytes,
            preview,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `data:` URL of the image.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn size_label(&self) -> String {
        let size = self.size() as f64;
        if size >= 1024.0 * 1024.0 {
            format!("{:.1} MB", size / (1024.0 * 1024.0))
        } else if size >= 1024.0 {
            format!("{:.1} KB", size / 1024.0)
        } else {
            format!("{} B", self.size())
        }
    }
}

impl fmt::Debug for AttachedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(name: &str) -> Result<&'static str, AttachmentError> {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        _ => Err(AttachmentError::UnsupportedType(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builds_data_url_preview() {
        let file = AttachedFile::from_bytes("proof.PNG", vec![1, 2, 3]).unwrap();
        assert_eq!(file.content_type(), "image/png");
        assert_eq!(file.preview(), "data:image/png;base64,AQID");
        assert_eq!(file.size(), 3);
        assert_eq!(file.size_label(), "3 B");
    }

    #[test]
    fn rejects_non_images_and_oversized_files() {
        assert!(matches!(
            AttachedFile::from_bytes("proof.pdf", vec![1]),
            Err(AttachmentError::UnsupportedType(_))
        ));
        assert!(matches!(
            AttachedFile::from_bytes("proof.jpg", vec![0; MAX_ATTACHMENT_BYTES + 1]),
            Err(AttachmentError::TooLarge { .. })
        ));
        assert!(matches!(
            AttachedFile::from_bytes("proof.jpg", Vec::new()),
            Err(AttachmentError::Empty)
        ));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.jpeg");
        let mut handle = fs::File::create(&path).unwrap();
        handle.write_all(b"jpegdata").unwrap();
        let file = AttachedFile::from_path(&path).unwrap();
        assert_eq!(file.name(), "receipt.jpeg");
        assert_eq!(file.bytes(), b"jpegdata");

        let missing = AttachedFile::from_path(&dir.path().join("missing.png"));
        assert!(matches!(missing, Err(AttachmentError::Io { .. })));
    }
}
