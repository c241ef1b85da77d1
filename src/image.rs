use crate::error::ImageError;
use std::path::Path;

/// An image file attached to the form.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl SelectedImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime = detect_image_mime(&bytes);
        Self {
            file_name: file_name.into(),
            bytes,
            mime,
        }
    }

    /// Read an image from disk. `~/` is expanded against the home directory.
    pub fn load(path: &str) -> Result<Self, ImageError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(ImageError::NoPath);
        }
        let path = expand_home(trimmed);
        let bytes = std::fs::read(&path).map_err(|source| ImageError::Io {
            path: path.clone(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(ImageError::Empty(path));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        tracing::debug!("Attached {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::new(file_name, bytes))
    }

    /// Human-readable size, e.g. `84.2 KiB`.
    pub fn size_label(&self) -> String {
        let len = self.bytes.len() as f64;
        if len < 1024.0 {
            format!("{} B", self.bytes.len())
        } else if len < 1024.0 * 1024.0 {
            format!("{:.1} KiB", len / 1024.0)
        } else {
            format!("{:.1} MiB", len / (1024.0 * 1024.0))
        }
    }
}

fn expand_home(path: &str) -> std::path::PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(dirs) = directories::BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    Path::new(path).to_path_buf()
}

/// Sniff the MIME type from magic bytes; unknown formats go out as
/// `application/octet-stream` and are left to the service to reject.
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'B', b'M', ..] => "image/bmp",
        _ => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?})",
                &bytes[..bytes.len().min(4)]
            );
            "application/octet-stream"
        }
    }
}
