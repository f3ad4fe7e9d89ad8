//! Photo storage on the local filesystem.
//!
//! Files are written under `uploads.dir` with a random name and served back
//! by the static file service mounted at `uploads.public_path`.

use std::path::PathBuf;

use crate::config::UploadSettings;

const KNOWN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "heic", "heif", "avif", "tiff"];

/// Accepted `image/*` subtypes and the extension each is stored under.
/// Only raster formats: anything a browser could run script from stays out.
const RASTER_TYPES: &[(&str, &str)] = &[
    ("jpeg", "jpg"),
    ("pjpeg", "jpg"),
    ("png", "png"),
    ("gif", "gif"),
    ("webp", "webp"),
    ("bmp", "bmp"),
    ("heic", "heic"),
    ("heif", "heif"),
    ("avif", "avif"),
    ("tiff", "tiff"),
];

/// A photo written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub filename: String,
    pub url: String,
    pub size: usize,
}

pub struct PhotoStorage {
    dir: PathBuf,
    public_path: String,
}

impl PhotoStorage {
    pub fn new(settings: &UploadSettings) -> Self {
        Self {
            dir: PathBuf::from(&settings.dir),
            public_path: settings.public_path.trim_end_matches('/').to_string(),
        }
    }

    /// Write the file under a fresh `{uuid}.{ext}` name.
    pub async fn save(
        &self,
        original_name: Option<&str>,
        content_type: &str,
        bytes: &[u8],
    ) -> std::io::Result<StoredPhoto> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = format!(
            "{}.{}",
            uuid::Uuid::new_v4().simple(),
            file_extension(original_name, content_type)
        );
        tokio::fs::write(self.dir.join(&filename), bytes).await?;

        tracing::debug!(filename = %filename, size = bytes.len(), "Photo stored");

        Ok(StoredPhoto {
            url: format!("{}/{}", self.public_path, filename),
            filename,
            size: bytes.len(),
        })
    }
}

/// Stored extension for a raster image MIME type, `None` for anything else.
pub fn raster_extension(content_type: &str) -> Option<&'static str> {
    let subtype = content_type
        .split(';')
        .next()?
        .trim()
        .to_ascii_lowercase();
    let subtype = subtype.strip_prefix("image/")?;

    RASTER_TYPES
        .iter()
        .find(|(known, _)| *known == subtype)
        .map(|(_, ext)| *ext)
}

pub fn is_raster_image(content_type: &str) -> bool {
    raster_extension(content_type).is_some()
}

/// Extension from the client's file name when it is a known image type,
/// otherwise from the MIME type.
pub fn file_extension(original_name: Option<&str>, content_type: &str) -> String {
    let from_name = original_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| KNOWN_EXTENSIONS.contains(&ext.as_str()));

    from_name.unwrap_or_else(|| raster_extension(content_type).unwrap_or("img").to_string())
}
