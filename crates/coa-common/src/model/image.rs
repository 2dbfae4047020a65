//! Inline image data.
//!
//! Logos and signature images travel as base64 data URIs
//! (`data:image/png;base64,...`) and are embedded verbatim in the document.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// An image with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageData {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Parse a base64 data URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidImage("expected a data: URI".to_string()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidImage("data URI has no payload".to_string()))?;
        let mime_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| Error::InvalidImage("only base64 data URIs are supported".to_string()))?;
        if !mime_type.starts_with("image/") {
            return Err(Error::InvalidImage(format!("unsupported MIME type '{}'", mime_type)));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::InvalidImage(format!("bad base64 payload: {}", e)))?;
        Ok(Self::new(mime_type, bytes))
    }

    /// Read an image file, inferring the MIME type from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let mime_type = mime_for_extension(&ext).ok_or_else(|| {
            Error::InvalidImage(format!("unrecognized image extension '{}'", path.display()))
        })?;
        let bytes = std::fs::read(path)?;
        Ok(Self::new(mime_type, bytes))
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

impl TryFrom<String> for ImageData {
    type Error = Error;

    fn try_from(uri: String) -> Result<Self> {
        ImageData::from_data_uri(&uri)
    }
}

impl From<ImageData> for String {
    fn from(image: ImageData) -> Self {
        image.to_data_uri()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_data_uri_roundtrip() {
        let image = ImageData::new("image/png", vec![0x89, b'P', b'N', b'G']);
        let uri = image.to_data_uri();
        assert_eq!(uri, "data:image/png;base64,iVBORw==");
        assert_eq!(ImageData::from_data_uri(&uri).unwrap(), image);
    }

    #[test]
    fn test_rejects_malformed_uris() {
        assert!(ImageData::from_data_uri("http://example.com/logo.png").is_err());
        assert!(ImageData::from_data_uri("data:image/png;base64").is_err());
        assert!(ImageData::from_data_uri("data:text/plain;base64,aGk=").is_err());
        assert!(ImageData::from_data_uri("data:image/png,raw").is_err());
        assert!(ImageData::from_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let image: ImageData = serde_json::from_str("\"data:image/gif;base64,R0lG\"").unwrap();
        assert_eq!(image.mime_type, "image/gif");
        assert_eq!(image.bytes, b"GIF");
        assert!(serde_json::from_str::<ImageData>("\"nope\"").is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.PNG");
        std::fs::File::create(&path).unwrap().write_all(b"png").unwrap();
        let image = ImageData::from_path(&path).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, b"png");

        let bad = dir.path().join("logo.bmp");
        std::fs::write(&bad, b"bmp").unwrap();
        assert_eq!(ImageData::from_path(&bad).unwrap_err().code(), 11);
    }
}
