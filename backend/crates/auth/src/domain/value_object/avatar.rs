//! Avatar Value Object
//!
//! A profile picture, stored as-is. Only PNG and JPEG are accepted and the
//! format is taken from the file signature, never from the client's
//! `Content-Type`.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};

/// Largest accepted avatar, in bytes
pub const AVATAR_MAX_BYTES: usize = 1_000_000;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarFormat {
    Png,
    Jpeg,
}

impl AvatarFormat {
    fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_SIGNATURE) {
            Some(Self::Png)
        } else if bytes.starts_with(JPEG_SIGNATURE) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn from_content_type(value: &str) -> Option<Self> {
        match value {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Avatar {
    bytes: Vec<u8>,
    format: AvatarFormat,
}

impl Avatar {
    pub fn new(bytes: Vec<u8>) -> AppResult<Self> {
        if bytes.is_empty() {
            return Err(AppError::bad_request("Please upload an image"));
        }
        if bytes.len() > AVATAR_MAX_BYTES {
            return Err(AppError::bad_request(format!(
                "Avatar must be at most {AVATAR_MAX_BYTES} bytes"
            )));
        }
        let format = AvatarFormat::sniff(&bytes)
            .ok_or_else(|| AppError::bad_request("Please upload a PNG or JPEG image"))?;

        Ok(Self { bytes, format })
    }

    pub fn from_db(bytes: Vec<u8>, format: AvatarFormat) -> Self {
        Self { bytes, format }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn format(&self) -> AvatarFormat {
        self.format
    }
}

impl fmt::Debug for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Avatar")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(len: usize) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.resize(len, 0);
        bytes
    }

    #[test]
    fn test_accepts_png_and_jpeg() {
        assert_eq!(Avatar::new(png(64)).unwrap().format(), AvatarFormat::Png);

        let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10];
        assert_eq!(Avatar::new(jpeg).unwrap().format(), AvatarFormat::Jpeg);
    }

    #[test]
    fn test_rejects_other_formats() {
        assert!(Avatar::new(b"GIF89a....".to_vec()).is_err());
        assert!(Avatar::new(Vec::new()).is_err());
    }

    #[test]
    fn test_size_limit() {
        assert!(Avatar::new(png(AVATAR_MAX_BYTES)).is_ok());
        assert!(Avatar::new(png(AVATAR_MAX_BYTES + 1)).is_err());
    }

    #[test]
    fn test_content_type_roundtrip() {
        for format in [AvatarFormat::Png, AvatarFormat::Jpeg] {
            assert_eq!(
                AvatarFormat::from_content_type(format.content_type()),
                Some(format)
            );
        }
    }
}
