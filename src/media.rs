//! Avatar media storage: a flat directory of uploaded images plus the
//! shared placeholder every profile starts with.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::config::DEFAULT_AVATAR;

/// Maximum accepted avatar size (2 MB).
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

const PLACEHOLDER_SVG: &str = include_str!("../resources/avatar.svg");

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("unsupported image type")]
    UnsupportedType,
    #[error("file exceeds {MAX_AVATAR_BYTES} bytes")]
    TooLarge,
    #[error("media I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Create the media directory and install the placeholder avatar if absent.
pub fn init_media_dir(dir: &Path) -> Result<(), MediaError> {
    std::fs::create_dir_all(dir)?;
    let placeholder = dir.join(DEFAULT_AVATAR);
    if !placeholder.exists() {
        std::fs::write(&placeholder, PLACEHOLDER_SVG)?;
    }
    Ok(())
}

// Magic-byte sniffing; the claimed filename is not trusted.
fn detect_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("png")
    } else {
        None
    }
}

/// Store an uploaded avatar and return its media reference (the path
/// relative to the media dir).
pub fn store_avatar(dir: &Path, bytes: &[u8]) -> Result<String, MediaError> {
    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(MediaError::TooLarge);
    }
    let ext = detect_extension(bytes).ok_or(MediaError::UnsupportedType)?;
    let name = format!("{}.{ext}", Uuid::new_v4());
    std::fs::write(dir.join(&name), bytes)?;
    Ok(name)
}

/// Resolve a stored media reference to its on-disk path.
pub fn media_path(dir: &Path, reference: &str) -> PathBuf {
    dir.join(reference)
}
