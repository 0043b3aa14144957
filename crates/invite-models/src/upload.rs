//! Upload validation helpers.

/// Validate image bytes by magic numbers (JPEG/PNG/GIF/WebP).
///
/// MIME types on multipart parts are client-controlled, so the handler
/// sniffs the actual bytes before writing anything to disk.
pub fn is_valid_image(bytes: &[u8]) -> bool {
    if bytes.len() < 4 {
        return false;
    }

    // JPEG
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return true;
    }

    // PNG
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return true;
    }

    // GIF
    if bytes.starts_with(b"GIF") {
        return true;
    }

    // WebP: RIFF....WEBP
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return true;
    }

    false
}
