//! MIME type detection for uploaded images.
//!
//! Browsers sometimes send uploads without a part content type, or with a
//! generic `application/octet-stream`. Magic-number sniffing (`infer`) wins
//! over the file extension (`mime_guess`).

const OCTET_STREAM: &str = "application/octet-stream";

/// Guess MIME by inspecting bytes (magic numbers)
pub fn guess_mime_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|k| k.mime_type().to_string())
}

/// Guess MIME by file name (extension-based)
pub fn guess_mime_from_file_name(file_name: &str) -> Option<String> {
    mime_guess::from_path(file_name)
        .first_raw()
        .map(|s| s.to_string())
}

/// Combined guess: prefer bytes, fall back to extension, otherwise octet-stream
pub fn guess_mime(bytes: Option<&[u8]>, file_name: Option<&str>) -> String {
    if let Some(b) = bytes
        && let Some(m) = guess_mime_from_bytes(b)
    {
        return m;
    }
    if let Some(name) = file_name
        && let Some(m) = guess_mime_from_file_name(name)
    {
        return m;
    }
    OCTET_STREAM.to_string()
}

/// Content type to forward for an upload: the declared one when it is
/// specific, a guess otherwise.
pub fn resolve_upload_type(bytes: &[u8], declared: Option<&str>, file_name: Option<&str>) -> String {
    match declared.map(str::trim) {
        Some(ct) if !ct.is_empty() && !ct.eq_ignore_ascii_case(OCTET_STREAM) => ct.to_string(),
        _ => guess_mime(Some(bytes), file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn bytes_beat_extension() {
        assert_eq!(guess_mime(Some(PNG_MAGIC), Some("photo.jpg")), "image/png");
    }

    #[test]
    fn extension_when_bytes_unknown() {
        assert_eq!(guess_mime(Some(b"????"), Some("photo.JPG")), "image/jpeg");
        assert_eq!(guess_mime(None, Some("notes.txt")), "text/plain");
    }

    #[test]
    fn unknown_is_octet_stream() {
        assert_eq!(guess_mime(Some(b"xyz"), None), OCTET_STREAM);
    }

    #[test]
    fn declared_type_kept_unless_generic() {
        assert_eq!(
            resolve_upload_type(PNG_MAGIC, Some("image/webp"), None),
            "image/webp"
        );
        assert_eq!(
            resolve_upload_type(PNG_MAGIC, Some("application/octet-stream"), None),
            "image/png"
        );
        assert_eq!(resolve_upload_type(PNG_MAGIC, Some("  "), None), "image/png");
        assert_eq!(resolve_upload_type(PNG_MAGIC, None, None), "image/png");
    }
}
