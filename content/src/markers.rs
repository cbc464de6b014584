//! The inline marker grammar shared by the parser and the codec.
//!
//! Markers are fixed ASCII spellings with no escaping and no nesting:
//! `<file-uuid>{uuid}</file-uuid>`, `<image-uuid>{uuid}</image-uuid>`,
//! `<think>...</think>`, triple-backtick code fences and `\[`/`\]` formula
//! delimiters. Anything else is content.

use lazy_static::lazy_static;
use regex_lite::Regex;

use crate::element::AttachmentId;

pub const THINK_OPEN: &str = "<think>";
pub const THINK_CLOSE: &str = "</think>";
pub const CODE_FENCE: &str = "```";
pub const FORMULA_OPEN: &str = r"\[";
pub const FORMULA_CLOSE: &str = r"\]";
pub const IMAGE_OPEN: &str = "<image-uuid>";
pub const IMAGE_CLOSE: &str = "</image-uuid>";
pub const FILE_OPEN: &str = "<file-uuid>";
pub const FILE_CLOSE: &str = "</file-uuid>";

#[allow(clippy::unwrap_used)]
lazy_static! {
    /// Matches either attachment marker kind; group 1 captures a file id,
    /// group 2 an image id.
    pub(crate) static ref ATTACHMENT_MARKER_REGEX: Regex =
        Regex::new(r"<file-uuid>([^<]*)</file-uuid>|<image-uuid>([^<]*)</image-uuid>").unwrap();
    static ref IMAGE_MARKER_REGEX: Regex =
        Regex::new(r"<image-uuid>([^<]*)</image-uuid>").unwrap();
}

pub fn file_marker(id: AttachmentId) -> String {
    format!("{FILE_OPEN}{id}{FILE_CLOSE}")
}

pub fn image_marker(id: AttachmentId) -> String {
    format!("{IMAGE_OPEN}{id}{IMAGE_CLOSE}")
}

/// Id of the first well-formed image marker on `line`, if any. Markers whose
/// payload is not a valid uuid are ignored.
pub(crate) fn extract_image_id(line: &str) -> Option<AttachmentId> {
    let caps = IMAGE_MARKER_REGEX.captures(line)?;
    let raw = caps.get(1)?.as_str();
    AttachmentId::from_string(raw).ok()
}

/// True when `text` carries at least one image marker. Used by the streaming
/// layer, which must never truncate a body mid-marker.
pub fn contains_image_marker(text: &str) -> bool {
    text.contains(IMAGE_OPEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_id_extraction_ignores_malformed_payloads() {
        assert_eq!(extract_image_id("<image-uuid>oops</image-uuid>"), None);

        let id = AttachmentId::new();
        let line = format!("  {}  ", image_marker(id));
        assert_eq!(extract_image_id(&line), Some(id));
    }

    #[test]
    fn file_markers_are_not_image_markers() {
        let id = AttachmentId::new();
        assert_eq!(extract_image_id(&file_marker(id)), None);
        assert!(!contains_image_marker(&file_marker(id)));
        assert!(contains_image_marker(&image_marker(id)));
    }
}
