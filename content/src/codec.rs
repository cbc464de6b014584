//! Codec between the persisted flat message body and its attachment-aware
//! part list. The flat form is what the parser consumes and what goes over
//! the wire to a model; markers keep attachment ids inline.

use crate::element::AttachmentId;
use crate::markers;
use crate::markers::ATTACHMENT_MARKER_REGEX;

/// One message part on its way into storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    File(AttachmentId),
    Image(AttachmentId),
}

impl ContentPart {
    fn storage_fragment(&self) -> String {
        match self {
            ContentPart::Text(text) => text.clone(),
            ContentPart::File(id) => markers::file_marker(*id),
            ContentPart::Image(id) => markers::image_marker(*id),
        }
    }
}

/// Serialize parts into the flat storage form, newline-joined in order.
pub fn to_storage_string(parts: &[ContentPart]) -> String {
    parts
        .iter()
        .map(ContentPart::storage_fragment)
        .collect::<Vec<_>>()
        .join("\n")
}

/// All attachment ids referenced by markers in `storage`, in order of
/// appearance. Markers whose payload is not a valid uuid are skipped; ids
/// that merely fail to resolve are still returned, since resolution is the
/// caller's concern.
pub fn extract_attachment_ids(storage: &str) -> Vec<AttachmentId> {
    ATTACHMENT_MARKER_REGEX
        .captures_iter(storage)
        .filter_map(|caps| {
            let m = caps.get(1).or_else(|| caps.get(2))?;
            AttachmentId::from_string(m.as_str()).ok()
        })
        .collect()
}

/// Remove every attachment marker, yielding text suitable for previews and
/// title generation. Lines that held nothing but markers collapse away
/// entirely; blank lines that were already blank survive.
pub fn strip_markers(storage: &str) -> String {
    let mut kept: Vec<String> = Vec::new();
    for line in storage.split('\n') {
        let stripped = ATTACHMENT_MARKER_REGEX.replace_all(line, "");
        if stripped.trim().is_empty() && !line.trim().is_empty() {
            continue;
        }
        kept.push(stripped.into_owned());
    }
    kept.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn storage_string_joins_parts_in_order() {
        let file = AttachmentId::new();
        let image = AttachmentId::new();
        let parts = vec![
            ContentPart::Text("hello".to_string()),
            ContentPart::File(file),
            ContentPart::Image(image),
            ContentPart::Text("bye".to_string()),
        ];
        assert_eq!(
            to_storage_string(&parts),
            format!("hello\n<file-uuid>{file}</file-uuid>\n<image-uuid>{image}</image-uuid>\nbye")
        );
    }

    #[test]
    fn extraction_returns_ids_in_order_of_appearance() {
        let a = AttachmentId::new();
        let b = AttachmentId::new();
        let storage = format!(
            "x <image-uuid>{b}</image-uuid> y\n<file-uuid>{a}</file-uuid>"
        );
        assert_eq!(extract_attachment_ids(&storage), vec![b, a]);
    }

    #[test]
    fn extraction_preserves_duplicates() {
        let id = AttachmentId::new();
        let storage = format!("<file-uuid>{id}</file-uuid>\n<file-uuid>{id}</file-uuid>");
        assert_eq!(extract_attachment_ids(&storage), vec![id, id]);
    }

    #[test]
    fn extraction_skips_malformed_ids() {
        let good = AttachmentId::new();
        let storage = format!(
            "<file-uuid>garbage</file-uuid>\n<file-uuid>{good}</file-uuid>"
        );
        assert_eq!(extract_attachment_ids(&storage), vec![good]);
    }

    #[test]
    fn extraction_on_markerless_text_is_empty() {
        assert!(extract_attachment_ids("no markers here").is_empty());
    }

    #[test]
    fn stripping_collapses_marker_only_lines() {
        let id = AttachmentId::new();
        let storage = format!("above\n<file-uuid>{id}</file-uuid>\nbelow");
        assert_eq!(strip_markers(&storage), "above\nbelow");
    }

    #[test]
    fn stripping_keeps_lines_with_surrounding_text() {
        let id = AttachmentId::new();
        let storage = format!("see <image-uuid>{id}</image-uuid> here");
        assert_eq!(strip_markers(&storage), "see  here");
    }

    #[test]
    fn stripping_preserves_intentional_blank_lines() {
        let id = AttachmentId::new();
        let storage = format!("a\n\nb\n<file-uuid>{id}</file-uuid>");
        assert_eq!(strip_markers(&storage), "a\n\nb");
    }

    #[test]
    fn round_trip_laws_hold() {
        let file = AttachmentId::new();
        let image = AttachmentId::new();
        let parts = vec![
            ContentPart::Text("first".to_string()),
            ContentPart::Image(image),
            ContentPart::Text("second".to_string()),
            ContentPart::File(file),
        ];
        let storage = to_storage_string(&parts);
        assert_eq!(extract_attachment_ids(&storage), vec![image, file]);
        assert_eq!(strip_markers(&storage), "first\nsecond");
    }
}
