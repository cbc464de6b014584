use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Opaque id referencing out-of-band attachment bytes (an inline image or an
/// uploaded file). Serialized as the bare uuid string, which is also the form
/// embedded in attachment markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentId {
    uuid: Uuid,
}

impl AttachmentId {
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
        }
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self {
            uuid: Uuid::parse_str(s)?,
        })
    }
}

impl Default for AttachmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AttachmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl Serialize for AttachmentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.uuid)
    }
}

impl<'de> Deserialize<'de> for AttachmentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        let uuid = Uuid::parse_str(&value).map_err(serde::de::Error::custom)?;
        Ok(Self { uuid })
    }
}

/// One unit of structured, typed message content, in display order.
///
/// A parse pass turns a whole message body into a `Vec<ContentElement>`;
/// elements are rebuilt from scratch on every pass and owned solely by the
/// rendering layer afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentElement {
    /// Plain prose. Inline emphasis, headers and quotes are left for the
    /// rendering layer; segmentation is the only job done here.
    Text { content: String },
    /// A model's visible reasoning aside. `expanded` is a UI default only
    /// and never round-trips through parsing.
    Thinking { content: String, expanded: bool },
    /// Pipe-delimited table. Row cell counts may differ from the header's;
    /// rendering decides how to cope with ragged rows.
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Fenced code. `language` is empty when the fence carried no tag;
    /// `indent` is the leading-whitespace width stripped from the content
    /// lines, kept so display can re-pad.
    Code {
        code: String,
        language: String,
        indent: usize,
    },
    /// Display formula; multi-line blocks are newline-joined.
    Formula { latex: String },
    /// An inline image that resolved to renderable content.
    Image { id: AttachmentId },
}

/// Synchronous view over resolved attachments, consulted mid-parse to decide
/// whether an image marker becomes a [`ContentElement::Image`] or falls back
/// to plain text.
///
/// Implementations must not block on I/O: resolution happens ahead of
/// parsing, typically into the attachments crate's cache.
pub trait AttachmentLookup {
    /// True when `id` is resolved to renderable content.
    fn contains(&self, id: AttachmentId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attachment_id_round_trips_through_its_string_form() {
        let id = AttachmentId::new();
        let parsed = AttachmentId::from_string(&id.to_string()).expect("valid uuid");
        assert_eq!(id, parsed);
    }

    #[test]
    fn attachment_id_rejects_non_uuid_text() {
        assert!(AttachmentId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn elements_serialize_with_kind_tags() {
        let element = ContentElement::Code {
            code: "print(1)".to_string(),
            language: "py".to_string(),
            indent: 0,
        };
        let json = serde_json::to_value(&element).expect("serialize");
        assert_eq!(json["kind"], "code");
        assert_eq!(json["language"], "py");

        let back: ContentElement = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, element);
    }
}
