//! Structured chat-message content: a line-oriented streaming parser that
//! turns raw model output into typed display blocks, the codec for the flat
//! persisted body with inline attachment markers, and chat-title cleanup.
//!
//! The parser is total over arbitrary text. Streamed prefixes cut mid-block
//! parse without error and converge to the final element list once the
//! closing markers arrive, which is what lets callers re-parse the whole
//! buffer on every update instead of patching state.

mod classify;
mod codec;
mod element;
mod markers;
mod parser;
mod title;

pub use classify::BlockType;
pub use classify::classify;
pub use codec::ContentPart;
pub use codec::extract_attachment_ids;
pub use codec::strip_markers;
pub use codec::to_storage_string;
pub use element::AttachmentId;
pub use element::AttachmentLookup;
pub use element::ContentElement;
pub use markers::contains_image_marker;
pub use markers::file_marker;
pub use markers::image_marker;
pub use parser::MessageParser;
pub use title::sanitize_title;
