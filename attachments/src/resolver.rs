use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use banter_content::AttachmentId;
use base64::Engine;
use thiserror::Error;

use crate::kind::AttachmentKind;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("attachment store i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw attachment bytes plus the metadata a store keeps alongside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRecord {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub extension: String,
}

/// A loaded attachment in renderable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttachment {
    pub id: AttachmentId,
    pub kind: AttachmentKind,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ResolvedAttachment {
    pub fn from_record(id: AttachmentId, record: AttachmentRecord) -> Self {
        let kind = AttachmentKind::from_extension(&record.extension);
        let mime_type = kind.mime_type(&record.extension);
        Self {
            id,
            kind,
            file_name: record.file_name,
            mime_type,
            bytes: record.bytes,
        }
    }

    /// Base64 payload for outbound API requests.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn human_size(&self) -> String {
        human_size(self.bytes.len() as u64)
    }
}

/// Decimal units, one fractional digit past kilobytes.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        let unit = UNITS[unit];
        format!("{value:.1} {unit}")
    }
}

/// Persistence-backed attachment source. Implementations may hit disk or a
/// database; callers resolve ahead of parsing so the parser itself never
/// waits on one of these.
pub trait AttachmentStore {
    /// `Ok(None)` means the id is unknown, which is not an error: the
    /// referencing marker will render as plain text.
    fn load(&self, id: AttachmentId) -> Result<Option<AttachmentRecord>, StoreError>;
}

/// In-memory store for tests and one-shot tooling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<AttachmentId, AttachmentRecord>>,
}

impl MemoryStore {
    pub fn insert(&self, id: AttachmentId, record: AttachmentRecord) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.insert(id, record);
        }
    }
}

impl AttachmentStore for MemoryStore {
    fn load(&self, id: AttachmentId) -> Result<Option<AttachmentRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .map(|guard| guard.get(&id).cloned())
            .unwrap_or_default())
    }
}

/// Directory-backed store: an attachment with id `X` is any file named
/// `X.<ext>` directly under the root. Lookup is lazy, nothing is read until
/// an id is requested.
#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AttachmentStore for DirStore {
    fn load(&self, id: AttachmentId) -> Result<Option<AttachmentRecord>, StoreError> {
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            let stem = path.file_stem().and_then(|s| s.to_str());
            let matches = stem
                .and_then(|s| AttachmentId::from_string(s).ok())
                .is_some_and(|candidate| candidate == id);
            if !matches {
                continue;
            }
            let file_name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            let extension = path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            let bytes = std::fs::read(&path)?;
            return Ok(Some(AttachmentRecord {
                bytes,
                file_name,
                extension,
            }));
        }
        Ok(None)
    }
}
