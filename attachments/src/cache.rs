use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::Mutex;

use banter_content::AttachmentId;
use banter_content::AttachmentLookup;
use lru::LruCache;
use tracing::warn;

use crate::resolver::AttachmentStore;
use crate::resolver::ResolvedAttachment;

pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Thread-safe LRU of resolved attachments, shared between the streaming
/// layer (which fills it ahead of a parse pass) and the parser (which only
/// asks whether an id is renderable). Eviction re-resolves on next prefetch;
/// a missing entry just downgrades the marker to text for that pass.
#[derive(Clone)]
pub struct AttachmentCache {
    inner: Arc<Mutex<LruCache<AttachmentId, Arc<ResolvedAttachment>>>>,
}

impl AttachmentCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn insert(&self, attachment: ResolvedAttachment) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.put(attachment.id, Arc::new(attachment));
        }
    }

    pub fn get(&self, id: AttachmentId) -> Option<Arc<ResolvedAttachment>> {
        self.inner
            .lock()
            .ok()
            .and_then(|mut guard| guard.get(&id).cloned())
    }

    /// Resolve any of `ids` not already cached. Store failures are logged
    /// and skipped; the id stays unresolved and renders as text.
    pub fn prefetch(&self, ids: &[AttachmentId], store: &dyn AttachmentStore) {
        for id in ids {
            if self.contains(*id) {
                continue;
            }
            match store.load(*id) {
                Ok(Some(record)) => self.insert(ResolvedAttachment::from_record(*id, record)),
                Ok(None) => {}
                Err(err) => warn!("failed to load attachment {id}: {err}"),
            }
        }
    }
}

impl Default for AttachmentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl AttachmentLookup for AttachmentCache {
    fn contains(&self, id: AttachmentId) -> bool {
        self.inner
            .lock()
            .ok()
            .is_some_and(|mut guard| guard.get(&id).is_some())
    }
}
