use std::sync::Arc;
use std::time::Instant;

use banter_attachments::AttachmentCache;
use banter_attachments::AttachmentStore;
use banter_content::ContentElement;
use banter_content::MessageParser;
use banter_content::contains_image_marker;
use banter_content::extract_attachment_ids;
use tracing::debug;

use crate::config::StreamConfig;

/// One streamed response: the growing raw buffer, the reparse throttle, and
/// the attachment cache each parse pass consults.
///
/// Parsing stays synchronous and pure. The session only decides when to run
/// it and on how much of the buffer; attachment ids visible in the buffer
/// are resolved into the cache before the parser runs, so no parse ever
/// waits on I/O.
pub struct StreamSession {
    config: StreamConfig,
    cache: AttachmentCache,
    store: Option<Arc<dyn AttachmentStore + Send + Sync>>,
    buffer: String,
    last_parse: Option<Instant>,
}

impl StreamSession {
    pub fn new(config: StreamConfig) -> Self {
        let cache = AttachmentCache::new(config.cache_capacity);
        Self {
            config,
            cache,
            store: None,
            buffer: String::new(),
            last_parse: None,
        }
    }

    pub fn with_store(config: StreamConfig, store: Arc<dyn AttachmentStore + Send + Sync>) -> Self {
        let mut session = Self::new(config);
        session.store = Some(store);
        session
    }

    /// The cache is shared; cloning the handle lets callers seed resolved
    /// attachments up front.
    pub fn cache(&self) -> &AttachmentCache {
        &self.cache
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Append one delta from the chunk source.
    pub fn push(&mut self, delta: &str) {
        self.buffer.push_str(delta);
    }

    /// Interim parse of the buffer so far. Returns `None` while the throttle
    /// window from the previous parse is still open; otherwise a fresh
    /// element list replacing anything rendered earlier.
    pub fn render(&mut self, now: Instant) -> Option<Vec<ContentElement>> {
        if let Some(last) = self.last_parse {
            if now.duration_since(last) < self.config.update_interval() {
                return None;
            }
        }
        self.last_parse = Some(now);
        let view = interactive_view(&self.buffer, self.config.interactive_parse_limit);
        debug!(
            "stream.render buffer_len={} view_len={}",
            self.buffer.len(),
            view.len()
        );
        Some(self.parse(view))
    }

    /// The final, untruncated parse. Consuming the session makes a second
    /// finalize (or a render after it) unrepresentable.
    pub fn finalize(self) -> Vec<ContentElement> {
        debug!("stream.finalize buffer_len={}", self.buffer.len());
        self.parse(&self.buffer)
    }

    fn parse(&self, view: &str) -> Vec<ContentElement> {
        if let Some(store) = &self.store {
            let ids = extract_attachment_ids(view);
            if !ids.is_empty() {
                self.cache.prefetch(&ids, store.as_ref());
            }
        }
        MessageParser::with_attachments(&self.cache).parse(view)
    }
}

/// At most the first `limit` characters of `buffer`, except that a buffer
/// containing image markers is always parsed whole so truncation can never
/// hide an inline image.
fn interactive_view(buffer: &str, limit: usize) -> &str {
    if limit == 0 || buffer.len() <= limit {
        return buffer;
    }
    if contains_image_marker(buffer) {
        return buffer;
    }
    match buffer.char_indices().nth(limit) {
        Some((idx, _)) => &buffer[..idx],
        None => buffer,
    }
}
