//! Attachment resolution for chat content. Stores load raw bytes by id,
//! resolution tags them with a media kind and mime type, and a shared LRU
//! cache gives the parser its synchronous view of what is renderable.

mod cache;
mod kind;
mod resolver;

pub use cache::AttachmentCache;
pub use cache::DEFAULT_CACHE_CAPACITY;
pub use kind::AttachmentKind;
pub use resolver::AttachmentRecord;
pub use resolver::AttachmentStore;
pub use resolver::DirStore;
pub use resolver::MemoryStore;
pub use resolver::ResolvedAttachment;
pub use resolver::StoreError;
pub use resolver::human_size;
