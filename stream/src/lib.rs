//! Caller-side streaming policy around the pure parser: chunk accumulation,
//! reparse throttling, interactive prefix truncation, and the exactly-once
//! final parse, delivered through a render sink.

mod config;
mod drive;
mod session;
mod sink;

pub use config::ConfigError;
pub use config::StreamConfig;
pub use drive::drive;
pub use session::StreamSession;
pub use sink::RenderSink;
