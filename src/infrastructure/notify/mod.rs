//! Notification infrastructure
//!
//! Best-effort fan-out of catalog events to connected listeners.

mod feed;

pub use feed::{book_topic, ReviewFeed, FIREHOSE_TOPIC};
