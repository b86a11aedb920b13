//! Topic-based fan-out for catalog events
//!
//! One broadcast channel per topic. Delivery is at-most-once with no replay:
//! a subscriber that connects after an event was published never sees it, and
//! a slow subscriber that overruns the channel capacity drops the oldest
//! events (surfaced as a lag error on its receiver).
//!
//! A review append publishes to two topics: the per-book topic
//! (`book:{id}`), so a future authorization layer can gate subscriptions per
//! book without touching the transport, and the `reviews` firehose carrying
//! every new review.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::domain::book::{BookId, Review};
use crate::domain::CatalogEvent;

/// Firehose topic carrying every new review
pub const FIREHOSE_TOPIC: &str = "reviews";

/// Per-book topic name
pub fn book_topic(id: &BookId) -> String {
    format!("book:{}", id)
}

/// Topic fan-out for catalog events
#[derive(Debug, Clone)]
pub struct ReviewFeed {
    /// Map of topic name -> broadcast channel
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<CatalogEvent>>>>,
    capacity: usize,
}

impl ReviewFeed {
    /// Create a new feed with the given per-topic channel capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Publish an event to a single topic
    ///
    /// Fire-and-forget: an event published to a topic with no subscribers is
    /// dropped silently.
    pub async fn publish(&self, topic: impl Into<String>, event: CatalogEvent) {
        let topic = topic.into();
        let channels = self.channels.read().await;

        if let Some(sender) = channels.get(&topic) {
            let delivered = sender.send(event).unwrap_or(0);
            debug!(topic = %topic, delivered, "Published catalog event");
        }
    }

    /// Subscribe to a topic
    ///
    /// Returns a receiver that sees every event published to the topic from
    /// this moment on; nothing published earlier is replayed.
    pub async fn subscribe(&self, topic: impl Into<String>) -> broadcast::Receiver<CatalogEvent> {
        let topic = topic.into();
        let mut channels = self.channels.write().await;

        let sender = channels
            .entry(topic)
            .or_insert_with(|| broadcast::channel(self.capacity).0);

        sender.subscribe()
    }

    /// Publish a `ReviewAdded` event to the book's topic and the firehose
    pub async fn publish_review_added(&self, book_id: &BookId, review: &Review) {
        let event = CatalogEvent::ReviewAdded {
            book_id: book_id.clone(),
            review: review.clone(),
        };

        self.publish(book_topic(book_id), event.clone()).await;
        self.publish(FIREHOSE_TOPIC, event).await;
    }

    /// Get count of active topics
    pub async fn topic_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

impl Default for ReviewFeed {
    fn default() -> Self {
        Self::new(256)
    }
}
