//! WebSocket handler for the live review feed
//!
//! Clients subscribe to topics and receive catalog events published to them.
//! Delivery is best-effort: no replay, no acknowledgment, and a client that
//! connects after an event never sees it.
//!
//! # Message protocol
//!
//! **Client -> Server:**
//! ```json
//! {"type": "subscribe", "topics": ["reviews", "book:<id>"]}
//! {"type": "unsubscribe", "topics": ["book:<id>"]}
//! {"type": "ping"}
//! ```
//!
//! **Server -> Client:**
//! ```json
//! {"type": "subscribed", "topics": ["reviews"]}
//! {"type": "event", "topic": "reviews", "event": {"type": "newReview", ...}}
//! {"type": "error", "message": "..."}
//! {"type": "pong"}
//! ```

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{Sink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamMap;
use tracing::{debug, info, warn};

use crate::api::state::AppState;
use crate::domain::CatalogEvent;
use crate::infrastructure::notify::ReviewFeed;

/// WebSocket message envelope for the feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedMessage {
    /// Client subscribes to topics
    Subscribe { topics: Vec<String> },
    /// Client unsubscribes from topics
    Unsubscribe { topics: Vec<String> },
    /// Server confirms a subscription change
    Subscribed { topics: Vec<String> },
    /// Server pushes an event from a subscribed topic
    Event { topic: String, event: CatalogEvent },
    /// Error message
    Error { message: String },
    /// Ping message (keep-alive)
    Ping,
    /// Pong response
    Pong,
}

/// Upgrade handler for GET /ws
pub async fn feed_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.review_feed.clone()))
}

/// Handle one feed connection
///
/// A single select loop multiplexes the client's control messages with the
/// subscribed broadcast streams. Connection and disconnection only produce
/// log lines; no other component observes them.
async fn handle_socket(socket: WebSocket, feed: ReviewFeed) {
    info!("Feed client connected");

    let (mut sender, mut receiver) = socket.split();
    let mut streams: StreamMap<String, BroadcastStream<CatalogEvent>> = StreamMap::new();

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = match serde_json::from_str::<FeedMessage>(&text) {
                            Ok(FeedMessage::Subscribe { topics }) => {
                                debug!(?topics, "Client subscribing to topics");
                                for topic in &topics {
                                    if !streams.contains_key(topic.as_str()) {
                                        let rx = feed.subscribe(topic.clone()).await;
                                        streams.insert(topic.clone(), BroadcastStream::new(rx));
                                    }
                                }
                                FeedMessage::Subscribed { topics }
                            }
                            Ok(FeedMessage::Unsubscribe { topics }) => {
                                debug!(?topics, "Client unsubscribing from topics");
                                for topic in &topics {
                                    streams.remove(topic.as_str());
                                }
                                FeedMessage::Subscribed {
                                    topics: streams.keys().cloned().collect(),
                                }
                            }
                            Ok(FeedMessage::Ping) => FeedMessage::Pong,
                            Ok(msg) => {
                                warn!(?msg, "Unexpected message type from client");
                                FeedMessage::Error {
                                    message: "Unexpected message type".to_string(),
                                }
                            }
                            Err(e) => FeedMessage::Error {
                                message: format!("Invalid feed message: {}", e),
                            },
                        };

                        if send_message(&mut sender, &reply).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Ok(_)) => {
                        // binary/ping/pong frames need no handling
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "Feed socket error");
                        break;
                    }
                }
            }
            Some((topic, item)) = streams.next() => {
                match item {
                    Ok(event) => {
                        let message = FeedMessage::Event { topic, event };
                        if send_message(&mut sender, &message).await.is_err() {
                            break;
                        }
                    }
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        warn!(topic = %topic, skipped, "Feed client lagging, events dropped");
                    }
                }
            }
        }
    }

    info!("Feed client disconnected");
}

async fn send_message(
    sender: &mut (impl Sink<Message, Error = axum::Error> + Unpin),
    message: &FeedMessage,
) -> Result<(), axum::Error> {
    match serde_json::to_string(message) {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!(error = %e, "Failed to serialize feed message");
            Ok(())
        }
    }
}
