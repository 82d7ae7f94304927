//! Name-scoped publish/subscribe bus connecting the sessions of one process.
//!
//! Delivery is at-most-once and FIFO per sender. A subscriber only sees
//! messages published after it subscribed, never sees its own messages, and
//! silently loses whatever it falls behind on. Periodic full-state syncs are
//! what make that acceptable.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::reducer::Action;

/// Identity of one endpoint (one controller or overlay context) on a channel.
pub type EndpointId = Uuid;

/// Action as carried on the bus, stamped by the publishing endpoint.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Endpoint that published the action.
    pub origin: EndpointId,
    /// Per-origin sequence number, starting at 1 and strictly increasing.
    pub seq: u64,
    /// Action to apply on receipt.
    pub action: Action,
}

/// Errors raised while turning wire payloads into actions.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Payload is not a known action or does not match its variant's shape.
    #[error("malformed action: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode an action received from outside the process.
pub fn decode_action(raw: &str) -> Result<Action, TransportError> {
    Ok(Action::from_json_str(raw)?)
}

/// Capability handed to a session so it can talk to its peers.
pub trait Transport: Send + Sync {
    /// Identity stamped on everything this transport publishes.
    fn endpoint_id(&self) -> EndpointId;

    /// Fire-and-forget delivery to every other current subscriber.
    fn publish(&self, action: Action);

    /// Start receiving messages published from now on. Dropping the
    /// subscription unsubscribes.
    fn subscribe(&self) -> Subscription;
}

/// Registry of named channels shared by every endpoint in the process.
pub struct ChannelBus {
    channels: DashMap<String, broadcast::Sender<Envelope>>,
    capacity: usize,
}

impl ChannelBus {
    /// Create an empty bus whose channels buffer up to `capacity` undelivered messages per subscriber.
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Open a new endpoint on the channel called `name`, creating the channel on first use.
    pub fn open(&self, name: &str) -> ChannelEndpoint {
        let sender = self
            .channels
            .entry(name.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone();

        ChannelEndpoint {
            id: Uuid::new_v4(),
            channel: name.to_string(),
            sender,
            next_seq: AtomicU64::new(1),
        }
    }

    /// Number of live subscriptions on `name`.
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.channels
            .get(name)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

/// One context's handle on a named channel.
pub struct ChannelEndpoint {
    id: EndpointId,
    channel: String,
    sender: broadcast::Sender<Envelope>,
    next_seq: AtomicU64,
}

impl Transport for ChannelEndpoint {
    fn endpoint_id(&self) -> EndpointId {
        self.id
    }

    fn publish(&self, action: Action) {
        let envelope = Envelope {
            origin: self.id,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            action,
        };
        let kind = envelope.action.kind();

        // No receivers is not an error: nobody is listening yet.
        if self.sender.send(envelope).is_err() {
            debug!(channel = %self.channel, kind, "published with no subscribers");
        }
    }

    fn subscribe(&self) -> Subscription {
        Subscription::new(self.id, self.channel.clone(), self.sender.subscribe())
    }
}

/// Stream of envelopes published by other endpoints.
pub struct Subscription {
    own: EndpointId,
    channel: String,
    receiver: broadcast::Receiver<Envelope>,
}

impl Subscription {
    pub(crate) fn new(
        own: EndpointId,
        channel: String,
        receiver: broadcast::Receiver<Envelope>,
    ) -> Self {
        Self {
            own,
            channel,
            receiver,
        }
    }

    /// Wait for the next envelope from another endpoint.
    ///
    /// Returns `None` once the channel is closed.
    pub async fn recv(&mut self) -> Option<Envelope> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) if envelope.origin == self.own => continue,
                Ok(envelope) => return Some(envelope),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(channel = %self.channel, skipped, "subscriber lagged; waiting for next sync");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
