//! Push delivery to an attached consumer
//!
//! At most one consumer is attached at a time. Pushes are best-effort: a full
//! channel drops the push, a closed one detaches the consumer, and no missed
//! push is ever queued for later. The payload itself stays fetchable.

use capture_core::SharePayload;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

use crate::channel::PUSH_METHOD;

/// Push message announcing a freshly taken-in share
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedDataEvent {
    pub method: &'static str,
    pub payload: SharePayload,
}

impl SharedDataEvent {
    pub fn new(payload: SharePayload) -> Self {
        Self {
            method: PUSH_METHOD,
            payload,
        }
    }
}

/// Receiving end held by the attached consumer
#[derive(Debug)]
pub struct ShareSubscription {
    rx: mpsc::Receiver<SharedDataEvent>,
}

impl ShareSubscription {
    /// Wait for the next push; `None` once the bridge has detached this consumer
    pub async fn recv(&mut self) -> Option<SharedDataEvent> {
        self.rx.recv().await
    }

    /// Next push if one is already waiting
    pub fn try_recv(&mut self) -> Option<SharedDataEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Sending side kept by the bridge
#[derive(Debug, Default)]
pub(crate) struct Notifier {
    tx: Option<mpsc::Sender<SharedDataEvent>>,
}

impl Notifier {
    /// Attach a new consumer, replacing any previous one
    pub(crate) fn attach(&mut self, capacity: usize) -> ShareSubscription {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        if self.tx.replace(tx).is_some() {
            tracing::debug!("Replacing previously attached share consumer");
        }
        ShareSubscription { rx }
    }

    pub(crate) fn detach(&mut self) {
        self.tx = None;
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Non-blocking push; returns whether the consumer received it
    pub(crate) fn push(&mut self, payload: &SharePayload) -> bool {
        let Some(tx) = self.tx.as_ref() else {
            tracing::debug!("No share consumer attached, skipping push");
            return false;
        };

        match tx.try_send(SharedDataEvent::new(payload.clone())) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Share consumer channel is full, dropping push");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::info!("Share consumer went away, detaching");
                self.tx = None;
                false
            }
        }
    }
}
