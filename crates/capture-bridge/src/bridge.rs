use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use capture_core::{IntakeConfig, SharePayload};
use capture_processing::{IntakeEvent, PayloadBuilder, RawShareIntent};
use capture_storage::{ContentStager, StagingResult};

use crate::notify::{Notifier, ShareSubscription};

/// The single pending payload and the arrival number of the event that produced it
#[derive(Debug, Default)]
struct PendingCell {
    payload: SharePayload,
    applied_seq: u64,
}

struct Inner {
    builder: PayloadBuilder,
    pending: Mutex<PendingCell>,
    notifier: Mutex<Notifier>,
    arrivals: AtomicU64,
    notify_capacity: usize,
}

/// Share intake bridge.
///
/// Cheap to clone; every clone shares the same pending payload, so the host
/// side can feed events while the consumer side fetches or listens from other
/// threads. Building and staging happen outside the pending-state lock; only
/// the final swap (and the non-blocking push that follows it) runs under it.
///
/// Events apply in arrival order. If an earlier event is still staging when a
/// later one has already been applied, the earlier result is discarded on
/// completion (its staged files are left in the staging directory).
#[derive(Clone)]
pub struct IntakeBridge {
    inner: Arc<Inner>,
}

impl IntakeBridge {
    pub fn new(builder: PayloadBuilder, notify_capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                builder,
                pending: Mutex::new(PendingCell::default()),
                notifier: Mutex::new(Notifier::default()),
                arrivals: AtomicU64::new(0),
                notify_capacity: notify_capacity.max(1),
            }),
        }
    }

    /// Create the staging directory and a bridge on top of it
    pub async fn from_config(config: &IntakeConfig) -> StagingResult<Self> {
        let stager = ContentStager::from_config(config).await?;
        Ok(Self::new(PayloadBuilder::new(stager), config.notify_capacity))
    }

    pub fn builder(&self) -> &PayloadBuilder {
        &self.inner.builder
    }

    /// Take in one share event.
    ///
    /// The arrival number is taken when this is called, not when the returned
    /// future is first polled. The future never fails: attachments that cannot
    /// be staged are dropped from the payload.
    pub fn on_share_event(&self, event: IntakeEvent) -> impl Future<Output = ()> + Send + 'static {
        let seq = self.inner.arrivals.fetch_add(1, Ordering::SeqCst) + 1;
        let bridge = self.clone();

        async move {
            let kind = event.kind();
            let attachments = event.attachment_count();
            let payload = bridge.inner.builder.build(event).await;

            tracing::info!(
                seq = seq,
                event_kind = kind,
                attachments = attachments,
                staged_files = payload.file_paths.len(),
                has_text = payload.text.is_some(),
                has_url = payload.url.is_some(),
                "Share event taken in"
            );

            bridge.apply(seq, payload);
        }
    }

    /// Classify a raw host trigger and take it in.
    ///
    /// Resolves to `false`, leaving pending state untouched, when the trigger is
    /// not a share this bridge handles.
    pub fn on_intent(&self, intent: RawShareIntent) -> impl Future<Output = bool> + Send + 'static {
        let intake = intent.classify().map(|event| self.on_share_event(event));

        async move {
            match intake {
                Some(intake) => {
                    intake.await;
                    true
                }
                None => false,
            }
        }
    }

    /// Return the pending payload and reset to the empty payload
    pub fn fetch(&self) -> SharePayload {
        let payload = std::mem::take(&mut self.lock_pending().payload);
        tracing::debug!(empty = payload.is_empty(), "Share payload fetched");
        payload
    }

    pub fn has_pending(&self) -> bool {
        !self.lock_pending().payload.is_empty()
    }

    /// Attach the consumer that receives pushes, replacing any previous one
    pub fn attach(&self) -> ShareSubscription {
        self.lock_notifier().attach(self.inner.notify_capacity)
    }

    pub fn detach(&self) {
        self.lock_notifier().detach();
    }

    pub fn is_attached(&self) -> bool {
        self.lock_notifier().is_attached()
    }

    fn apply(&self, seq: u64, payload: SharePayload) -> bool {
        let mut pending = self.lock_pending();

        if seq < pending.applied_seq {
            tracing::debug!(
                seq = seq,
                applied_seq = pending.applied_seq,
                "Discarding share superseded by a later event"
            );
            return false;
        }

        if !pending.payload.is_empty() {
            tracing::debug!(seq = seq, "Replacing undelivered share payload");
        }

        pending.applied_seq = seq;
        pending.payload = payload;

        // Pushed under the pending lock so consumers see pushes in apply order.
        self.lock_notifier().push(&pending.payload);
        true
    }

    fn lock_pending(&self) -> MutexGuard<'_, PendingCell> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_notifier(&self) -> MutexGuard<'_, Notifier> {
        self.inner
            .notifier
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
