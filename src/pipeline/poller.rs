//! Periodic async fetch loop with last-known-good retention.
//!
//! A [`Poller`] is constructed when its widget is placed and started with a
//! caller-supplied getter/transform pair. The spawned task invokes the
//! getter immediately, then once per interval, passes each raw result (or
//! its absence) through the transform, and publishes the outcome on a watch
//! channel. Consumers either await changes or borrow the latest sample;
//! both see the same serialized stream.
//!
//! Scheduling uses a delayed missed-tick policy, so a slow getter pushes
//! later ticks back instead of letting polls pile up. One tick's effect is
//! fully applied before the next poll starts, which makes in-order
//! application a structural property rather than a bookkeeping one.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut poller = Poller::new(Duration::from_millis(200));
//! poller.start(
//!     || async { backend.track_title().await },
//!     |raw| async move { raw },
//! );
//! let mut rx = poller.subscribe();
//! rx.changed().await?;
//! render(rx.borrow().value.as_deref());
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// One publication from a poll task.
///
/// `value` holds the most recent successfully transformed result; on a
/// failed tick the previous value is retained, so the stream degrades to
/// staleness rather than publishing "unknown". `sequence` counts completed
/// ticks, including failed ones, and is monotone across restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample<T> {
    /// Last-known-good transformed value, if any tick has succeeded.
    pub value: Option<T>,
    /// Number of completed poll ticks.
    pub sequence: u64,
}

impl<T> Default for Sample<T> {
    fn default() -> Self {
        Self { value: None, sequence: 0 }
    }
}

/// Periodic poll task with an explicit start/stop lifecycle.
///
/// Dropping a running poller aborts its task. For the strict guarantee
/// that no getter or transform invocation fires after teardown, use
/// [`Poller::shutdown`], which awaits task termination.
#[derive(Debug)]
pub struct Poller<T> {
    interval: Duration,
    tx: Arc<watch::Sender<Sample<T>>>,
    rx: watch::Receiver<Sample<T>>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + Sync + 'static> Poller<T> {
    /// Create a poller that is not yet running.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "poll interval must be non-zero");
        let (tx, rx) = watch::channel(Sample::default());
        Self { interval, tx: Arc::new(tx), rx, handle: None }
    }

    /// Spawn the poll task onto the current tokio runtime.
    ///
    /// The getter runs once immediately, then every interval. Each raw
    /// result (`None` on fetch failure) is passed to `transform`; a `None`
    /// from the transform retains the previously published value. If the
    /// poller is already running, the old task is stopped and the new one
    /// resumes from the last published sample.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn start<R, G, GF, X, XF>(&mut self, mut getter: G, mut transform: X)
    where
        R: Send + 'static,
        G: FnMut() -> GF + Send + 'static,
        GF: Future<Output = Option<R>> + Send,
        X: FnMut(Option<R>) -> XF + Send + 'static,
        XF: Future<Output = Option<T>> + Send,
    {
        self.stop();

        let tx = Arc::clone(&self.tx);
        let interval = self.interval;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let seed = tx.borrow().clone();
            let mut last = seed.value;
            let mut sequence = seed.sequence;
            let mut was_fresh = true;

            loop {
                ticker.tick().await;

                let raw = getter().await;
                let next = transform(raw).await;
                sequence += 1;

                match next {
                    Some(value) => {
                        last = Some(value);
                        was_fresh = true;
                    }
                    None => {
                        if was_fresh {
                            log::warn!("Poll tick {} returned nothing, retaining last value", sequence);
                        } else {
                            log::debug!("Poll tick {} still has no reading", sequence);
                        }
                        was_fresh = false;
                    }
                }

                tx.send_replace(Sample { value: last.clone(), sequence });
            }
        }));
    }

    /// Borrow the latest sample (pull-style consumption).
    #[must_use]
    pub fn sample(&self) -> Sample<T> {
        self.rx.borrow().clone()
    }

    /// Subscribe to publications (await `changed()` on the receiver).
    ///
    /// Subscriptions survive a restart of the poll task.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Sample<T>> {
        self.rx.clone()
    }

    /// Whether the poll task is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Abort the poll task without waiting for it to wind down.
    ///
    /// The task stops at its next suspension point. A getter invocation
    /// already in flight is dropped; its result is never applied.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Abort the poll task and wait for it to terminate.
    ///
    /// After this returns, no further getter or transform invocation can
    /// fire and no publication can occur.
    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
