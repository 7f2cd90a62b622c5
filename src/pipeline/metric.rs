//! Scalar metric pipeline: poll, smooth, remember.
//!
//! A [`MetricPipeline`] drives one widget's reading end to end. Its poll
//! task fetches a raw value, transforms it to a scalar, resolves fetch
//! failures to the last published scalar, then folds the result through an
//! exponential [`Smoother`](super::Smoother) and a rolling
//! [`HistoryBuffer`](super::HistoryBuffer). Every tick publishes one
//! [`MetricSnapshot`] carrying the scalar, its smoothed counterpart, and
//! the full history window, so renderers never observe a half-applied
//! update.
//!
//! Smoothing and history fold inside the poll task itself. A watch channel
//! only retains the latest value, so folding downstream of the channel
//! could skip readings under load; folding in-task sees every tick exactly
//! once.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut pipeline = MetricPipeline::new(PipelineConfig {
//!     interval: Duration::from_millis(100),
//!     ..PipelineConfig::default()
//! });
//! pipeline.start(
//!     || async { backend.cpu_usage().await },
//!     |raw| async move { raw },
//! );
//! let snapshot = pipeline.snapshot();
//! draw_curve(&snapshot.history);
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::{HistoryBuffer, Smoother, DEFAULT_ALPHA};

/// Tuning for one metric pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Time between poll ticks.
    pub interval: Duration,
    /// Smoothing divisor; larger responds slower. Clamped to `>= 1`.
    pub alpha: f64,
    /// History window length in samples.
    pub capacity: usize,
}

impl Default for PipelineConfig {
    /// 100ms ticks, alpha 4, a 25-sample window.
    fn default() -> Self {
        Self { interval: Duration::from_millis(100), alpha: DEFAULT_ALPHA, capacity: 25 }
    }
}

/// One publication from a metric pipeline, emitted once per tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricSnapshot {
    /// Published scalar for this tick. Retains the previous scalar on a
    /// failed fetch; `None` only before the first successful fetch.
    pub value: Option<f64>,
    /// Exponential moving average of the published scalars.
    pub smoothed: Option<f64>,
    /// Rolling window of published scalars, oldest first.
    pub history: Vec<f64>,
    /// Number of completed poll ticks, including failed ones.
    pub sequence: u64,
}

/// A complete scalar pipeline with an explicit start/stop lifecycle.
///
/// Constructed when its widget is placed, started with the widget's
/// getter/transform pair, and shut down when the widget is removed.
/// Dropping a running pipeline aborts its task; [`MetricPipeline::shutdown`]
/// additionally waits for termination so no late tick can fire.
#[derive(Debug)]
pub struct MetricPipeline {
    config: PipelineConfig,
    tx: Arc<watch::Sender<MetricSnapshot>>,
    rx: watch::Receiver<MetricSnapshot>,
    handle: Option<JoinHandle<()>>,
}

impl MetricPipeline {
    /// Create a pipeline that is not yet running.
    ///
    /// # Panics
    ///
    /// Panics if the interval is zero or the capacity is zero.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        assert!(!config.interval.is_zero(), "poll interval must be non-zero");
        assert!(config.capacity > 0, "history capacity must be greater than 0");
        let (tx, rx) = watch::channel(MetricSnapshot::default());
        Self { config, tx: Arc::new(tx), rx, handle: None }
    }

    /// Spawn the poll task onto the current tokio runtime.
    ///
    /// The getter runs once immediately, then every interval. Each raw
    /// result (`None` on fetch failure) is passed to `transform` to yield a
    /// scalar; a `None` scalar retains the previously published one. If the
    /// pipeline is already running, the old task is stopped and the new one
    /// resumes from the last published snapshot.
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
        XF: Future<Output = Option<f64>> + Send,
    {
        self.stop();

        let tx = Arc::clone(&self.tx);
        let PipelineConfig { interval, alpha, capacity } = self.config;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let seed = tx.borrow().clone();
            let mut smoother = Smoother::new(alpha);
            if let Some(smoothed) = seed.smoothed {
                smoother.update(smoothed);
            }
            let mut history = HistoryBuffer::new(capacity);
            for &value in &seed.history {
                history.push(value);
            }
            let mut last = seed.value;
            let mut sequence = seed.sequence;
            let mut was_fresh = true;

            loop {
                ticker.tick().await;

                let raw = getter().await;
                let scalar = transform(raw).await;
                sequence += 1;

                match scalar {
                    Some(value) => {
                        last = Some(value);
                        was_fresh = true;
                    }
                    None => {
                        if was_fresh {
                            log::warn!("Metric tick {} returned nothing, retaining last value", sequence);
                        } else {
                            log::debug!("Metric tick {} still has no reading", sequence);
                        }
                        was_fresh = false;
                    }
                }

                let snapshot = match last {
                    Some(value) => {
                        let smoothed = smoother.update(value);
                        history.push(value);
                        MetricSnapshot {
                            value: Some(value),
                            smoothed: Some(smoothed),
                            history: history.to_vec(),
                            sequence,
                        }
                    }
                    None => MetricSnapshot {
                        value: None,
                        smoothed: None,
                        history: Vec::new(),
                        sequence,
                    },
                };

                tx.send_replace(snapshot);
            }
        }));
    }

    /// Borrow the latest snapshot (pull-style consumption).
    #[must_use]
    pub fn snapshot(&self) -> MetricSnapshot {
        self.rx.borrow().clone()
    }

    /// Subscribe to publications (await `changed()` on the receiver).
    ///
    /// Subscriptions survive a restart of the poll task.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MetricSnapshot> {
        self.rx.clone()
    }

    /// The tuning this pipeline was built with.
    #[must_use]
    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    /// Whether the poll task is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Abort the poll task without waiting for it to wind down.
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

impl Drop for MetricPipeline {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn config(interval_ms: u64, alpha: f64, capacity: usize) -> PipelineConfig {
        PipelineConfig { interval: Duration::from_millis(interval_ms), alpha, capacity }
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.interval, Duration::from_millis(100));
        assert_relative_eq!(config.alpha, 4.0);
        assert_eq!(config.capacity, 25);
    }

    #[test]
    #[should_panic(expected = "poll interval must be non-zero")]
    fn test_zero_interval_panics() {
        let _pipeline = MetricPipeline::new(config(0, 4.0, 25));
    }

    #[test]
    #[should_panic(expected = "history capacity must be greater than 0")]
    fn test_zero_capacity_panics() {
        let _pipeline = MetricPipeline::new(config(100, 4.0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_before_start_is_empty() {
        let pipeline = MetricPipeline::new(config(100, 4.0, 25));
        assert!(!pipeline.is_running());

        let snapshot = pipeline.snapshot();
        assert_eq!(snapshot.value, None);
        assert_eq!(snapshot.smoothed, None);
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.sequence, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_tick_retains_and_records() {
        // Source alternates 80, miss, 60. The miss must republish 80, keep
        // smoothing toward it, and append it to the history window.
        let calls = Arc::new(AtomicU64::new(0));
        let counted = calls.clone();

        let mut pipeline = MetricPipeline::new(config(100, 3.0, 3));
        pipeline.start(
            move || {
                let n = counted.fetch_add(1, Ordering::SeqCst);
                async move {
                    match n {
                        0 => Some(80.0),
                        1 => None,
                        _ => Some(60.0),
                    }
                }
            },
            |raw| async move { raw },
        );

        let mut rx = pipeline.subscribe();

        rx.changed().await.unwrap();
        let first = rx.borrow().clone();
        assert_eq!(first.value, Some(80.0));
        assert_eq!(first.smoothed, Some(80.0), "smoother initializes to first value");
        assert_eq!(first.history, vec![80.0]);

        rx.changed().await.unwrap();
        let stale = rx.borrow().clone();
        assert_eq!(stale.value, Some(80.0), "miss retains last-known-good");
        assert_eq!(stale.smoothed, Some(80.0));
        assert_eq!(stale.history, vec![80.0, 80.0], "retained value still enters history");
        assert_eq!(stale.sequence, 2);

        rx.changed().await.unwrap();
        let third = rx.borrow().clone();
        assert_eq!(third.value, Some(60.0));
        assert_relative_eq!(third.smoothed.unwrap(), 80.0 - 20.0 / 3.0, max_relative = 1e-12);
        assert_eq!(third.history, vec![80.0, 80.0, 60.0]);
        assert_eq!(third.sequence, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_miss_before_first_reading_publishes_empty() {
        let mut pipeline = MetricPipeline::new(config(100, 4.0, 3));
        pipeline.start(|| async { None::<f64> }, |raw| async move { raw });

        let mut rx = pipeline.subscribe();
        rx.changed().await.unwrap();

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.value, None);
        assert_eq!(snapshot.smoothed, None);
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.sequence, 1, "failed tick still counts");
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_holds_most_recent_window() {
        let calls = Arc::new(AtomicU64::new(0));
        let counted = calls.clone();

        let mut pipeline = MetricPipeline::new(config(100, 1.0, 3));
        pipeline.start(
            move || {
                let n = counted.fetch_add(1, Ordering::SeqCst);
                async move { Some(n as f64) }
            },
            |raw| async move { raw },
        );

        let mut rx = pipeline.subscribe();
        for _ in 0..5 {
            rx.changed().await.unwrap();
        }

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.history, vec![2.0, 3.0, 4.0]);
        assert_eq!(snapshot.value, Some(4.0));
        assert_eq!(snapshot.smoothed, Some(4.0), "alpha 1 tracks the input exactly");
    }

    #[tokio::test(start_paused = true)]
    async fn test_transform_scales_raw_reading() {
        // Raw readings arrive as fractions; the transform rescales to 0-100.
        let mut pipeline = MetricPipeline::new(config(100, 1.0, 4));
        pipeline.start(
            || async { Some(0.37) },
            |raw: Option<f64>| async move { raw.map(|v| v * 100.0) },
        );

        let mut rx = pipeline.subscribe();
        rx.changed().await.unwrap();
        assert_relative_eq!(rx.borrow().value.unwrap(), 37.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let calls = Arc::new(AtomicU64::new(0));
        let counted = calls.clone();

        let mut pipeline = MetricPipeline::new(config(100, 4.0, 25));
        pipeline.start(
            move || {
                let counted = counted.clone();
                async move { Some(counted.fetch_add(1, Ordering::SeqCst) as f64) }
            },
            |raw| async move { raw },
        );

        let mut rx = pipeline.subscribe();
        rx.changed().await.unwrap();

        pipeline.shutdown().await;
        let after_shutdown = calls.load(Ordering::SeqCst);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(
            calls.load(Ordering::SeqCst),
            after_shutdown,
            "no getter may fire after shutdown returns"
        );
        assert!(!pipeline.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resumes_from_last_snapshot() {
        let mut pipeline = MetricPipeline::new(config(100, 2.0, 3));
        pipeline.start(|| async { Some(40.0) }, |raw| async move { raw });

        let mut rx = pipeline.subscribe();
        rx.changed().await.unwrap();
        rx.changed().await.unwrap();
        let before = rx.borrow().clone();
        assert_eq!(before.history, vec![40.0, 40.0]);

        pipeline.shutdown().await;
        pipeline.start(|| async { Some(40.0) }, |raw| async move { raw });

        rx.changed().await.unwrap();
        let after = rx.borrow().clone();
        assert_eq!(after.sequence, before.sequence + 1, "sequence continues across restart");
        assert_eq!(after.history, vec![40.0, 40.0, 40.0], "history carries across restart");
        assert_eq!(after.smoothed, Some(40.0));
    }
}
