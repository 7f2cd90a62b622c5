//! Real-time metric pipeline.
//!
//! Every live widget owns one pipeline: a periodic poller fetching from an
//! async source, an exponential smoother taming jitter, and a bounded
//! history window feeding the graph renderers. The stages are independently
//! usable; [`MetricPipeline`] composes all three for scalar readings, while
//! [`Poller`] alone serves widgets whose samples are not scalars (weather
//! reports, media metadata, per-interface counters).
//!
//! Design constraints:
//!
//! - **Last-known-good**: a failed fetch republishes the previous value;
//!   the stream degrades to staleness, never to "unknown".
//! - **Serialized ticks**: poll *n+1* never starts before poll *n*'s effect
//!   is applied, so readings are folded in issue order.
//! - **Hard cancellation**: after `shutdown()` returns, no getter,
//!   transform, or publication can fire.
//! - **No shared mutable state**: each pipeline's smoother and history are
//!   owned by its own task; consumers see immutable snapshots.

// ============================================================================
// Stages
// ============================================================================

pub mod history;
pub mod smoother;

pub use history::HistoryBuffer;
pub use smoother::{Smoother, DEFAULT_ALPHA};

// ============================================================================
// Poll Tasks
// ============================================================================

pub mod metric;
pub mod poller;

pub use metric::{MetricPipeline, MetricSnapshot, PipelineConfig};
pub use poller::{Poller, Sample};

// ============================================================================
// Tests
// ============================================================================
