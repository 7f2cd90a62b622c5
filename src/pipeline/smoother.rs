//! Exponential smoothing for scalar metric streams.
//!
//! One-pole IIR low-pass filter: `state += (latest - state) / alpha`.
//! Raw usage readings jump too much to animate directly; the smoother turns
//! them into a stable curve while staying a pure function of its input
//! sequence, so a run can be replayed bit-for-bit.

/// Default response divisor, tuned for 100 ms poll intervals.
pub const DEFAULT_ALPHA: f64 = 4.0;

/// Exponential moving average state for one metric stream.
///
/// State initializes to the first observed value; there is no artificial
/// ramp-up from zero. Larger `alpha` responds more slowly. Each widget
/// instance owns exactly one smoother.
#[derive(Debug, Clone, Copy)]
pub struct Smoother {
    alpha: f64,
    state: Option<f64>,
}

impl Smoother {
    /// Create a smoother with the given response divisor.
    ///
    /// `alpha` below 1 would overshoot the input, so it is clamped to 1
    /// (which disables smoothing entirely).
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        Self { alpha: alpha.max(1.0), state: None }
    }

    /// Feed the next reading and return the updated smoothed value.
    pub fn update(&mut self, latest: f64) -> f64 {
        let next = match self.state {
            None => latest,
            Some(state) => state + (latest - state) / self.alpha,
        };
        self.state = Some(next);
        next
    }

    /// The current smoothed value, if any reading has been observed.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.state
    }

    /// The response divisor.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Forget all observed state, as if freshly constructed.
    pub fn reset(&mut self) {
        self.state = None;
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}
