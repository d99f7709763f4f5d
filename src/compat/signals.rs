//! Randomized simulated-signal checks.
//!
//! These checks model "metadata tampering" and "temporal inconsistency"
//! signals by sampling. The random source is injected so runs can be seeded
//! or replayed; production uses OS entropy.

use super::config::SignalConfig;
use super::rules::Findings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// A source of uniform samples in `[0, 1)`.
pub trait SignalSource {
    fn roll(&mut self) -> f64;
}

/// Signal source backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSignals<R> {
    rng: R,
}

impl<R: Rng> RngSignals<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSignals<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SignalSource for RngSignals<R> {
    fn roll(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of samples, cycling when exhausted.
/// An empty sequence always yields `1.0`, so no check ever fires.
#[derive(Debug, Clone, Default)]
pub struct FixedSignals {
    values: Vec<f64>,
    next: usize,
}

impl FixedSignals {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }

    /// No simulated signal ever fires.
    pub fn quiet() -> Self {
        Self::default()
    }

    /// Every simulated signal fires.
    pub fn all_firing() -> Self {
        Self::new(vec![0.0])
    }
}

impl SignalSource for FixedSignals {
    fn roll(&mut self) -> f64 {
        if self.values.is_empty() {
            return 1.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next = self.next.wrapping_add(1);
        v
    }
}

/// Run both checks, each with its own sample, in a fixed order.
pub fn apply_signal_checks(config: &SignalConfig, source: &mut dyn SignalSource) -> Findings {
    let mut f = Findings::default();

    let metadata_roll = source.roll();
    if metadata_roll < config.metadata_probability {
        f.penalize(config.metadata_penalty, "Possible signs of metadata editing");
        f.observe("Inconsistent metadata detected");
    }

    let temporal_roll = source.roll();
    if temporal_roll < config.temporal_probability {
        f.penalize(config.temporal_penalty, "Temporal inconsistency detected");
        f.observe("Conflicting creation/modification dates");
    }

    debug!(metadata_roll, temporal_roll, penalty = f.penalty, "Simulated signal checks");
    f
}
