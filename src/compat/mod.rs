//! Compatibility analysis runtime.
//!
//! Scores how plausible a file's technical attributes are for the origin the
//! user declared: origin-specific rules, generic integrity heuristics and the
//! randomized simulated-signal checks, combined by the [`score::ScoreEngine`].

pub mod config;
pub mod heuristics;
pub mod rules;
pub mod score;
pub mod signals;

pub use config::ScoringConfig;
pub use rules::Findings;
pub use score::ScoreEngine;
pub use signals::{FixedSignals, RngSignals, SignalSource};
