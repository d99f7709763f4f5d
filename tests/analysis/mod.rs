//! End-to-end behaviour of the analysis pipeline and its parts.

mod digest;
mod pipeline;
mod scoring;
