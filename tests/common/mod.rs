//! Common test utilities and helpers.

use bytes::Bytes;
use forensizer::compat::{FixedSignals, ScoreEngine};
use forensizer::core::file::FileDescriptor;
use forensizer::environment::EnvironmentCollector;
use forensizer::remote::{MemoryLogger, StaticIpProvider, SubmissionClient};
use forensizer::{Analyzer, Hasher};
use std::io::Write;
use std::sync::Arc;
use tempfile::{Builder, NamedTempFile};

pub const MB: u64 = 1024 * 1024;

/// Write `content` to a temporary file with the given suffix.
pub fn temp_file(content: &[u8], suffix: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .prefix("forensizer-")
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content).expect("write temp file");
    file
}

/// A descriptor of the given size without allocating its content.
pub fn sized(name: &str, mime: &str, size_bytes: u64) -> FileDescriptor {
    FileDescriptor::with_size(name, mime, size_bytes, Bytes::new())
}

/// Analyzer with quiet signals, a fixed IP and the given logger.
pub fn quiet_analyzer(logger: Arc<MemoryLogger>) -> Analyzer {
    let collector = EnvironmentCollector::new(Arc::new(StaticIpProvider::new("198.51.100.23")))
        .with_user_agent(Some(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Safari/604.1".into(),
        ));
    Analyzer::new(
        Hasher::new(),
        ScoreEngine::default(),
        collector,
        SubmissionClient::new(logger),
    )
    .with_signals(Box::new(FixedSignals::quiet()))
}
