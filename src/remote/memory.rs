//! In-memory implementations of the remote collaborators.
//!
//! Used for offline runs (`--offline`) and as substitutes under test.

use super::{NetworkInfoProvider, RemoteLogger, SubmissionEnvelope, SubmissionReceipt};
use crate::error::{ForensizerError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// Accepts nothing and stores nothing; every submission reports offline mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

#[async_trait]
impl RemoteLogger for NullLogger {
    async fn submit(&self, _envelope: &SubmissionEnvelope) -> Result<SubmissionReceipt> {
        Ok(SubmissionReceipt::failed("offline mode: record not submitted"))
    }
}

/// How a [`MemoryLogger`] answers submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryLoggerMode {
    /// Store the envelope and answer `success: true`.
    Accept,
    /// Store the envelope and answer `success: false` with this message.
    Reject(String),
    /// Store nothing and fail as a transport error would.
    TransportError(String),
}

/// Records every envelope it receives.
#[derive(Debug)]
pub struct MemoryLogger {
    mode: MemoryLoggerMode,
    received: Mutex<Vec<SubmissionEnvelope>>,
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::with_mode(MemoryLoggerMode::Accept)
    }
}

impl MemoryLogger {
    pub fn with_mode(mode: MemoryLoggerMode) -> Self {
        Self {
            mode,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(message: impl Into<String>) -> Self {
        Self::with_mode(MemoryLoggerMode::Reject(message.into()))
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::with_mode(MemoryLoggerMode::TransportError(message.into()))
    }

    /// Envelopes stored so far.
    pub fn received(&self) -> Vec<SubmissionEnvelope> {
        self.received
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn store(&self, envelope: &SubmissionEnvelope) -> Result<usize> {
        let mut guard = self
            .received
            .lock()
            .map_err(|_| ForensizerError::Internal("memory logger poisoned".into()))?;
        guard.push(envelope.clone());
        Ok(guard.len())
    }
}

#[async_trait]
impl RemoteLogger for MemoryLogger {
    async fn submit(&self, envelope: &SubmissionEnvelope) -> Result<SubmissionReceipt> {
        match &self.mode {
            MemoryLoggerMode::Accept => {
                let row = self.store(envelope)?;
                Ok(SubmissionReceipt::accepted(format!("row-{}", row)))
            }
            MemoryLoggerMode::Reject(message) => {
                self.store(envelope)?;
                Ok(SubmissionReceipt::failed(message.clone()))
            }
            MemoryLoggerMode::TransportError(message) => {
                Err(ForensizerError::Remote(message.clone()))
            }
        }
    }
}

/// Always answers with a fixed address.
#[derive(Debug, Clone)]
pub struct StaticIpProvider {
    ip: String,
}

impl StaticIpProvider {
    pub fn new(ip: impl Into<String>) -> Self {
        Self { ip: ip.into() }
    }
}

#[async_trait]
impl NetworkInfoProvider for StaticIpProvider {
    async fn public_ip(&self) -> Result<String> {
        Ok(self.ip.clone())
    }
}

/// Always fails, as an offline lookup would.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableIpProvider;

#[async_trait]
impl NetworkInfoProvider for UnavailableIpProvider {
    async fn public_ip(&self) -> Result<String> {
        Err(ForensizerError::Remote("network lookup disabled".into()))
    }
}
