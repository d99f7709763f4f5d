//! Remote collaborators: the analysis logger and the public IP lookup.
//!
//! Both are capability traits so the pipeline can run against HTTP services
//! in production and in-memory fakes offline or under test. Failures at this
//! boundary never abort an analysis: [`SubmissionClient::deliver`] converts
//! them into an unsuccessful receipt.

pub mod http;
pub mod memory;

use crate::core::record::AnalysisRecord;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub use http::{HttpRemoteLogger, IpEchoProvider};
pub use memory::{MemoryLogger, NullLogger, StaticIpProvider, UnavailableIpProvider};

/// Action name the logging endpoint dispatches on.
pub const SAVE_ANALYSIS_ACTION: &str = "salvar_analise";

/// Request body sent to the logging endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionEnvelope {
    pub action: String,
    pub dados: AnalysisRecord,
}

impl SubmissionEnvelope {
    pub fn save_analysis(record: AnalysisRecord) -> Self {
        Self {
            action: SAVE_ANALYSIS_ACTION.to_string(),
            dados: record,
        }
    }
}

/// Response body of the logging endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmissionReceipt {
    pub fn accepted(id: impl Into<String>) -> Self {
        Self {
            success: true,
            id: Some(id.into()),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            message: Some(message.into()),
        }
    }
}

/// Stores analysis records remotely.
#[async_trait]
pub trait RemoteLogger: Send + Sync {
    async fn submit(&self, envelope: &SubmissionEnvelope) -> Result<SubmissionReceipt>;
}

/// Looks up the client's public IP address.
#[async_trait]
pub trait NetworkInfoProvider: Send + Sync {
    async fn public_ip(&self) -> Result<String>;
}

/// Delivers records through a [`RemoteLogger`], swallowing failures.
#[derive(Clone)]
pub struct SubmissionClient {
    logger: Arc<dyn RemoteLogger>,
}

impl SubmissionClient {
    pub fn new(logger: Arc<dyn RemoteLogger>) -> Self {
        Self { logger }
    }

    /// Submit once. Transport errors and `success: false` responses are
    /// logged and returned as an unsuccessful receipt.
    pub async fn deliver(&self, record: AnalysisRecord) -> SubmissionReceipt {
        let id = record.id.clone();
        let envelope = SubmissionEnvelope::save_analysis(record);
        match self.logger.submit(&envelope).await {
            Ok(receipt) if receipt.success => {
                info!(analysis_id = %id, remote_id = ?receipt.id, "Analysis record saved");
                receipt
            }
            Ok(receipt) => {
                let message = receipt
                    .message
                    .clone()
                    .unwrap_or_else(|| "Error saving data".to_string());
                warn!(analysis_id = %id, message = %message, "Logging endpoint rejected record");
                SubmissionReceipt::failed(message)
            }
            Err(e) => {
                warn!(analysis_id = %id, error = %e, "Failed to submit analysis record");
                SubmissionReceipt::failed(e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for SubmissionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionClient").finish_non_exhaustive()
    }
}
