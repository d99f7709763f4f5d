//! HTTP implementations of the remote collaborators.

use super::{NetworkInfoProvider, RemoteLogger, SubmissionEnvelope, SubmissionReceipt};
use crate::error::{ForensizerError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

fn client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .user_agent(concat!("forensizer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ForensizerError::from)
}

/// Posts envelopes as JSON to the logging endpoint.
#[derive(Debug, Clone)]
pub struct HttpRemoteLogger {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRemoteLogger {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: client()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteLogger for HttpRemoteLogger {
    async fn submit(&self, envelope: &SubmissionEnvelope) -> Result<SubmissionReceipt> {
        debug!(endpoint = %self.endpoint, analysis_id = %envelope.dados.id, "Posting analysis record");
        let resp = self
            .client
            .post(&self.endpoint)
            .json(envelope)
            .send()
            .await?;
        let status = resp.status();
        // The endpoint answers with a JSON receipt even on application errors;
        // anything unparseable is a transport-level failure.
        resp.json::<SubmissionReceipt>().await.map_err(|e| {
            ForensizerError::Remote(format!("unreadable response ({}): {}", status, e))
        })
    }
}

#[derive(Debug, Deserialize)]
struct IpEcho {
    ip: String,
}

/// Queries an IP-echo service returning `{"ip": "..."}`.
#[derive(Debug, Clone)]
pub struct IpEchoProvider {
    url: String,
    client: reqwest::Client,
}

impl IpEchoProvider {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: client()?,
        })
    }
}

#[async_trait]
impl NetworkInfoProvider for IpEchoProvider {
    async fn public_ip(&self) -> Result<String> {
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(ForensizerError::Remote(format!(
                "IP lookup failed ({})",
                resp.status()
            )));
        }
        let echo: IpEcho = resp.json().await?;
        Ok(echo.ip)
    }
}
