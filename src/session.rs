//! The free-analysis pipeline.
//!
//! An [`Analyzer`] runs one request through the stages in order:
//! validate, digest, score, collect environment, build record, submit.
//! Validation failures are returned before any asynchronous work starts.
//! A failed submission is reported in the returned [`AnalysisSession`] and
//! never prevents the report from being returned.

use crate::compat::{RngSignals, ScoreEngine, SignalSource};
use crate::config::ForensizerConfig;
use crate::core::file::{FileDescriptor, LOCAL_TIMESTAMP_FORMAT};
use crate::core::id::AnalysisId;
use crate::core::origin::OriginTag;
use crate::core::record::{AnalysisRecord, ClientIdentity, FileRecord, RecordStatus};
use crate::core::report::CompatibilityReport;
use crate::environment::EnvironmentCollector;
use crate::error::{ForensizerError, Result};
use crate::hashing::{HashProgress, Hasher, ProgressFn};
use crate::remote::{
    HttpRemoteLogger, IpEchoProvider, NetworkInfoProvider, NullLogger, RemoteLogger,
    SubmissionClient, SubmissionReceipt, UnavailableIpProvider,
};
use chrono::{Local, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, Instrument};

/// One analysis request as entered by the client.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub client_name: String,
    pub client_email: String,
    pub origin: Option<OriginTag>,
    pub file: Option<FileDescriptor>,
}

impl AnalysisRequest {
    pub fn new(
        client_name: impl Into<String>,
        client_email: impl Into<String>,
        origin: OriginTag,
        file: FileDescriptor,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            client_email: client_email.into(),
            origin: Some(origin),
            file: Some(file),
        }
    }

    /// Check required fields. Whitespace-only values count as missing.
    pub fn validate(&self) -> Result<()> {
        if self.file.is_none() {
            return Err(ForensizerError::MissingFile);
        }
        self.validate_fields()
    }

    /// Check the client fields only, for callers that load the file after
    /// validating.
    pub fn validate_fields(&self) -> Result<()> {
        if self.client_name.trim().is_empty() {
            return Err(ForensizerError::MissingField("name"));
        }
        if self.client_email.trim().is_empty() {
            return Err(ForensizerError::MissingField("email"));
        }
        if self.origin.is_none() {
            return Err(ForensizerError::MissingField("origin"));
        }
        Ok(())
    }
}

/// Pipeline stages, announced in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    Hashing,
    Scoring,
    CollectingEnvironment,
    BuildingRecord,
    Submitting,
    Done,
}

impl Stage {
    pub fn message(&self) -> &'static str {
        match self {
            Stage::Validating => "Validating data...",
            Stage::Hashing => "Computing file digest...",
            Stage::Scoring => "Analyzing compatibility...",
            Stage::CollectingEnvironment => "Collecting environment data...",
            Stage::BuildingRecord => "Preparing analysis record...",
            Stage::Submitting => "Saving analysis...",
            Stage::Done => "Analysis complete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Progress reported while a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Stage(Stage),
    Hashing(HashProgress),
}

pub type SessionProgressFn = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Result of one completed free analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSession {
    pub record: AnalysisRecord,
    pub submission: SubmissionReceipt,
}

impl AnalysisSession {
    pub fn analysis_id(&self) -> &AnalysisId {
        &self.record.id
    }

    pub fn report(&self) -> &CompatibilityReport {
        &self.record.report
    }

    /// Paid-tier checkout URL for this analysis.
    pub fn checkout_url(&self, base: &str) -> Result<String> {
        crate::payment::checkout_url(base, Some(self.analysis_id()))
    }
}

/// Runs analysis requests.
pub struct Analyzer {
    hasher: Hasher,
    engine: ScoreEngine,
    collector: EnvironmentCollector,
    submission: SubmissionClient,
    signals: Box<dyn SignalSource + Send>,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("hasher", &self.hasher)
            .field("engine", &self.engine)
            .field("collector", &self.collector)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    pub fn new(
        hasher: Hasher,
        engine: ScoreEngine,
        collector: EnvironmentCollector,
        submission: SubmissionClient,
    ) -> Self {
        Self {
            hasher,
            engine,
            collector,
            submission,
            signals: Box::new(RngSignals::from_entropy()),
        }
    }

    /// Replace the simulated-signal source.
    pub fn with_signals(mut self, signals: Box<dyn SignalSource + Send>) -> Self {
        self.signals = signals;
        self
    }

    /// Wire an analyzer from configuration. `offline` disables both the
    /// submission and the IP lookup.
    pub fn from_config(config: &ForensizerConfig, offline: bool) -> Result<Self> {
        let logger: Arc<dyn RemoteLogger> = match (&config.remote.submit_url, offline) {
            (Some(url), false) => Arc::new(HttpRemoteLogger::new(url.clone())?),
            _ => Arc::new(NullLogger),
        };
        let network: Arc<dyn NetworkInfoProvider> = if offline {
            Arc::new(UnavailableIpProvider)
        } else {
            Arc::new(IpEchoProvider::new(config.remote.ip_lookup_url.clone())?)
        };
        debug!(
            offline,
            submit = config.remote.submit_url.is_some(),
            "Building analyzer from configuration"
        );

        let collector = EnvironmentCollector::new(network)
            .with_user_agent(config.remote.user_agent.clone())
            .with_lookup_timeout_ms(config.remote.lookup_timeout_ms);

        Ok(Self::new(
            Hasher::new(),
            ScoreEngine::new(config.scoring.clone()),
            collector,
            SubmissionClient::new(logger),
        ))
    }

    /// Run one request to completion.
    pub async fn run(
        &mut self,
        request: AnalysisRequest,
        progress: Option<SessionProgressFn>,
    ) -> Result<AnalysisSession> {
        let stage_cb = progress.clone();
        let notify = move |stage: Stage| {
            debug!(stage = ?stage, "{}", stage.message());
            if let Some(cb) = &stage_cb {
                cb(ProgressEvent::Stage(stage));
            }
        };

        notify(Stage::Validating);
        request
            .validate()
            .map_err(|e| crate::log_error!(e, "request validation"))?;

        let AnalysisRequest {
            client_name,
            client_email,
            origin,
            file,
        } = request;
        let (Some(origin), Some(file)) = (origin, file) else {
            return Err(ForensizerError::Internal(
                "request fields vanished after validation".into(),
            ));
        };

        let span = crate::span_trace!("analysis", file = %file.name(), origin = %origin);
        async move {
            notify(Stage::Hashing);
            let hash_progress: Option<ProgressFn> = progress.clone().map(|cb| {
                Arc::new(move |p: HashProgress| cb(ProgressEvent::Hashing(p))) as ProgressFn
            });
            let digest = self.hasher.digest(file.content(), hash_progress).await;

            notify(Stage::Scoring);
            let report = self.engine.score_at(
                &file,
                origin,
                digest.clone(),
                self.signals.as_mut(),
                Local::now(),
            );

            notify(Stage::CollectingEnvironment);
            let environment = self.collector.collect().await;

            notify(Stage::BuildingRecord);
            let now = Utc::now();
            let record = AnalysisRecord {
                id: AnalysisId::generate(now),
                client: ClientIdentity {
                    name: client_name.trim().to_string(),
                    email: client_email.trim().to_string(),
                },
                file: FileRecord::from_descriptor(&file, digest),
                report,
                environment,
                declared_origin: origin,
                timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
                timestamp_local: now
                    .with_timezone(&Local)
                    .format(LOCAL_TIMESTAMP_FORMAT)
                    .to_string(),
                status: RecordStatus::FreeAnalysisCompleted,
            };

            notify(Stage::Submitting);
            let submission = self.submission.deliver(record.clone()).await;

            info!(
                analysis_id = %record.id,
                score = record.report.score(),
                tier = %record.report.status_tier(),
                submitted = submission.success,
                "Free analysis completed"
            );
            notify(Stage::Done);

            Ok(AnalysisSession { record, submission })
        }
        .instrument(span)
        .await
    }
}
