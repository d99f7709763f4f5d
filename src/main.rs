use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forensizer::compat::RngSignals;
use forensizer::core::file::FileDescriptor;
use forensizer::io::{read_file_descriptor, IOLimits};
use forensizer::logging::{init_tracing_json, init_tracing_with_level};
use forensizer::payment::checkout_url;
use forensizer::session::{ProgressEvent, SessionProgressFn, Stage};
use forensizer::{
    AnalysisId, AnalysisRequest, AnalysisSession, Analyzer, ForensizerConfig, ForensizerError,
    Hasher, OriginTag,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::error;

const GENERIC_FAILURE: &str = "Error processing analysis. Please try again.";

#[derive(Parser)]
#[command(name = "forensizer")]
#[command(about = "File compatibility analysis against a declared origin", long_about = None)]
#[command(version)]
struct Cli {
    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the free compatibility analysis on a file
    Analyze {
        /// File to analyze
        file: PathBuf,

        /// Client name
        #[arg(long)]
        name: Option<String>,

        /// Client email
        #[arg(long)]
        email: Option<String>,

        /// Declared origin: whatsapp, email, redes_sociais or other
        #[arg(long)]
        origin: Option<String>,

        /// Mime type, instead of guessing from the extension
        #[arg(long)]
        mime: Option<String>,

        /// Print the session as JSON
        #[arg(long)]
        json: bool,

        /// Skip the IP lookup and the record submission
        #[arg(long)]
        offline: bool,

        /// Seed for the simulated signal checks
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the paid-tier checkout URL for a completed analysis
    Checkout {
        /// Identifier printed by `analyze`
        #[arg(long)]
        analysis_id: Option<String>,
    },

    /// Print the content digest of a file
    Digest {
        file: PathBuf,

        /// Use the degraded digest instead of SHA-256
        #[arg(long)]
        degraded: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.log_json {
        init_tracing_json();
    } else {
        init_tracing_with_level(&cli.log_level);
    }

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if !is_user_facing_error(&err) {
                error!(error = %format!("{:#}", err), "Command failed");
            }
            eprintln!("{}", failure_message(&err));
            ExitCode::FAILURE
        }
    }
}

fn is_user_facing(err: &ForensizerError) -> bool {
    err.is_input_error()
        || matches!(
            err,
            ForensizerError::NoCompletedAnalysis | ForensizerError::FileRead(_)
        )
}

fn is_user_facing_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ForensizerError>()
        .is_some_and(is_user_facing)
}

/// What the user sees when a command fails. Anything unexpected collapses
/// to the generic message; details go to the log.
fn failure_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ForensizerError>() {
        Some(e) if is_user_facing(e) => e.to_string(),
        _ => GENERIC_FAILURE.to_string(),
    }
}

/// Build the request from CLI fields, validating them before the file is
/// touched.
async fn load_request(
    file: &Path,
    name: Option<String>,
    email: Option<String>,
    origin: Option<String>,
    mime: Option<&str>,
    limits: &IOLimits,
) -> Result<AnalysisRequest> {
    let origin = match origin.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(OriginTag::from_wire(raw).ok_or_else(|| {
            ForensizerError::InvalidInput(format!("unknown origin '{}'", raw))
        })?),
    };
    let mut request = AnalysisRequest {
        client_name: name.unwrap_or_default(),
        client_email: email.unwrap_or_default(),
        origin,
        file: None,
    };
    request.validate_fields()?;
    request.file = Some(read(file, mime, limits).await?);
    Ok(request)
}

/// Console line for a progress event, if any. Digest progress is reported
/// only when the whole percentage changes.
fn progress_line(event: ProgressEvent, last_percent: &AtomicU8) -> Option<String> {
    match event {
        ProgressEvent::Stage(Stage::Done) => None,
        ProgressEvent::Stage(stage) => Some(stage.to_string()),
        ProgressEvent::Hashing(p) => {
            let percent = p.percent();
            let previous = last_percent.swap(percent, Ordering::Relaxed);
            (previous != percent).then(|| format!("{} {}%", Stage::Hashing, percent))
        }
    }
}

fn console_progress() -> SessionProgressFn {
    // u8::MAX never equals a real percentage, so 0% is printed too.
    let last_percent = AtomicU8::new(u8::MAX);
    Arc::new(move |event: ProgressEvent| {
        if let Some(line) = progress_line(event, &last_percent) {
            eprintln!("{}", line);
        }
    })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = ForensizerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            file,
            name,
            email,
            origin,
            mime,
            json,
            offline,
            seed,
        } => {
            let request =
                load_request(&file, name, email, origin, mime.as_deref(), &config.io).await?;

            let mut analyzer = Analyzer::from_config(&config, offline)?;
            if let Some(seed) = seed {
                analyzer = analyzer.with_signals(Box::new(RngSignals::seeded(seed)));
            }

            let progress = (!json).then(console_progress);

            let session = analyzer.run(request, progress).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&session).context("rendering session")?
                );
            } else {
                print_session(&session);
            }
            Ok(())
        }
        Commands::Checkout { analysis_id } => {
            let id = match analysis_id.as_deref() {
                None => None,
                Some(raw) => Some(AnalysisId::parse(raw).ok_or_else(|| {
                    ForensizerError::InvalidInput(format!("malformed analysis id '{}'", raw))
                })?),
            };
            let url = checkout_url(&config.remote.checkout_url_base, id.as_ref())?;
            println!("{}", url);
            Ok(())
        }
        Commands::Digest { file, degraded } => {
            let descriptor = read(&file, None, &config.io).await?;
            let hasher = if degraded {
                Hasher::degraded_only()
            } else {
                Hasher::new()
            };
            let digest = hasher.digest(descriptor.content(), None).await;
            println!("{}  {}", digest, file.display());
            Ok(())
        }
    }
}

async fn read(path: &Path, mime: Option<&str>, limits: &IOLimits) -> Result<FileDescriptor> {
    read_file_descriptor(path, mime, limits, None)
        .await
        .map_err(|e| ForensizerError::from(e).into())
}

fn print_session(session: &AnalysisSession) {
    let report = session.report();
    let summary = report.file_summary();
    let tier = report.status_tier();

    println!();
    println!("{} {} ({}/100)", tier.glyph(), tier.label(), report.score());
    println!(
        "File: {} ({}, {}, {})",
        summary.name, summary.size_formatted, summary.mime_type, summary.extension
    );
    println!("Declared origin: {}", report.declared_origin().label());
    println!("Analyzed at: {}", summary.analyzed_at);
    println!(
        "Digest ({}): {}",
        report.digest().path,
        report.digest().as_str()
    );

    if !report.incompatibilities().is_empty() {
        println!("Incompatibilities:");
        for item in report.incompatibilities() {
            println!("  - {}", item);
        }
    }
    if !report.observations().is_empty() {
        println!("Observations:");
        for item in report.observations() {
            println!("  - {}", item);
        }
    }
    println!("Recommendation: {}", report.recommendation());
    println!();
    println!("Analysis ID: {}", session.analysis_id());
    if session.submission.success {
        println!("Record saved");
    } else {
        println!(
            "Record not saved: {}",
            session.submission.message.as_deref().unwrap_or("unknown error")
        );
    }
    println!(
        "Full report: forensizer checkout --analysis-id {}",
        session.analysis_id()
    );
}
