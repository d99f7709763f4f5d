use crate::common::{quiet_analyzer, temp_file, MB};
use forensizer::compat::FixedSignals;
use forensizer::core::environment::{DeviceClass, NOT_DETECTED};
use forensizer::core::record::{AnalysisRecord, RecordStatus};
use forensizer::io::{read_file_descriptor, IOLimits};
use forensizer::payment::checkout_url;
use forensizer::remote::{MemoryLogger, SAVE_ANALYSIS_ACTION};
use forensizer::{
    AnalysisRequest, Analyzer, ForensizerConfig, ForensizerError, OriginTag, StatusTier,
};
use std::sync::Arc;

async fn request_for(content: &[u8], suffix: &str, origin: OriginTag) -> AnalysisRequest {
    let file = temp_file(content, suffix);
    let descriptor = read_file_descriptor(file.path(), None, &IOLimits::default(), None)
        .await
        .expect("read fixture");
    AnalysisRequest::new("Maria Silva", "maria@example.com", origin, descriptor)
}

#[tokio::test]
async fn analyzes_file_from_disk_and_submits_record() {
    let logger = Arc::new(MemoryLogger::default());
    let mut analyzer = quiet_analyzer(logger.clone());
    let content = vec![0xffu8; (2 * MB) as usize];
    let request = request_for(&content, ".jpg", OriginTag::WhatsApp).await;

    let session = analyzer.run(request, None).await.expect("analysis");
    let report = session.report();
    assert_eq!(report.score(), 100);
    assert_eq!(report.status_tier(), StatusTier::Compatible);
    assert!(report
        .observations()
        .iter()
        .any(|o| o == "Image size compatible with WhatsApp"));
    assert_eq!(session.record.status, RecordStatus::FreeAnalysisCompleted);
    assert_eq!(session.record.file.mime_type, "image/jpeg");
    assert_eq!(session.record.file.size_bytes, 2 * MB);
    assert_eq!(session.record.environment.device, DeviceClass::Mobile);
    assert_eq!(session.record.environment.browser, "Safari");

    let received = logger.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].action, SAVE_ANALYSIS_ACTION);

    // The stored record survives a JSON round trip unchanged.
    let json = received[0].dados.to_json_string().unwrap();
    let back = AnalysisRecord::from_json_str(&json).unwrap();
    assert_eq!(back, session.record);
}

#[tokio::test]
async fn rejected_submission_still_returns_report() {
    let logger = Arc::new(MemoryLogger::rejecting("sheet is full"));
    let mut analyzer = quiet_analyzer(logger.clone());
    let request = request_for(b"%PDF-1.7 minimal body padding", ".pdf", OriginTag::Email).await;

    let session = analyzer.run(request, None).await.expect("analysis");
    assert!(!session.submission.success);
    assert_eq!(session.submission.message.as_deref(), Some("sheet is full"));
    assert_eq!(logger.received().len(), 1);
    // Tiny file: corruption flag applies even though submission failed.
    assert!(session.report().score() <= 60);
}

#[tokio::test]
async fn unreachable_logger_still_returns_report() {
    let logger = Arc::new(MemoryLogger::unreachable("dns failure"));
    let mut analyzer = quiet_analyzer(logger);
    let request = request_for(&[1u8; 4096], ".mp4", OriginTag::SocialNetworks).await;

    let session = analyzer.run(request, None).await.expect("analysis");
    assert!(!session.submission.success);
    assert_eq!(session.report().declared_origin(), OriginTag::SocialNetworks);
}

#[tokio::test]
async fn missing_fields_fail_before_processing() {
    let logger = Arc::new(MemoryLogger::default());
    let mut analyzer = quiet_analyzer(logger.clone());
    let mut request = request_for(b"content", ".png", OriginTag::Other).await;
    request.client_email = "   ".into();

    let err = analyzer.run(request, None).await.unwrap_err();
    assert!(matches!(err, ForensizerError::MissingField("email")));
    assert!(logger.received().is_empty());
}

#[tokio::test]
async fn offline_analyzer_records_nothing_remote() {
    let mut analyzer = Analyzer::from_config(&ForensizerConfig::default(), true)
        .unwrap()
        .with_signals(Box::new(FixedSignals::quiet()));
    let request = request_for(&[9u8; 2048], ".gif", OriginTag::Other).await;

    let session = analyzer.run(request, None).await.expect("analysis");
    assert!(!session.submission.success);
    assert_eq!(session.record.environment.ip, NOT_DETECTED);
    assert!(!session.record.environment.online);
}

#[tokio::test]
async fn checkout_requires_completed_analysis() {
    let config = ForensizerConfig::default();
    let base = &config.remote.checkout_url_base;
    assert!(matches!(
        checkout_url(base, None),
        Err(ForensizerError::NoCompletedAnalysis)
    ));

    let logger = Arc::new(MemoryLogger::default());
    let mut analyzer = quiet_analyzer(logger);
    let request = request_for(&[3u8; 2048], ".png", OriginTag::Email).await;
    let session = analyzer.run(request, None).await.expect("analysis");

    let url = session.checkout_url(base).unwrap();
    assert!(url.ends_with(&format!("FORENSIZER-{}", session.analysis_id())));
    assert!(url.starts_with("https://www.mercadopago.com.br/"));
}

#[tokio::test]
async fn identifiers_are_unique_per_run() {
    let logger = Arc::new(MemoryLogger::default());
    let mut analyzer = quiet_analyzer(logger.clone());
    let first = analyzer
        .run(request_for(&[5u8; 2048], ".png", OriginTag::Email).await, None)
        .await
        .unwrap();
    let second = analyzer
        .run(request_for(&[5u8; 2048], ".png", OriginTag::Email).await, None)
        .await
        .unwrap();
    assert_ne!(first.analysis_id(), second.analysis_id());
    assert_eq!(first.record.file.digest, second.record.file.digest);
    assert_eq!(logger.received().len(), 2);
}
