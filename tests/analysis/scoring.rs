use crate::common::{sized, MB};
use forensizer::compat::{FixedSignals, ScoreEngine, ScoringConfig};
use forensizer::core::digest::{DigestPath, DigestResult};
use forensizer::hashing::rolling_digest;
use forensizer::{OriginTag, StatusTier};

fn digest() -> DigestResult {
    DigestResult::new(rolling_digest(b"fixture"), DigestPath::Degraded)
}

#[test]
fn score_is_always_within_bounds() {
    let engine = ScoreEngine::default();
    let origins = [
        OriginTag::WhatsApp,
        OriginTag::Email,
        OriginTag::SocialNetworks,
        OriginTag::Other,
    ];
    let mimes = ["", "image/jpeg", "video/mp4", "application/pdf", "application/x-msdownload"];
    let sizes = [0, 500, 2 * MB, 30 * MB, 200 * MB];

    for origin in origins {
        for mime in mimes {
            for size in sizes {
                let file = sized("f.bin", mime, size);
                let report =
                    engine.score(&file, origin, digest(), &mut FixedSignals::all_firing());
                assert!(report.score() <= 100);
                let report = engine.score(&file, origin, digest(), &mut FixedSignals::quiet());
                assert!(report.score() <= 100);
            }
        }
    }
}

#[test]
fn oversized_whatsapp_image() {
    let engine = ScoreEngine::default();
    let file = sized("IMG-20260101-WA0001.jpg", "image/jpeg", 6 * MB);
    let report = engine.score(&file, OriginTag::WhatsApp, digest(), &mut FixedSignals::quiet());
    assert!(report.score() <= 60);
    assert!(report
        .incompatibilities()
        .iter()
        .any(|i| i.contains("Image too large for WhatsApp")));
}

#[test]
fn email_pdf_has_full_base_score() {
    let engine = ScoreEngine::default();
    let file = sized("contract.pdf", "application/pdf", 10 * MB);
    assert_eq!(engine.base_score(&file, OriginTag::Email), 100);
}

#[test]
fn unidentified_type_is_observed() {
    let engine = ScoreEngine::default();
    let file = sized("blob", "", 2 * MB);
    let report = engine.score(&file, OriginTag::Other, digest(), &mut FixedSignals::quiet());
    assert!(report
        .observations()
        .iter()
        .any(|o| o == "File type not identified"));
    assert!(report.score() <= 85);
}

#[test]
fn tiny_file_flags_possible_corruption() {
    let engine = ScoreEngine::default();
    let file = sized("scan.png", "image/png", 500);
    assert!(engine.base_score(&file, OriginTag::Other) <= 60);
    let report = engine.score(&file, OriginTag::Other, digest(), &mut FixedSignals::quiet());
    assert!(report
        .incompatibilities()
        .iter()
        .any(|i| i.contains("possible corruption")));
}

#[test]
fn tier_boundaries() {
    assert_eq!(StatusTier::from_score(80), StatusTier::Compatible);
    assert_eq!(StatusTier::from_score(79), StatusTier::PartiallyCompatible);
    assert_eq!(StatusTier::from_score(60), StatusTier::PartiallyCompatible);
    assert_eq!(StatusTier::from_score(59), StatusTier::Incompatible);
}

#[test]
fn tier_follows_configured_base_score() {
    let config = ScoringConfig {
        base_score: 79,
        ..ScoringConfig::default()
    };
    let engine = ScoreEngine::new(config);
    let file = sized("contract.pdf", "application/pdf", MB);
    let report = engine.score(&file, OriginTag::Email, digest(), &mut FixedSignals::quiet());
    assert_eq!(report.score(), 79);
    assert_eq!(report.status_tier(), StatusTier::PartiallyCompatible);
}

#[test]
fn report_carries_digest_and_origin() {
    let engine = ScoreEngine::default();
    let file = sized("clip.mp4", "video/mp4", 3 * MB);
    let report = engine.score(&file, OriginTag::WhatsApp, digest(), &mut FixedSignals::quiet());
    assert_eq!(report.digest(), &digest());
    assert_eq!(report.declared_origin(), OriginTag::WhatsApp);
    assert_eq!(report.file_summary().extension, "MP4");
    assert_eq!(report.file_summary().size_formatted, "3.00 MB");
}
