#![no_main]
use bytes::Bytes;
use forensizer::compat::{FixedSignals, ScoreEngine};
use forensizer::core::digest::{DigestPath, DigestResult};
use forensizer::core::file::FileDescriptor;
use forensizer::OriginTag;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 10 {
        return;
    }
    let mut size = [0u8; 8];
    size.copy_from_slice(&data[..8]);
    let origin = OriginTag::parse_lenient(match data[8] % 4 {
        0 => "whatsapp",
        1 => "email",
        2 => "redes_sociais",
        _ => "other",
    });
    let roll = f64::from(data[9]) / 255.0;
    let mime = String::from_utf8_lossy(&data[10..]);
    let file = FileDescriptor::with_size("fuzz", mime, u64::from_le_bytes(size), Bytes::new());
    let digest = DigestResult::new(forensizer::hashing::rolling_digest(data), DigestPath::Degraded);
    let report = ScoreEngine::default().score(&file, origin, digest, &mut FixedSignals::new(vec![roll]));
    assert!(report.score() <= 100);
});
