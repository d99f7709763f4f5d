use crate::common::temp_file;
use bytes::Bytes;
use forensizer::core::digest::{DigestPath, DIGEST_HEX_LEN};
use forensizer::hashing::{rolling_digest, sentinel_digest, ContentDigester, DigestError, HashProgress};
use forensizer::io::{read_file_descriptor, IOLimits};
use forensizer::Hasher;
use std::sync::Arc;

fn is_lower_hex_64(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

struct PanickingDigester;

impl ContentDigester for PanickingDigester {
    fn algorithm(&self) -> &'static str {
        "panicking"
    }

    fn digest(
        &self,
        _content: &[u8],
        _progress: &mut dyn FnMut(HashProgress),
    ) -> Result<String, DigestError> {
        panic!("digest worker crashed");
    }
}

#[tokio::test]
async fn identical_content_gives_identical_digest() {
    let a = temp_file(b"the same bytes", ".jpg");
    let b = temp_file(b"the same bytes", ".pdf");
    let limits = IOLimits::default();
    let da = read_file_descriptor(a.path(), None, &limits, None).await.unwrap();
    let db = read_file_descriptor(b.path(), None, &limits, None).await.unwrap();

    let hasher = Hasher::new();
    let ha = hasher.digest(da.content(), None).await;
    let hb = hasher.digest(db.content(), None).await;
    assert_eq!(ha, hb);
    assert_eq!(ha.path, DigestPath::Primary);
}

#[tokio::test]
async fn one_byte_changes_the_digest() {
    let mut content = vec![0x5au8; 4096];
    let hasher = Hasher::new();
    let before = hasher.digest(Bytes::from(content.clone()), None).await;
    content[2048] ^= 1;
    let after = hasher.digest(Bytes::from(content), None).await;
    assert_ne!(before.value, after.value);
}

#[tokio::test]
async fn every_path_yields_64_lowercase_hex() {
    let content = Bytes::from_static(b"payload for all three paths");

    let primary = Hasher::new().digest(content.clone(), None).await;
    let degraded = Hasher::degraded_only().digest(content.clone(), None).await;
    let sentinel = Hasher::with_primary(Arc::new(PanickingDigester))
        .digest(content, None)
        .await;

    assert_eq!(primary.path, DigestPath::Primary);
    assert_eq!(degraded.path, DigestPath::Degraded);
    assert_eq!(sentinel.path, DigestPath::Sentinel);
    for d in [&primary, &degraded, &sentinel] {
        assert!(is_lower_hex_64(d.as_str()), "malformed digest {}", d);
    }
    assert!(sentinel.as_str().starts_with("badc0de0"));
    assert!(is_lower_hex_64(&sentinel_digest(u64::MAX)));
}

#[tokio::test]
async fn degraded_digest_depends_on_content_only() {
    let a = temp_file(b"identical body", ".png");
    let b = temp_file(b"identical body", ".docx");
    let limits = IOLimits::default();
    let da = read_file_descriptor(a.path(), Some("image/png"), &limits, None)
        .await
        .unwrap();
    let db = read_file_descriptor(b.path(), Some(""), &limits, None)
        .await
        .unwrap();
    assert_ne!(da.name(), db.name());

    let hasher = Hasher::degraded_only();
    let first = hasher.digest(da.content(), None).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = hasher.digest(db.content(), None).await;
    assert_eq!(first, second);
    assert_eq!(first.value, rolling_digest(b"identical body"));
}

#[tokio::test]
async fn empty_file_digests_cleanly() {
    let f = temp_file(b"", ".txt");
    let d = read_file_descriptor(f.path(), None, &IOLimits::default(), None)
        .await
        .unwrap();
    let digest = Hasher::new().digest(d.content(), None).await;
    assert_eq!(
        digest.value,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}
