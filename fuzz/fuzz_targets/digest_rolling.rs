#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let d = forensizer::hashing::rolling_digest(data);
    assert_eq!(d.len(), forensizer::core::digest::DIGEST_HEX_LEN);
});
