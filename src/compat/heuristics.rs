//! Origin-independent integrity heuristics.

use super::config::IntegrityConfig;
use super::rules::Findings;
use crate::core::file::FileDescriptor;

/// Apply the size and mime-type integrity checks.
///
/// The two mime checks are mutually exclusive: an empty type is "not
/// identified", a non-empty type outside the common set is "less common".
pub fn apply_integrity_rules(file: &FileDescriptor, config: &IntegrityConfig) -> Findings {
    let mut f = Findings::default();
    let mime = file.mime_type();

    if file.size_mb() < config.min_size_mb {
        f.penalize(
            config.tiny_file_penalty,
            "File too small - possible corruption",
        );
        f.observe("File may be corrupted or edited");
    }

    if mime.is_empty() {
        f.penalty = f.penalty.saturating_add(config.missing_mime_penalty);
        f.observe("File type not identified");
    } else if !is_common_mime(mime, config) {
        f.penalty = f.penalty.saturating_add(config.uncommon_mime_penalty);
        f.observe("Less common file type");
    }

    f
}

pub fn is_common_mime(mime: &str, config: &IntegrityConfig) -> bool {
    config.common_mime_types.iter().any(|m| m == mime)
}
