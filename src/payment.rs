//! Paid-tier checkout redirect.
//!
//! The full report is sold through an external checkout. The redirect URL
//! embeds the identifier of a completed free analysis; without one the
//! request is refused.

use crate::core::id::AnalysisId;
use crate::error::{ForensizerError, Result};
use tracing::info;

/// Reference prefix the checkout preference is registered under.
pub const CHECKOUT_REFERENCE_PREFIX: &str = "FORENSIZER-";

/// Build the checkout URL for `analysis_id`.
pub fn checkout_url(base: &str, analysis_id: Option<&AnalysisId>) -> Result<String> {
    let id = analysis_id.ok_or(ForensizerError::NoCompletedAnalysis)?;
    let url = format!("{}{}{}", base, CHECKOUT_REFERENCE_PREFIX, id);
    info!(analysis_id = %id, "Built checkout redirect");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CHECKOUT_URL_BASE;

    #[test]
    fn refuses_without_analysis() {
        let err = checkout_url(DEFAULT_CHECKOUT_URL_BASE, None).unwrap_err();
        assert!(matches!(err, ForensizerError::NoCompletedAnalysis));
    }

    #[test]
    fn embeds_analysis_id() {
        let id = AnalysisId::parse("FS_1760000000000_abc123xyz").unwrap();
        let url = checkout_url(DEFAULT_CHECKOUT_URL_BASE, Some(&id)).unwrap();
        assert_eq!(
            url,
            "https://www.mercadopago.com.br/checkout/v1/redirect?preference-id=FORENSIZER-FS_1760000000000_abc123xyz"
        );
    }
}
