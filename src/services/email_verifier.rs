//! Email deliverability check against the hunter.io verifier API.
//!
//! Runs at registration time. When no API key is configured the check is
//! skipped, so local development does not depend on the external service.

use serde::Deserialize;

use crate::config::EMAIL_VERIFIER_URL;
use crate::errors::{AppError, AppResult};

/// hunter.io email-verifier client
#[derive(Clone)]
pub struct EmailVerifier {
    client: reqwest::Client,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifierResponse {
    data: VerifierData,
}

#[derive(Debug, Deserialize)]
struct VerifierData {
    #[serde(default)]
    result: String,
    #[serde(default)]
    status: String,
}

impl EmailVerifier {
    /// Create a verifier; passing None for the key disables the check.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Verifier that never calls out (for tests and keyless deployments).
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Check that the address is deliverable.
    ///
    /// An address passes when hunter reports `result == "deliverable"` or
    /// `status == "webmail"`. Verifier failures of any kind reject the
    /// address, matching the strictness of the registration flow.
    pub async fn verify_deliverable(&self, email: &str) -> AppResult<()> {
        let Some(api_key) = &self.api_key else {
            tracing::debug!("Email verifier disabled, skipping deliverability check");
            return Ok(());
        };

        let outcome = self.query(email, api_key).await;

        match outcome {
            Ok(data) if data.result == "deliverable" || data.status == "webmail" => Ok(()),
            Ok(data) => {
                tracing::info!(result = %data.result, status = %data.status, "Email rejected by verifier");
                Err(AppError::validation("Email failed deliverability check"))
            }
            Err(e) => {
                tracing::warn!("Email verifier request failed: {}", e);
                Err(AppError::validation("Email could not be verified"))
            }
        }
    }

    async fn query(&self, email: &str, api_key: &str) -> Result<VerifierData, reqwest::Error> {
        let response: VerifierResponse = self
            .client
            .get(EMAIL_VERIFIER_URL)
            .query(&[("email", email), ("api_key", api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.data)
    }
}
