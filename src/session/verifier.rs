//! Remote token verification.
//!
//! One authenticated `GET /account/verify`, no retries. Every failure mode
//! collapses to `Invalid`; the variant only feeds logs. This component never
//! touches the credential store; the bootstrap clears it on rejection.

use std::sync::Arc;

use crate::credentials::Credential;
use crate::error::Invalid;
use crate::net::endpoints;
use crate::net::transport::HttpTransport;
use crate::net::types::IdentityClaims;

pub struct SessionVerifier {
    transport: Arc<dyn HttpTransport>,
}

impl SessionVerifier {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Resolve `credential` to identity claims.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` when the credential is absent (no request is made),
    /// rejected, unreachable, or answered with an undecodable body.
    pub async fn verify(&self, credential: Option<&Credential>) -> Result<IdentityClaims, Invalid> {
        let credential = credential.ok_or(Invalid::MissingCredential)?;

        let reply = self
            .transport
            .get(endpoints::VERIFY, Some(credential))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "verify request failed"))?;

        if !reply.is_success() {
            tracing::info!(status = reply.status, "credential rejected");
            return Err(Invalid::Rejected { status: reply.status });
        }

        let claims: IdentityClaims = reply.json().map_err(|e| {
            tracing::warn!(error = %e, "verify body did not decode");
            Invalid::Decode(e.to_string())
        })?;
        tracing::debug!(uid = claims.uid, username = %claims.username, "credential verified");
        Ok(claims)
    }
}

#[cfg(test)]
#[path = "verifier_test.rs"]
mod tests;
