//! Profile hydration after a successful verify.
//!
//! Pure with respect to the credential store: it reads nothing from storage
//! and writes nothing back.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::credentials::Credential;
use crate::error::Invalid;
use crate::net::endpoints;
use crate::net::transport::HttpTransport;
use crate::net::types::{AccountDetails, IdentityClaims, Profile};

pub struct ProfileHydrator {
    transport: Arc<dyn HttpTransport>,
}

impl ProfileHydrator {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Fetch the public profile for `claims.uid`.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` on a non-success status, transport failure, or a body
    /// that does not decode as a profile.
    pub async fn hydrate(&self, claims: &IdentityClaims) -> Result<Profile, Invalid> {
        let profile: Profile = self.fetch(&endpoints::user(claims.uid), None).await?;
        tracing::debug!(uid = profile.uid, "profile hydrated");
        Ok(profile)
    }

    /// Fetch the bearer's private account details from `/account/`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ProfileHydrator::hydrate`].
    pub async fn fetch_account(&self, credential: &Credential) -> Result<AccountDetails, Invalid> {
        self.fetch(endpoints::ACCOUNT, Some(credential)).await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, credential: Option<&Credential>) -> Result<T, Invalid> {
        let reply = self
            .transport
            .get(path, credential)
            .await
            .inspect_err(|e| tracing::warn!(%path, error = %e, "hydration request failed"))?;
        if !reply.is_success() {
            tracing::info!(%path, status = reply.status, "hydration rejected");
            return Err(Invalid::Rejected { status: reply.status });
        }
        reply.json().map_err(|e| {
            tracing::warn!(%path, error = %e, "hydration body did not decode");
            Invalid::Decode(e.to_string())
        })
    }
}

#[cfg(test)]
#[path = "hydrator_test.rs"]
mod tests;
