//! Session bootstrap state machine.
//!
//! ```text
//! Idle -> Checking -> Verified(profile)
//!                  -> Anonymous(reason)
//! ```
//!
//! Runs once per navigation. Only its terminal output survives, as the value
//! of the `SessionStore`.
//!
//! CREDENTIAL POLICY
//! =================
//! - any verify failure (non-2xx, undecodable, unreachable): credential cleared
//! - hydration failed after a successful verify: credential kept
//!
//! In every anonymous outcome the store is emptied, so it is non-empty only
//! after a verify and a hydrate that both succeeded.
//!
//! Clearing is compare-and-clear: a rejection only removes the token that was
//! actually verified, never one stored since by a later login.

use std::sync::Arc;

use crate::credentials::{Credential, CredentialStore};
use crate::error::{Invalid, StorageError};
use crate::net::transport::HttpTransport;
use crate::net::types::{IdentityClaims, Profile};

use super::hydrator::ProfileHydrator;
use super::store::{NavigationId, SessionStore};
use super::verifier::SessionVerifier;

/// Why a bootstrap ended anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymousReason {
    /// No credential was stored; no request was made.
    NoCredential,
    /// The verifier rejected the credential; it has been cleared.
    Rejected,
    /// The verifier could not be reached. The credential is cleared all the
    /// same; the distinction is kept for logs and callers.
    Unreachable,
    /// Verification passed but the profile could not be fetched.
    HydrationFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapState {
    Idle,
    Checking,
    Verified(Profile),
    Anonymous(AnonymousReason),
}

impl BootstrapState {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Checking => "checking",
            Self::Verified(_) => "verified",
            Self::Anonymous(_) => "anonymous",
        }
    }

    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Verified(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Terminal result of one bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub navigation: NavigationId,
    pub state: BootstrapState,
    /// `false` when a newer navigation superseded this one before it could
    /// write the store.
    pub applied: bool,
}

/// Verifier, hydrator, credential store and session store composed into the
/// per-navigation flow.
pub struct SessionBootstrap {
    credentials: Arc<dyn CredentialStore>,
    verifier: SessionVerifier,
    hydrator: ProfileHydrator,
    store: SessionStore,
}

impl SessionBootstrap {
    pub fn new(transport: Arc<dyn HttpTransport>, credentials: Arc<dyn CredentialStore>, store: SessionStore) -> Self {
        Self {
            credentials,
            verifier: SessionVerifier::new(transport.clone()),
            hydrator: ProfileHydrator::new(transport),
            store,
        }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    #[must_use]
    pub fn hydrator(&self) -> &ProfileHydrator {
        &self.hydrator
    }

    /// Read and verify the stored credential, clearing it on any
    /// verification failure if it is still the stored one.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` when no credential is stored or verification fails.
    pub async fn authenticate(&self) -> Result<(Credential, IdentityClaims), Invalid> {
        let credential = self.credentials.get().ok_or(Invalid::MissingCredential)?;
        match self.verifier.verify(Some(&credential)).await {
            Ok(claims) => Ok((credential, claims)),
            Err(invalid) => {
                tracing::info!(error = %invalid, "credential failed verification; clearing");
                self.clear_credential(&credential);
                Err(invalid)
            }
        }
    }

    /// Run the state machine for a new navigation.
    pub async fn run(&self) -> BootstrapOutcome {
        let navigation = self.store.begin_navigation();
        let mut state = BootstrapState::Idle;
        transition(navigation, &mut state, BootstrapState::Checking);

        let terminal = match self.authenticate().await {
            Err(invalid) => BootstrapState::Anonymous(anonymous_reason(&invalid)),
            Ok((_, claims)) => match self.hydrator.hydrate(&claims).await {
                Ok(profile) => BootstrapState::Verified(profile),
                Err(e) => {
                    tracing::warn!(uid = claims.uid, error = %e, "profile hydration failed; keeping credential");
                    BootstrapState::Anonymous(AnonymousReason::HydrationFailed)
                }
            },
        };
        transition(navigation, &mut state, terminal);

        let applied = match &state {
            BootstrapState::Verified(profile) => self.store.publish(navigation, profile.clone()),
            _ => self.store.reset(navigation),
        };
        if applied {
            tracing::info!(navigation = navigation.get(), state = state.name(), "session bootstrapped");
        }

        BootstrapOutcome { navigation, state, applied }
    }

    /// Forget the credential and empty the store. Navigations still in
    /// flight are superseded and cannot repopulate the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential could not be removed; the store is
    /// emptied regardless.
    pub fn logout(&self) -> Result<(), StorageError> {
        let cleared = self.credentials.clear();
        self.store.clear();
        cleared
    }

    fn clear_credential(&self, rejected: &Credential) {
        match self.credentials.clear_if(rejected) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("credential replaced since verification; keeping it"),
            Err(e) => tracing::warn!(error = %e, "failed to clear credential"),
        }
    }
}

fn anonymous_reason(invalid: &Invalid) -> AnonymousReason {
    match invalid {
        Invalid::MissingCredential => AnonymousReason::NoCredential,
        Invalid::Network(_) => AnonymousReason::Unreachable,
        Invalid::Rejected { .. } | Invalid::Decode(_) => AnonymousReason::Rejected,
    }
}

fn transition(navigation: NavigationId, state: &mut BootstrapState, next: BootstrapState) {
    tracing::debug!(navigation = navigation.get(), from = state.name(), to = next.name(), "bootstrap transition");
    *state = next;
}

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod tests;
