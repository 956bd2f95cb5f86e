//! Persisted bearer credential.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the only module that touches persistent client storage. The
//! session flow reads, and on rejection clears, the credential through
//! `CredentialStore`; nothing else writes it.
//!
//! TRADE-OFFS
//! ==========
//! Concurrent writers from separate processes are not ordered: the last
//! write wins. No token-shape validation happens here; the backend verifier
//! is the only judge of a token.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;

/// Well-known key the token is persisted under.
pub const JWT_TOKEN_KEY: &str = "jwt_authorization_token";

/// An opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Format a credential as an `Authorization` header value.
#[must_use]
pub fn bearer_header(credential: &Credential) -> String {
    format!("Bearer {}", credential.as_str())
}

/// Storage for zero or one credential.
pub trait CredentialStore: Send + Sync {
    /// The stored credential, or `None` if never set or cleared.
    fn get(&self) -> Option<Credential>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, token: &str) -> Result<(), StorageError>;

    /// Remove the stored credential. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn clear(&self) -> Result<(), StorageError>;

    /// Remove the stored credential only if it is still `expected`.
    /// Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn clear_if(&self, expected: &Credential) -> Result<bool, StorageError> {
        if self.get().as_ref() != Some(expected) {
            return Ok(false);
        }
        self.clear()?;
        Ok(true)
    }
}

fn non_blank(raw: &str) -> Option<Credential> {
    let token = raw.trim();
    (!token.is_empty()).then(|| Credential::new(token))
}

/// Credential kept as a single file named `JWT_TOKEN_KEY` inside a directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join(JWT_TOKEN_KEY) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<Credential> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => non_blank(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "credential read failed");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_private(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write `token` readable by the owner only.
fn write_private(path: &Path, token: &str) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        // `mode` only applies on creation.
        if path.exists() {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }
    }
    let mut file = options.open(path)?;
    file.write_all(token.as_bytes())
}

/// Process-local credential, used when nothing should hit disk.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        match self.token.lock() {
            Ok(guard) => guard.as_deref().and_then(non_blank),
            Err(_) => {
                tracing::warn!("credential lock poisoned; treating as absent");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().map_err(|_| StorageError::Poisoned)? = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.token.lock().map_err(|_| StorageError::Poisoned)? = None;
        Ok(())
    }

    fn clear_if(&self, expected: &Credential) -> Result<bool, StorageError> {
        let mut token = self.token.lock().map_err(|_| StorageError::Poisoned)?;
        if token.as_deref().and_then(non_blank).as_ref() != Some(expected) {
            return Ok(false);
        }
        *token = None;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
