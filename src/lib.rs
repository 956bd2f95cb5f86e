//! # cookbook
//!
//! Async client for the recipe-sharing backend: bearer-credential storage,
//! session bootstrap against `/account/verify`, a reactive current-user
//! cell, and per-route page data loaders.
//!
//! Typical wiring goes through [`connect`], which binds a `reqwest`
//! transport and a file-backed credential store from a [`ClientConfig`].

pub mod config;
pub mod credentials;
pub mod error;
pub mod loaders;
pub mod net;
pub mod session;

use std::sync::Arc;

pub use config::ClientConfig;
pub use error::ClientError;
use credentials::FileCredentialStore;
use loaders::PageLoaders;
use loaders::route::Navigator;
use net::transport::ReqwestTransport;
use session::{SessionBootstrap, SessionStore};

/// Build a navigator over the real HTTP transport and on-disk credential.
///
/// # Errors
///
/// Returns an error if the HTTP client fails to build.
pub fn connect(config: &ClientConfig) -> Result<Navigator, ClientError> {
    let transport = Arc::new(ReqwestTransport::new(config)?);
    let credentials = Arc::new(FileCredentialStore::new(&config.credential_dir));
    let session = Arc::new(SessionBootstrap::new(transport.clone(), credentials, SessionStore::new()));
    let loaders = PageLoaders::new(transport, session.clone());
    Ok(Navigator::new(session, loaders))
}
