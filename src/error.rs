//! Error types shared across the client.
//!
//! ERROR HANDLING
//! ==============
//! Setup failures (`ClientError`) propagate to the binary. Everything on the
//! navigation path degrades to values instead: the session flow reports
//! `Invalid`, and route loaders fold transport failures into the
//! `ResponseError` envelope.

/// Errors produced while configuring or wiring the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The credential could not be persisted or removed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A path given to the navigator did not parse.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// Output could not be serialized.
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Failures reading or writing the persisted credential.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("credential storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential storage lock poisoned")]
    Poisoned,
}

/// Failures at the HTTP transport layer, before any status code is known.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { Self::Timeout } else { Self::Request(err.to_string()) }
    }
}

/// Why a credential or identity could not be established.
///
/// Callers treat every variant the same way; the detail exists for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Invalid {
    /// No credential was stored.
    #[error("no credential present")]
    MissingCredential,

    /// The backend answered with a non-success status.
    #[error("rejected with status {status}")]
    Rejected { status: u16 },

    /// The backend could not be reached.
    #[error("network failure: {0}")]
    Network(#[from] TransportError),

    /// The backend answered 2xx but the body did not decode.
    #[error("undecodable response: {0}")]
    Decode(String),
}

/// A path that does not name a known page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("unknown route: {0}")]
    Unknown(String),

    #[error("invalid id segment: {0}")]
    InvalidId(String),

    #[error("invalid query parameter: {0}")]
    InvalidQuery(String),
}
