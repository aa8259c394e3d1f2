//! Error types for trackmark.
//!
//! Every failure the client can produce is a variant of [`Error`]. Errors are
//! never swallowed inside the library; they propagate to the caller of the
//! operation that triggered them.

use std::{fmt, sync::Arc};

use thiserror::Error;

/// Shorthand used across the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The client-credentials token request failed.
    ///
    /// The cause is shared between every caller that joined the same
    /// in-flight token request, hence the `Arc`.
    #[error("access token request failed: {0}")]
    Auth(Arc<Error>),

    /// No response was obtained from upstream (DNS, connect, timeout, ...).
    #[error("transport error ({kind}): {source}")]
    Transport {
        kind: TransportErrorKind,
        #[source]
        source: reqwest::Error,
    },

    /// A response was received but its status was not a success.
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The body could not be parsed into the expected shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Alias resolution against one playlist failed, aborting the whole match.
    #[error("alias match against playlist {playlist_id} failed: {source}")]
    AliasMatch {
        playlist_id: String,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// A report timer needs a running tokio runtime to spawn onto.
    #[error("no tokio runtime available to run the stats reporter")]
    NoRuntime,
}

impl Error {
    /// Status code of an upstream failure, looking through auth and alias wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            Error::Auth(inner) => inner.status(),
            Error::AliasMatch { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Classification of transport-level failures, used as the `errored` stats key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Redirect,
    Request,
    Body,
    Decode,
    Other,
}

impl TransportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Redirect => "redirect",
            TransportErrorKind::Request => "request",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Decode => "decode",
            TransportErrorKind::Other => "other",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&reqwest::Error> for TransportErrorKind {
    fn from(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_redirect() {
            TransportErrorKind::Redirect
        } else if err.is_body() {
            TransportErrorKind::Body
        } else if err.is_decode() {
            TransportErrorKind::Decode
        } else if err.is_request() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Error::Transport {
            kind: TransportErrorKind::from(&source),
            source,
        }
    }
}
