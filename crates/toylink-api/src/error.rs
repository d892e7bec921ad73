use thiserror::Error;

/// Top-level error type for the `toylink-api` crate.
///
/// Covers every failure mode across both API surfaces: the cloud pairing
/// endpoint and the LAN relay command endpoint. `toylink-core` maps these
/// into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Pairing ─────────────────────────────────────────────────────
    /// The cloud pairing endpoint returned a failure result.
    #[error("Pairing failed (code {code}): {message}")]
    Pairing { message: String, code: i64 },

    // ── Commands ────────────────────────────────────────────────────
    /// The relay accepted the request but reported a non-success code.
    #[error("Command rejected (code {code}): {message}")]
    Command { message: String, code: i64 },

    /// The endpoint answered with a non-2xx HTTP status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Neither client retries on its own -- the decision is the caller's.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Translate a `reqwest` failure, folding timeouts into [`Error::Timeout`].
    pub(crate) fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::Transport(err)
        }
    }
}
