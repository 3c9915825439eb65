use thiserror::Error;

/// Errors that can occur during recipe import operations
///
/// Only network and referential failures surface here. Malformed structured
/// data, ungrammatical ingredient lines and unparseable quantities are
/// recovered inside the pipeline and never produce an `ImportError`.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The page answered with a non-2xx status
    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    /// Connection, DNS, body read or timeout failure while fetching
    #[error("Failed to fetch URL: {0}")]
    Transport(#[from] reqwest::Error),

    /// Input is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A referenced record does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl ImportError {
    /// Whether repeating the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ImportError::Transport(_) => true,
            ImportError::UpstreamStatus { status, .. } => {
                *status == 408 || *status == 429 || *status >= 500
            }
            _ => false,
        }
    }

    /// HTTP status a calling API layer should answer with for network failures.
    ///
    /// Upstream status errors map to 502 (bad gateway), transport failures to
    /// 504 (gateway timeout) and missing records to 404.
    pub fn gateway_status(&self) -> Option<u16> {
        match self {
            ImportError::UpstreamStatus { .. } => Some(502),
            ImportError::Transport(_) => Some(504),
            ImportError::NotFound { .. } => Some(404),
            ImportError::InvalidUrl(_) => Some(422),
            _ => None,
        }
    }
}
