use thiserror::Error as ThisError;

/// Crate-wide error taxonomy. Every fallible operation returns one of these;
/// the CLI dispatcher maps any of them to a non-zero exit code.
#[derive(Debug, ThisError)]
pub enum CredwatchError {
    #[error("configuration error: {0}")]
    Configuration(#[from] figment::Error),

    #[error("SERVICE_KEY must be set and non-empty")]
    EmptyServiceKey,

    #[error("SERVICE_KEY is not usable as an HTTP header value")]
    InvalidServiceKey,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("connection handshake failed: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("{op} request failed: {source}")]
    Request {
        op: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("subscription error: {0}")]
    Subscription(#[source] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CredwatchError {
    /// Wrap a transport failure with the name of the table operation that hit it.
    pub(crate) fn request(op: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Request { op, source }
    }
}
