use crate::endpoint::{Param, Resource};

pub type Result<T> = std::result::Result<T, Error>;

/// Every way a load, or the write that follows it, can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection failure, timeout or a non-2xx status.
    #[error("request to {url} failed, error({source})")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not JSON.
    #[error("response from {url} is not valid JSON, error({source})")]
    MalformedJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response is JSON, but the extraction key is absent.
    #[error("response from {url} has no `{key}` field")]
    MissingKey { url: String, key: String },

    #[error("{resource} requires `{param}`, which was not supplied")]
    MissingParam { resource: Resource, param: Param },

    #[error("`{param}` must be a positive integer, got `{value}`")]
    InvalidParam { param: Param, value: String },

    #[error("{0} is not served by bootstrap-static")]
    NotBootstrap(Resource),

    #[error("access token contains characters not allowed in a header")]
    InvalidToken,

    #[error("failed to build HTTP client, error({0})")]
    Client(#[source] reqwest::Error),

    #[error("database error, error({0})")]
    Database(#[from] tokio_postgres::Error),

    #[error("database pool error, error({0})")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("io error, error({0})")]
    Io(#[from] std::io::Error),

    #[error("failed to (de)serialize JSON, error({0})")]
    Json(#[source] serde_json::Error),
}

/// Coarse grouping of [`Error`], so callers can tell "the server refused" from
/// "the server answered something unexpected".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Malformed,
    Config,
    Sink,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport { .. } => ErrorKind::Transport,
            Error::MalformedJson { .. } | Error::MissingKey { .. } | Error::Json(_) => {
                ErrorKind::Malformed
            }
            Error::MissingParam { .. }
            | Error::InvalidParam { .. }
            | Error::NotBootstrap(_)
            | Error::InvalidToken
            | Error::Client(_) => ErrorKind::Config,
            Error::Database(_) | Error::Pool(_) | Error::Io(_) => ErrorKind::Sink,
        }
    }
}
