use crate::error::{Error, Result};
use crate::http::*;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::ClientBuilder;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::trace;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Issues one GET and returns the parsed JSON body.
///
/// Transport failures surface as [`Error::Transport`]; a body that is not JSON as
/// [`Error::MalformedJson`].
pub trait Fetch: Send + Sync {
    fn get_json(&self, url: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// [`Fetch`] over a [`reqwest::Client`].
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: HttpClient,
}

impl HttpFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Builds the client: a user agent, a request timeout and, when `token` is present, a
    /// default bearer `Authorization` header.
    pub fn build(token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| Error::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = ClientBuilder::new()
            .user_agent(concat!("fpl-spider/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn get_json(&self, url: &str) -> Result<Value> {
        trace!("GET {url}");
        let transport = |source| Error::Transport {
            url: url.to_string(),
            source,
        };

        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(transport)?
            .bytes()
            .await
            .map_err(transport)?;

        trace!("deserializing {} bytes from {url}", bytes.len());
        serde_json::from_slice(&bytes).map_err(|source| Error::MalformedJson {
            url: url.to_string(),
            source,
        })
    }
}
