use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use url::Url;

use crate::error::Error;

/// What came back from a single POST, decided once at the transport boundary.
#[non_exhaustive]
#[derive(Debug)]
pub enum RawOutcome {
    /// The gateway answered with a 2xx status.
    Success { status: StatusCode, body: String },
    /// The gateway answered with any other status.
    GatewayError { status: StatusCode, body: String },
    /// No usable HTTP response was received.
    TransportFailure(Error),
}

/// Sends a signed request to the gateway.
///
/// Implementations must send `body` and `headers` untouched and must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &Url, body: &str, headers: HeaderMap) -> RawOutcome;
}

/// [`Transport`] backed by a [`reqwest::Client`].
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new(client: ReqwestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, url: &Url, body: &str, headers: HeaderMap) -> RawOutcome {
        let response = match self
            .client
            .post(url.clone())
            .headers(headers)
            .body(body.to_owned())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return RawOutcome::TransportFailure(e.into()),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return RawOutcome::TransportFailure(e.into()),
        };

        if status.is_success() {
            RawOutcome::Success { status, body }
        } else {
            RawOutcome::GatewayError { status, body }
        }
    }
}
