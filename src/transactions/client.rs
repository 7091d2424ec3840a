use reqwest::Client as ReqwestClient;
use reqwest::Method;

use crate::Result;
use crate::auth;
use crate::transactions::transport::{ReqwestTransport, Transport};
use crate::transactions::{
    Action, CanonicalRequest, Credentials, Instrumentation, Params, Response, TransactOverrides,
};

/// Signed transaction client for the gateway's `/transactions` endpoint.
#[derive(Clone, Debug)]
pub struct Client<T = ReqwestTransport> {
    credentials: Credentials,
    instrumentation: Instrumentation,
    transport: T,
}

impl Client {
    /// Creates a client with a default HTTP client and instrumentation disabled.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self::with_client(credentials, ReqwestClient::new())
    }

    /// Creates a client that sends through a custom HTTP client.
    #[must_use]
    pub fn with_client(credentials: Credentials, client: ReqwestClient) -> Self {
        Self::with_transport(credentials, ReqwestTransport::new(client))
    }
}

impl<T: Transport> Client<T> {
    #[must_use]
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            instrumentation: Instrumentation::default(),
            transport,
        }
    }

    /// Attaches an instrumentation handle. Pass a clone to share it between clients.
    #[must_use]
    pub fn with_instrumentation(mut self, instrumentation: Instrumentation) -> Self {
        self.instrumentation = instrumentation;
        self
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn instrumentation(&self) -> &Instrumentation {
        &self.instrumentation
    }

    /// Signs and submits a transaction with a fresh nonce and timestamp.
    ///
    /// Only malformed requests are returned as `Err`, before anything is sent.
    /// Gateway rejections and transport failures are [`Response`] variants.
    pub async fn transact(&self, action: Action, params: Params) -> Result<Response> {
        self.transact_with_overrides(action, params, TransactOverrides::default())
            .await
    }

    /// Signs and submits a transaction, pinning any overridden signing inputs.
    pub async fn transact_with_overrides(
        &self,
        action: Action,
        params: Params,
        overrides: TransactOverrides,
    ) -> Result<Response> {
        let request = self.commit(&action, params)?;

        let nonce = overrides.nonce.unwrap_or_else(auth::generate_nonce);
        let timestamp = overrides.timestamp.unwrap_or_else(auth::current_timestamp);
        let headers = auth::create_headers(&self.credentials, nonce, timestamp, &request.body)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(action = %action, url = %request.url, nonce, timestamp, "submitting transaction");

        let outcome = self
            .instrumentation
            .measure(
                Method::POST,
                &request.url,
                self.transport.post(&request.url, &request.body, headers),
            )
            .await;
        let response = Response::from_outcome(outcome);

        #[cfg(feature = "tracing")]
        tracing::debug!(action = %action, kind = %response.kind(), status = ?response.status(), "transaction completed");

        Ok(response)
    }

    /// Builds the endpoint URL and canonical body for `action` without sending.
    pub fn commit(&self, action: &Action, params: Params) -> Result<CanonicalRequest> {
        CanonicalRequest::build(&self.credentials.url, action, params)
    }
}
