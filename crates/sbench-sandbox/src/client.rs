//! HTTP client for the sandbox API.
//!
//! Every call is bounded by the configured request timeout; that covers
//! connecting, sending, and reading the whole body. All failures come back
//! as [`TrialError`] so the trial runner can record them as failed samples.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use sbench_common::{TrialError, TrialResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Sandbox API client. Cheap to share behind an `Arc`; connections are pooled.
pub struct SandboxClient {
    base_url: String,
    request_timeout: Duration,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl SandboxClient {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        let base_url: String = base_url.into();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// `GET {base_url}{path_and_query}` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> TrialResult<T> {
        let bytes = self
            .send(Method::GET, path_and_query, Bytes::new())
            .await?;
        decode(&bytes)
    }

    /// `POST {base_url}{path}` with a JSON body and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> TrialResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|e| TrialError::invalid_request(format!("failed to encode body: {}", e)))?;
        let bytes = self
            .send(Method::POST, path, Bytes::from(payload))
            .await?;
        decode(&bytes)
    }

    async fn send(&self, method: Method, path_and_query: &str, body: Bytes) -> TrialResult<Bytes> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let uri: Uri = url
            .parse()
            .map_err(|e| TrialError::invalid_request(format!("invalid URI {}: {}", url, e)))?;

        let mut builder = Request::builder().method(method.clone()).uri(uri);
        if !body.is_empty() {
            builder = builder.header("Content-Type", "application/json");
        }
        let request = builder
            .body(Full::new(body))
            .map_err(|e| TrialError::invalid_request(format!("failed to build request: {}", e)))?;

        debug!("{} {}", method, url);

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| TrialError::transport(e.to_string()))?;

            let status = response.status();
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| TrialError::transport(format!("failed to read response: {}", e)))?
                .to_bytes();

            if !status.is_success() {
                return Err(TrialError::status(
                    status.as_u16(),
                    String::from_utf8_lossy(&bytes),
                ));
            }
            Ok(bytes)
        };

        match timeout(self.request_timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                debug!("{} {} timed out", method, url);
                Err(TrialError::timeout(self.request_timeout.as_millis() as u64))
            }
        }
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> TrialResult<T> {
    serde_json::from_slice(bytes).map_err(|e| TrialError::malformed(e.to_string()))
}
