//! Ethereum JSON-RPC transport with basic auth and retry logic.

use std::time::Duration;

use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use base64::{engine::general_purpose, Engine as _};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::http_client::{HeaderMap, HeaderValue, HttpClient};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ChainClientError;

/// Default HTTP request timeout
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Default upper bound on the time spent retrying a request
pub const MAX_RETRY_ELAPSED: Duration = Duration::from_secs(60);

/// Connection settings of a JSON-RPC endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// HTTP(S) endpoint
    pub url: String,
    /// Basic auth credentials as `user:password`
    #[serde(default)]
    pub userpwd: Option<String>,
    /// Timeout of a single HTTP request
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
    /// Give up retrying a failing request after this long
    #[serde(default = "default_max_retry_elapsed")]
    pub max_retry_elapsed: Duration,
}

fn default_request_timeout() -> Duration {
    HTTP_REQUEST_TIMEOUT
}

fn default_max_retry_elapsed() -> Duration {
    MAX_RETRY_ELAPSED
}

impl RpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            userpwd: None,
            request_timeout: HTTP_REQUEST_TIMEOUT,
            max_retry_elapsed: MAX_RETRY_ELAPSED,
        }
    }
}

/// Ethereum JSON-RPC client
#[derive(Debug, Clone)]
pub struct EthRpcClient {
    client: HttpClient,
    backoff: ExponentialBackoff,
}

impl EthRpcClient {
    /// Create a new client with default timeout and retry settings (exponential backoff)
    pub fn new(url: String, userpwd: Option<String>) -> Result<Self, ChainClientError> {
        Self::from_config(&RpcConfig {
            userpwd,
            ..RpcConfig::new(url)
        })
    }

    pub fn from_config(config: &RpcConfig) -> Result<Self, ChainClientError> {
        let mut headers = HeaderMap::new();
        if let Some(userpwd) = &config.userpwd {
            let creds = general_purpose::STANDARD.encode(userpwd);
            headers.insert(
                "Authorization",
                HeaderValue::from_str(&format!("Basic {creds}"))
                    .map_err(|_| ChainClientError::InvalidHeader)?,
            );
        };

        let client = HttpClient::builder()
            .set_headers(headers)
            .request_timeout(config.request_timeout)
            .build(&config.url)?;

        let backoff = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(config.max_retry_elapsed))
            .build();

        Ok(Self { client, backoff })
    }

    /// Perform a JSON-RPC call, retrying transport failures
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: ArrayParams,
    ) -> Result<T, ChainClientError> {
        request_with_retry(self.backoff.clone(), || async {
            self.client
                .request(method, params.clone())
                .await
                .map_err(Into::into)
        })
        .await
    }
}

/// Execute a request with retry logic using exponential backoff
/// Only retries on transport failures, never on JSON-RPC errors
async fn request_with_retry<F, Fut, T>(
    backoff: ExponentialBackoff,
    operation: F,
) -> Result<T, ChainClientError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, ChainClientError>>,
{
    use backoff::{future::retry_notify, Error};

    retry_notify(
        backoff,
        || async {
            match operation().await {
                Ok(result) => Ok(result),
                Err(err) if is_retryable_error(&err) => Err(Error::transient(err)),
                Err(err) => Err(Error::permanent(err)),
            }
        },
        |err, duration| {
            warn!("Request failed, retrying in {:?}: {}", duration, err);
        },
    )
    .await
}

/// Only transport level failures (connection, timeout, HTTP status) are retried
fn is_retryable_error(err: &ChainClientError) -> bool {
    use jsonrpsee::core::client::Error as RpcError;
    match err {
        ChainClientError::RpcClient(rpc_err) => matches!(
            rpc_err,
            RpcError::Transport(_)
                | RpcError::RequestTimeout
                | RpcError::RestartNeeded(_)
                | RpcError::ServiceDisconnect
        ),
        _ => false,
    }
}
