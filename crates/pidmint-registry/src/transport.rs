//! HTTP transport against the PID registry
//!
//! One client per run, built with the configured connect/socket timeouts.
//! Every call goes out with basic auth; transport-level failures (connect,
//! timeout, undecodable response) are retried with linear backoff, while
//! HTTP responses of any status are returned verbatim to the caller.

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

use pidmint_core::{Pid, ServiceConfig};

use crate::error::TransportError;
use crate::retry::{retry_with_backoff, RetryError, RetryPolicy};
use crate::shutdown::ShutdownSignal;

pub const XML_CONTENT_TYPE: &str = "application/xml;charset=UTF-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

/// Request payload kinds the registry accepts.
#[derive(Debug, Clone)]
pub enum RequestBody {
    None,
    Xml(String),
    Text(String),
}

/// Raw registry answer: status code and body, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryResponse {
    pub status: u16,
    pub body: String,
}

/// The registry operations the lifecycle drives. `HttpTransport` is the
/// production implementation; tests substitute scripted clients.
#[allow(async_fn_in_trait)]
pub trait RegistryClient {
    async fn post_metadata(
        &self,
        pid: &Pid,
        xml: String,
    ) -> Result<RegistryResponse, TransportError>;
    async fn put_metadata(
        &self,
        pid: &Pid,
        xml: String,
    ) -> Result<RegistryResponse, TransportError>;
    async fn put_doi(&self, pid: &Pid, text: String) -> Result<RegistryResponse, TransportError>;
    async fn get_doi(&self, pid: &Pid) -> Result<RegistryResponse, TransportError>;
}

/// Retry-capable HTTP transport with basic authentication.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ServiceConfig,
    policy: RetryPolicy,
    shutdown: ShutdownSignal,
}

impl HttpTransport {
    pub fn new(config: ServiceConfig, shutdown: ShutdownSignal) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.socket_timeout())
            .build()
            .expect("Failed to create HTTP client");
        let policy = RetryPolicy {
            max_attempts: config.max_retries,
            base_delay: config.retry_base_delay(),
        };
        Self {
            client,
            config,
            policy,
            shutdown,
        }
    }

    /// Execute one call against `address + suffix`, retrying transport
    /// failures per the configured policy.
    pub async fn execute(
        &self,
        method: Method,
        suffix: &str,
        body: RequestBody,
    ) -> Result<RegistryResponse, TransportError> {
        let url = format!("{}{}", self.config.address, suffix);
        tracing::debug!(%method, %url, "registry call");

        retry_with_backoff(self.policy, &self.shutdown, || {
            self.send_once(&method, &url, &body)
        })
        .await
        .map_err(|e| match e {
            RetryError::Exhausted { attempts, source } => TransportError::Exhausted {
                attempts,
                last: source.to_string(),
            },
            RetryError::Cancelled => TransportError::Cancelled,
        })
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        body: &RequestBody,
    ) -> Result<RegistryResponse, reqwest::Error> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .basic_auth(&self.config.username, Some(&self.config.password));
        request = match body {
            RequestBody::None => request,
            RequestBody::Xml(xml) => request
                .header(CONTENT_TYPE, XML_CONTENT_TYPE)
                .body(xml.clone()),
            RequestBody::Text(text) => request
                .header(CONTENT_TYPE, TEXT_CONTENT_TYPE)
                .body(text.clone()),
        };

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RegistryResponse { status, body })
    }
}

impl RegistryClient for HttpTransport {
    async fn post_metadata(
        &self,
        pid: &Pid,
        xml: String,
    ) -> Result<RegistryResponse, TransportError> {
        self.execute(
            Method::POST,
            &format!("metadata/{pid}"),
            RequestBody::Xml(xml),
        )
        .await
    }

    async fn put_metadata(
        &self,
        pid: &Pid,
        xml: String,
    ) -> Result<RegistryResponse, TransportError> {
        self.execute(
            Method::PUT,
            &format!("metadata/{pid}"),
            RequestBody::Xml(xml),
        )
        .await
    }

    async fn put_doi(&self, pid: &Pid, text: String) -> Result<RegistryResponse, TransportError> {
        self.execute(Method::PUT, &format!("doi/{pid}"), RequestBody::Text(text))
            .await
    }

    async fn get_doi(&self, pid: &Pid) -> Result<RegistryResponse, TransportError> {
        self.execute(Method::GET, &format!("doi/{pid}"), RequestBody::None)
            .await
    }
}
