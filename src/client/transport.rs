//! HTTP transport for the content API.
//!
//! [`Transport`] is the seam between the access layer and the network. The
//! production implementation is [`HttpTransport`] (reqwest); tests swap in
//! their own implementations.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::Params;
use crate::telemetry;
use crate::{LyceumError, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends requests to the content API and decodes JSON bodies.
///
/// Paths are relative to the API base (e.g. `courses/42`). Implementations
/// return the decoded body unmodified; an empty body decodes to `null`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET path?params`.
    async fn get(&self, path: &str, params: &Params, token: Option<&str>) -> Result<Value>;

    /// A write (`POST`, `PUT`, `DELETE`) with an optional JSON body.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value>;
}

/// reqwest-backed [`Transport`].
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the API rooted at `base_url`
    /// (e.g. `https://example.com/api`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LyceumError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a transport around an existing reqwest client.
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send, decode, and record request metrics.
    async fn execute(&self, method: &Method, path: &str, request: RequestBuilder) -> Result<Value> {
        let start = Instant::now();
        let result = dispatch(path, request).await;

        let status = if result.is_ok() { "ok" } else { "error" };
        let method = method.as_str().to_string();
        metrics::counter!(
            telemetry::REQUESTS_TOTAL,
            "method" => method.clone(),
            "status" => status
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "method" => method)
            .record(start.elapsed().as_secs_f64());

        result
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, params: &Params, token: Option<&str>) -> Result<Value> {
        debug!(path, query = %params.to_query_string(), "GET");
        let pairs: Vec<(&str, &str)> = params.iter().collect();
        let request = self.http.get(self.url(path)).query(&pairs);
        self.execute(&Method::GET, path, Self::authorize(request, token))
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value> {
        debug!(%method, path, "write");
        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(&method, path, Self::authorize(request, token))
            .await
    }
}

async fn dispatch(path: &str, request: RequestBuilder) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(path, status = status.as_u16(), "content API returned an error");
        return Err(LyceumError::from_status(status.as_u16(), path, &body));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&body)?)
}
