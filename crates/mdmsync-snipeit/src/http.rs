//! Resilient HTTP wrapper around the Snipe-IT REST API.
//!
//! Every Snipe-IT call goes through [`ResilientClient::request`], which:
//! - pauses for the rate window once the local per-minute budget is spent,
//! - retries HTTP 429 after a fixed delay (the budget is kept),
//! - retries HTTP 5xx after a fixed delay and resets the budget,
//! - retries transport failures after a fixed delay,
//! - hands any other 4xx back to the caller untouched.
//!
//! When all attempts are used up the call fails with
//! [`SnipeError::RetriesExhausted`].

use crate::error::{SnipeError, SnipeResult};
use crate::retry::{RequestBudget, RetryPolicy, Sleeper, TokioSleeper};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Default per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the body.
    pub fn json<T: DeserializeOwned>(&self) -> SnipeResult<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| SnipeError::Parse(format!("{e} (body: {})", truncate(&self.body))))
    }

    /// Fail with [`SnipeError::Api`] unless the status is 2xx.
    pub fn error_for_status(self) -> SnipeResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SnipeError::Api {
                status: self.status.as_u16(),
                body: self.body,
            })
        }
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Rate-limited, retrying Snipe-IT transport.
#[derive(Debug, Clone)]
pub struct ResilientClient {
    base_url: String,
    token: String,
    http_client: Client,
    policy: RetryPolicy,
    budget: Arc<RequestBudget>,
    sleeper: Arc<dyn Sleeper>,
}

impl ResilientClient {
    /// Create a client for `base_url` (e.g. `https://snipe.example.com/api/v1`)
    /// allowing `rate_limit` requests per window.
    pub fn new(base_url: &str, token: &str, rate_limit: u32) -> SnipeResult<Self> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("mdmsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SnipeError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(base_url, token, rate_limit, http_client))
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(base_url: &str, token: &str, rate_limit: u32, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http_client,
            policy: RetryPolicy::default(),
            budget: Arc::new(RequestBudget::new(rate_limit)),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests sent since the last budget reset.
    #[must_use]
    pub fn requests_in_window(&self) -> u32 {
        self.budget.sent()
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> SnipeResult<ApiResponse> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: Option<&Value>) -> SnipeResult<ApiResponse> {
        self.request(Method::POST, path, &[], body).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> SnipeResult<ApiResponse> {
        self.request(Method::PATCH, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> SnipeResult<ApiResponse> {
        self.request(Method::DELETE, path, &[], None).await
    }

    /// Send one logical request, retrying per the policy.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> SnipeResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            if self.budget.is_exhausted() {
                warn!(
                    limit = self.budget.limit(),
                    pause_secs = self.policy.rate_window.as_secs(),
                    "Request budget spent, pausing"
                );
                self.sleeper.sleep(self.policy.rate_window).await;
                self.budget.reset();
            }

            self.budget.record();
            debug!(method = %method, path, attempt, "Sending Snipe-IT request");

            let mut builder = self
                .http_client
                .request(method.clone(), &url)
                .bearer_auth(&self.token)
                .header(reqwest::header::ACCEPT, "application/json");
            if !query.is_empty() {
                builder = builder.query(query);
            }
            if let Some(body) = body {
                builder = builder.json(body);
            }

            let outcome = match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    response.text().await.map(|body| ApiResponse { status, body })
                }
                Err(e) => Err(e),
            };

            let response = match outcome {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        method = %method,
                        path,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Request failed, retrying"
                    );
                    self.sleeper.sleep(self.policy.retry_delay).await;
                    continue;
                }
            };

            let status = response.status;
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!(
                    path,
                    attempt,
                    delay_secs = self.policy.retry_delay.as_secs(),
                    "Rate limited by Snipe-IT (429)"
                );
                self.sleeper.sleep(self.policy.retry_delay).await;
                continue;
            }

            if status.is_server_error() {
                warn!(
                    path,
                    attempt,
                    status = status.as_u16(),
                    body = %response.body,
                    "Snipe-IT server error, retrying"
                );
                self.sleeper.sleep(self.policy.retry_delay).await;
                self.budget.reset();
                continue;
            }

            if status.is_client_error() {
                warn!(
                    method = %method,
                    path,
                    status = status.as_u16(),
                    body = %response.body,
                    "Snipe-IT client error"
                );
            }

            return Ok(response);
        }

        error!(
            method = %method,
            url = %url,
            attempts = max_attempts,
            "Giving up on Snipe-IT request"
        );
        Err(SnipeError::RetriesExhausted {
            method: method.to_string(),
            path: path.to_string(),
            attempts: max_attempts,
        })
    }
}
