//! HTTP client for the AI service: one base address, one endpoint per call.
//!
//! Every tool talks to the backend through [`ServiceClient::call`]; requests
//! carry a JSON body and can be cancelled through a `CancellationToken`.

mod envelope;
mod error;

pub use envelope::{SummaryEnvelope, message_content, summary};
pub use error::{ServiceError, error_detail};

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use crate::core::config::Config;

/// Maximum number of body characters kept in a `Status` error.
const ERROR_BODY_LIMIT: usize = 300;

/// A backend route: HTTP method plus path relative to the base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
}

impl Endpoint {
    pub const fn post(path: &'static str) -> Self {
        Self {
            method: Method::POST,
            path,
        }
    }
}

/// Client for the AI service.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!(
                "{}/{}",
                crate::core::app::NAME,
                crate::core::app::VERSION
            ))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint: base without trailing `/` joined to path without leading `/`.
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        )
    }

    /// Send `body` as JSON and return the raw status and response text.
    async fn send<B>(
        &self,
        endpoint: &Endpoint,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<(StatusCode, String), ServiceError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(endpoint);
        log::debug!("{} {}", endpoint.method, url);

        let request = self
            .http
            .request(endpoint.method.clone(), &url)
            .json(body)
            .send();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ServiceError::Cancelled),
            r = request => r?,
        };

        let status = response.status();
        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ServiceError::Cancelled),
            t = response.text() => t?,
        };
        log::debug!("{} {} -> {} ({} bytes)", endpoint.method, url, status, text.len());
        Ok((status, text))
    }

    /// Call an endpoint and decode the JSON response body.
    /// Non-2xx statuses become `ServiceError::Status`.
    pub async fn call<B>(
        &self,
        endpoint: &Endpoint,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<Value, ServiceError>
    where
        B: Serialize + ?Sized,
    {
        let (status, text) = self.send(endpoint, body, cancel).await?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: truncate(&error_detail(&text), ERROR_BODY_LIMIT),
            });
        }
        serde_json::from_str(&text).map_err(|source| ServiceError::Decode {
            route: endpoint.path,
            source,
        })
    }

    /// Probe the service with a throwaway prompt. Any 2xx status counts as online.
    pub async fn check_connection(
        &self,
        endpoint: &Endpoint,
        cancel: &CancellationToken,
    ) -> Result<(), ServiceError> {
        let (status, text) = self
            .send(endpoint, &json!({ "prompt": "test connection" }), cancel)
            .await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(ServiceError::Status {
                status: status.as_u16(),
                body: truncate(&error_detail(&text), ERROR_BODY_LIMIT),
            })
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests;
