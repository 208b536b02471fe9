//! # Marketplace HTTP Client
//!
//! Wrapper around the Agromercado REST API.
//!
//! The client is stateless with respect to the user: every authenticated
//! call takes the bearer token explicitly, usually borrowed from a
//! [`agromercado_core::Session`].

use crate::config::ClientConfig;
use crate::envelope::{ApiEnvelope, ErrorBody};
use crate::error::{ClientError, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::sync::Arc;

const TRACING_TARGET: &str = "agromercado_client::http";

/// HTTP client for the marketplace backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MarketClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    base_url: String,
}

impl MarketClient {
    /// Build a client from its configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.normalized_base_url()?;
        let http = reqwest::Client::builder()
            .timeout(config.effective_timeout())
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        tracing::debug!(target: TRACING_TARGET, base_url = %base_url, "client ready");
        Ok(Self {
            inner: Arc::new(Inner { http, base_url }),
        })
    }

    /// API root every path is appended to.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    // =========================================================================
    // REQUEST PIPELINE
    // =========================================================================

    /// Build a request, with bearer auth when a token is given.
    pub(crate) fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!(
            target: TRACING_TARGET,
            method = %method,
            path,
            authenticated = token.is_some(),
            "request"
        );
        let req = self.inner.http.request(method, url);
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send a request, mapping transport failures.
    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        req.send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                "timed out".to_string()
            } else {
                e.to_string()
            };
            tracing::debug!(target: TRACING_TARGET, error = %e, "transport failure");
            ClientError::Connection {
                url: self.inner.base_url.clone(),
                reason,
            }
        })
    }

    /// Check the status code and decode the envelope of a response.
    async fn envelope<T: DeserializeOwned>(&self, resp: Response) -> Result<ApiEnvelope<T>> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ClientError::Connection {
            url: self.inner.base_url.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(target: TRACING_TARGET, status = status.as_u16(), "response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized {
                message: ErrorBody::message_of(&body),
            });
        }
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: ErrorBody::message_of(&body),
            });
        }

        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
        if !envelope.success {
            return Err(ClientError::Rejected(envelope.message));
        }
        Ok(envelope)
    }

    /// Run a request whose `data` is required.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        self.fetch_optional(req).await?.ok_or(ClientError::MissingData)
    }

    /// Run a request whose `data` may be absent.
    pub(crate) async fn fetch_optional<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<Option<T>> {
        let resp = self.send(req).await?;
        Ok(self.envelope::<T>(resp).await?.data)
    }

    /// Run a request for its effect only. Returns the server message.
    pub(crate) async fn execute(&self, req: RequestBuilder) -> Result<Option<String>> {
        let resp = self.send(req).await?;
        Ok(self.envelope::<IgnoredAny>(resp).await?.message)
    }
}
