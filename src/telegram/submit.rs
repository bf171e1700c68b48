//! Authenticated submission of the user to the backend (`POST /auth/`)

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::telegram::host::{Document, HostEnvironment, IndicatorGuard, SENDING_TEXT};
use crate::telegram::init_data::UserId;
use crate::telegram::webapp_auth::{self, PayloadScope};

/// Path of the auth endpoint, relative to the backend base URL
pub const AUTH_ENDPOINT: &str = "/auth/";

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    user_id: &'a UserId,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Fallback text when a failed response carries no usable `message`
pub fn generic_failure_message(status: u16) -> String {
    format!("request failed with status {}", status)
}

/// HTTP client for the auth endpoint
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Client against `base_url` with the HTTP client's default timeouts
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Client configured from MINIHACK_BACKEND_URL / MINIHACK_HTTP_TIMEOUT_SECS
    pub fn from_env() -> AppResult<Self> {
        Self::with_timeout(config::BACKEND_URL.as_str(), config::network::timeout())
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, AUTH_ENDPOINT)
    }

    /// Posts `{"user_id": ...}` with the given `Authorization` header
    ///
    /// A "sending" indicator is attached after the `anchor` control for as
    /// long as the request is in flight and removed on every outcome.
    ///
    /// # Errors
    /// `RequestFailed` for non-2xx replies, transport and JSON errors otherwise.
    pub async fn submit(
        &self,
        user_id: &UserId,
        authorization: &str,
        document: &dyn Document,
        anchor: &str,
    ) -> AppResult<Value> {
        let _indicator = IndicatorGuard::attach(document, anchor, SENDING_TEXT);

        log::info!("Submitting user {} to {}", user_id, self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .header(AUTHORIZATION, authorization)
            .json(&AuthRequest { user_id })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| generic_failure_message(status.as_u16()));

            log::warn!("Auth request failed ({}): {}", status, message);
            return Err(AppError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<Value>().await?;
        log::info!("User {} submitted ({})", user_id, status);
        Ok(body)
    }

    /// Signs the host's init data and submits its user
    ///
    /// # Errors
    /// `NotInHostEnvironment`, `MissingUser`, or anything [`Self::submit`] returns.
    pub async fn send_user_info(
        &self,
        host: &dyn HostEnvironment,
        document: &dyn Document,
        anchor: &str,
        scope: PayloadScope,
    ) -> AppResult<Value> {
        let init_data = host.init_data().ok_or(AppError::NotInHostEnvironment)?;
        let user_id = init_data.user_id()?;
        let authorization = webapp_auth::build_authorization_header(&init_data, scope)?;

        self.submit(&user_id, &authorization, document, anchor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = AuthClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/auth/");
    }

    #[test]
    fn test_request_body_shape() {
        let id = UserId::Numeric(42);
        assert_eq!(
            serde_json::to_string(&AuthRequest { user_id: &id }).unwrap(),
            r#"{"user_id":42}"#
        );

        let id = UserId::Text("42".to_string());
        assert_eq!(
            serde_json::to_string(&AuthRequest { user_id: &id }).unwrap(),
            r#"{"user_id":"42"}"#
        );
    }

    #[test]
    fn test_generic_failure_message_names_status() {
        assert!(generic_failure_message(502).contains("502"));
    }
}
