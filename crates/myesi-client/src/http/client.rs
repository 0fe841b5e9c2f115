//! Shared REST client: URL building, bearer auth, status mapping and
//! response envelopes.

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use myesi_core::config::ApiConfig;
use myesi_core::error::{AppError, ErrorKind};
use myesi_core::result::AppResult;

/// Thin wrapper over a [`reqwest::Client`] bound to the backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Underlying HTTP client, with the configured request timeout.
    http: reqwest::Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl ApiClient {
    /// Build a client for the configured backend.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| {
            AppError::configuration(format!("Invalid API base URL '{base_url}': {e}"))
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` with optional query parameters.
    pub fn url(&self, path: &str, params: &[(&str, String)]) -> AppResult<Url> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|e| AppError::internal(format!("Invalid request path '{path}': {e}")))?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Start a request, attaching the bearer token when one is given.
    pub fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the `data` of its response envelope.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: &'static str,
    ) -> AppResult<T> {
        let response = self.dispatch(builder, operation).await?;
        let body: Value = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("{operation}: invalid response body: {e}"),
                e,
            )
        })?;
        decode_envelope(body, operation)
    }

    /// Send a request whose response body is not needed.
    pub async fn send_empty(&self, builder: RequestBuilder, operation: &'static str) -> AppResult<()> {
        self.dispatch(builder, operation).await.map(|_| ())
    }

    /// Send a request and return the raw response when its status is a
    /// success.
    pub async fn dispatch(
        &self,
        builder: RequestBuilder,
        operation: &'static str,
    ) -> AppResult<Response> {
        let response = self.send_raw(builder, operation).await?;
        ensure_success(response, operation).await
    }

    /// Send a request and return the response whatever its status.
    pub async fn send_raw(
        &self,
        builder: RequestBuilder,
        operation: &'static str,
    ) -> AppResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, operation))?;
        debug!(operation = operation, status = %response.status(), "Backend responded");
        Ok(response)
    }
}

/// Response body of the REST backend: `{success, data, message}`, or the
/// bare payload from endpoints that do not wrap.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_data(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Unwraps a response body. A body flagged `success: false` fails with its
/// message before the payload is looked at, since such bodies usually carry
/// no `data`.
fn decode_envelope<T: DeserializeOwned>(body: Value, operation: &str) -> AppResult<T> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{operation} was not successful"));
        return Err(AppError::network(message));
    }

    serde_json::from_value::<Envelope<T>>(body)
        .map(Envelope::into_data)
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("{operation}: unexpected response shape: {e}"),
                e,
            )
        })
}

/// Returns the response when its status is a success, otherwise the mapped
/// error carrying the backend's message.
pub(crate) async fn ensure_success(response: Response, operation: &str) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let message = rejection_message(response).await;
    Err(status_error(status, message, operation))
}

/// The `message` (or `error`) field of an error body, if any.
pub(crate) async fn rejection_message(response: Response) -> Option<String> {
    let body = response.text().await.unwrap_or_default();
    let value: serde_json::Value = serde_json::from_str(&body).ok()?;
    ["message", "error"]
        .into_iter()
        .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Maps a rejected status to the error kind callers branch on.
pub(crate) fn status_error(status: StatusCode, message: Option<String>, operation: &str) -> AppError {
    let detail = message.unwrap_or_else(|| format!("{operation} failed with status {status}"));
    match status {
        StatusCode::UNAUTHORIZED => AppError::unauthenticated(detail),
        StatusCode::FORBIDDEN => AppError::authorization(detail),
        StatusCode::NOT_FOUND => AppError::not_found(detail),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::validation(detail),
        _ => AppError::network(detail),
    }
}

fn transport_error(err: reqwest::Error, operation: &str) -> AppError {
    if err.is_timeout() {
        AppError::with_source(ErrorKind::Timeout, format!("{operation} timed out"), err)
    } else {
        AppError::with_source(ErrorKind::Network, format!("{operation} failed: {err}"), err)
    }
}

/// The HTTP status a backend rejection corresponds to, for handing to
/// [`SessionManager::handle_remote_rejection`].
///
/// [`SessionManager::handle_remote_rejection`]: myesi_auth::SessionManager::handle_remote_rejection
pub fn rejection_status(err: &AppError) -> Option<u16> {
    match err.kind {
        ErrorKind::Unauthenticated => Some(StatusCode::UNAUTHORIZED.as_u16()),
        ErrorKind::Authorization => Some(StatusCode::FORBIDDEN.as_u16()),
        _ => None,
    }
}
