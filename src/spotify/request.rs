use reqwest::{Client, Method, Url, header::HeaderMap};
use serde_json::Value;
use tracing::{trace, warn};

use super::stats::{EndpointKey, RequestStatsRegistry};
use crate::{
    error::{Error, Result, TransportErrorKind},
    types::AccessToken,
};

/// Per-request options for [`super::SpotifyClient::fetch`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: HeaderMap,
    /// Sent as `application/x-www-form-urlencoded` when present.
    pub form: Option<Vec<(String, String)>>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl FetchOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            form: None,
        }
    }

    pub fn post_form(form: Vec<(String, String)>) -> Self {
        Self {
            method: Method::POST,
            headers: HeaderMap::new(),
            form: Some(form),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// Sends one request and accounts for it in `stats`.
///
/// The endpoint's `attempted` counter moves before the request is sent;
/// exactly one of `succeeded`, `failed[status]` or `errored[kind]` moves after.
pub(crate) async fn dispatch(
    http: &Client,
    stats: &RequestStatsRegistry,
    url: &str,
    options: FetchOptions,
    bearer: Option<&AccessToken>,
) -> Result<Value> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidInput(format!("{}: {}", url, e)))?;
    let endpoint = EndpointKey::new(&options.method, &parsed);
    stats.record_attempt(&endpoint);

    let mut request = http
        .request(options.method.clone(), parsed)
        .headers(options.headers);
    if let Some(token) = bearer {
        request = request.bearer_auth(token.as_str());
    }
    if let Some(form) = &options.form {
        request = request.form(form);
    }

    trace!(%endpoint, url, "sending request");
    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => return Err(transport_failure(stats, &endpoint, err)),
    };

    let status = response.status();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(err) => return Err(transport_failure(stats, &endpoint, err)),
    };
    let parsed_body = if body.is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_slice::<Value>(&body)
    };

    if !status.is_success() {
        stats.record_failure(&endpoint, status.as_u16());
        let message = parsed_body
            .ok()
            .as_ref()
            .and_then(upstream_message)
            .unwrap_or_else(|| String::from_utf8_lossy(&body).trim().to_string());
        warn!(%endpoint, status = status.as_u16(), %message, "upstream request failed");
        return Err(Error::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    match parsed_body {
        Ok(value) => {
            stats.record_success(&endpoint);
            Ok(value)
        }
        Err(err) => {
            stats.record_error(&endpoint, TransportErrorKind::Decode.as_str());
            Err(Error::Decode(err))
        }
    }
}

fn transport_failure(
    stats: &RequestStatsRegistry,
    endpoint: &EndpointKey,
    err: reqwest::Error,
) -> Error {
    let error = Error::from(err);
    if let Error::Transport { kind, .. } = &error {
        stats.record_error(endpoint, kind.as_str());
        warn!(%endpoint, %kind, "request did not get a response");
    }
    error
}

/// Pulls the human-readable message out of an upstream error body.
///
/// Web API errors look like `{"error": {"status": 404, "message": "..."}}`,
/// token endpoint errors like `{"error": "invalid_client", "error_description": "..."}`.
pub(crate) fn upstream_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    if let Some(message) = error.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    if let Some(description) = body.get("error_description").and_then(Value::as_str) {
        return Some(description.to_string());
    }
    error.as_str().map(str::to_string)
}

