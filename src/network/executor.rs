//! Request executor - build, send, validate and decode API calls

use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::network::client::HttpClient;
use crate::network::endpoint::Endpoint;
use crate::network::error::NetworkError;
use crate::network::request::RequestBuilding;

const BODY_PREVIEW_LIMIT: usize = 2000;

/// Executes endpoints end to end and decodes the JSON payload
pub struct RequestExecutor {
    builder: Arc<dyn RequestBuilding>,
    client: Arc<dyn HttpClient>,
}

impl RequestExecutor {
    pub fn new(builder: Arc<dyn RequestBuilding>, client: Arc<dyn HttpClient>) -> Self {
        RequestExecutor { builder, client }
    }

    pub async fn call<T: DeserializeOwned>(&self, endpoint: &dyn Endpoint) -> Result<T, NetworkError> {
        let request = self.builder.make_request(endpoint)?;
        let url = redact(&request.url);
        tracing::debug!(method = request.method.as_str(), url = %url, "-> request");

        let response = match self.client.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "network error");
                return Err(e);
            }
        };
        tracing::debug!(
            status = response.status,
            url = %url,
            bytes = response.body.len(),
            content_type = response.header("Content-Type").unwrap_or("-"),
            "<- response"
        );

        if let Err(e) = NetworkError::check_status(response.status, &response.body) {
            tracing::error!(url = %url, error = %e, "server error");
            return Err(e);
        }

        serde_json::from_slice::<T>(&response.body).map_err(|e| {
            tracing::error!(
                target_type = std::any::type_name::<T>(),
                line = e.line(),
                column = e.column(),
                preview = %preview_body(&response.body, BODY_PREVIEW_LIMIT),
                "decoding error: {}",
                e
            );
            NetworkError::Decoding(e.to_string())
        })
    }
}

/// Mask `api_key` query values for logging
pub fn redact(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k.eq_ignore_ascii_case("api_key")) {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k.eq_ignore_ascii_case("api_key") {
                (k.into_owned(), "•••redacted•••".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();
    let mut masked = url.clone();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

/// Truncated, log-safe preview of a response body
pub fn preview_body(data: &[u8], limit: usize) -> String {
    if data.is_empty() {
        return "<empty>".to_string();
    }
    match std::str::from_utf8(data) {
        Ok(text) => {
            let trimmed = text.trim();
            if trimmed.chars().count() > limit {
                let cut: String = trimmed.chars().take(limit).collect();
                format!("{}…(truncated)", cut)
            } else {
                trimmed.to_string()
            }
        }
        Err(_) => format!("<non-UTF8 payload: {} bytes>", data.len()),
    }
}
