//! HTTP client wrapper - sends built requests over reqwest

use async_trait::async_trait;
use std::collections::HashMap;

use crate::constants::REQUEST_TIMEOUT;
use crate::network::error::NetworkError;
use crate::network::request::{HttpRequest, HttpResponse};

/// Transport seam: anything that can turn a request into a response
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError>;
}

/// `HttpClient` backed by a shared `reqwest::Client`
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        ReqwestHttpClient {
            client: create_client(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        ReqwestHttpClient { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        let mut req_builder = self
            .client
            .request(request.method.to_reqwest(), request.url.clone());

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let resp = req_builder
            .send()
            .await
            .map_err(|e| NetworkError::from_transport(&e))?;

        let status = resp.status().as_u16();
        let headers: HashMap<String, String> = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        let body = resp
            .bytes()
            .await
            .map_err(|e| NetworkError::from_transport(&e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
