//! Plain request/response values and the request builder

use reqwest::Url;
use std::collections::HashMap;

use crate::network::config::ApiConfig;
use crate::network::endpoint::{Endpoint, HttpMethod};
use crate::network::error::NetworkError;

/// A fully built request, independent of the transport
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Last value set for a header (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value));
    }
}

/// Response as seen by the executor; header names are lowercased
#[derive(Clone, Debug, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: bytes::Bytes,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Turns endpoints into requests against the configured base URL
pub trait RequestBuilding: Send + Sync {
    fn make_request(&self, endpoint: &dyn Endpoint) -> Result<HttpRequest, NetworkError>;
}

pub struct DefaultRequestBuilder {
    config: ApiConfig,
}

impl DefaultRequestBuilder {
    pub fn new(config: ApiConfig) -> Self {
        DefaultRequestBuilder { config }
    }
}

impl RequestBuilding for DefaultRequestBuilder {
    fn make_request(&self, endpoint: &dyn Endpoint) -> Result<HttpRequest, NetworkError> {
        let mut url = self.config.base_url.clone();
        if url.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl);
        }

        // Base path is kept: https://host/3 + /search/movie -> https://host/3/search/movie
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            endpoint.path().trim_start_matches('/')
        );
        url.set_path(&joined);

        let query = endpoint.query();
        let use_key = self.config.api_token.is_empty() && !self.config.api_key.is_empty();
        if !query.is_empty() || use_key {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &query {
                pairs.append_pair(k, v);
            }
            if use_key {
                pairs.append_pair("api_key", &self.config.api_key);
            }
        }

        let mut request = HttpRequest {
            method: endpoint.method(),
            url,
            headers: Vec::new(),
            body: endpoint.body(),
        };

        if !self.config.api_token.is_empty() {
            request.set_header("Authorization", format!("Bearer {}", self.config.api_token));
        }
        request.set_header("Content-Type", "application/json".to_string());
        for (k, v) in endpoint.headers() {
            request.set_header(&k, v);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        headers: Vec<(String, String)>,
    }

    impl Endpoint for Probe {
        fn path(&self) -> String {
            "/search/movie".to_string()
        }

        fn query(&self) -> Vec<(String, String)> {
            vec![
                ("query".to_string(), "blade runner".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        }

        fn headers(&self) -> Vec<(String, String)> {
            self.headers.clone()
        }
    }

    fn builder(token: &str, key: &str) -> DefaultRequestBuilder {
        let mut config = ApiConfig::new("https://api.example.com/3/", "placeholder").unwrap();
        config.api_token = token.to_string();
        config.api_key = key.to_string();
        DefaultRequestBuilder::new(config)
    }

    #[test]
    fn test_path_joins_base_path() {
        let req = builder("tok", "")
            .make_request(&Probe { headers: vec![] })
            .unwrap();
        assert_eq!(req.url.path(), "/3/search/movie");
        assert_eq!(req.url.query(), Some("query=blade+runner&page=2"));
        assert_eq!(req.method, HttpMethod::Get);
    }

    #[test]
    fn test_bearer_and_content_type() {
        let req = builder("tok", "")
            .make_request(&Probe { headers: vec![] })
            .unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
        assert_eq!(req.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_api_key_used_without_token() {
        let req = builder("", "secret")
            .make_request(&Probe { headers: vec![] })
            .unwrap();
        assert!(req.header("Authorization").is_none());
        assert!(req.url.query().unwrap().ends_with("api_key=secret"));
    }

    #[test]
    fn test_endpoint_headers_win() {
        let req = builder("tok", "")
            .make_request(&Probe {
                headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            })
            .unwrap();
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(
            req.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("content-type")).count(),
            1
        );
    }

    #[test]
    fn test_response_header_lookup_ignores_case() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let resp = HttpResponse {
            status: 200,
            headers,
            body: bytes::Bytes::new(),
        };
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        assert!(resp.header("etag").is_none());
    }
}
