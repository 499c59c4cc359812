//! Network error taxonomy shared by the client, executor and repositories

use serde::Deserialize;
use thiserror::Error;

/// Error payload returned by the API on non-2xx responses
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    pub status_message: String,
    pub status_code: i64,
    #[serde(default)]
    pub success: Option<bool>,
}

/// Errors produced while building, sending or decoding API requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Invalid request URL.")]
    InvalidUrl,

    #[error("No internet connection.")]
    NoInternet,

    #[error("The request timed out.")]
    TimedOut,

    #[error("The request was cancelled.")]
    Cancelled,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{}", server_message(.message, .api_error))]
    Server {
        code: u16,
        message: Option<String>,
        api_error: Option<ApiErrorBody>,
    },

    #[error("Decoding failed: {0}")]
    Decoding(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

fn server_message(message: &Option<String>, api_error: &Option<ApiErrorBody>) -> String {
    api_error
        .as_ref()
        .map(|e| e.status_message.clone())
        .or_else(|| message.clone())
        .unwrap_or_else(|| "Server error".to_string())
}

impl NetworkError {
    /// Turn a non-2xx status into `Server`, decoding the API error body if possible.
    pub fn check_status(status: u16, body: &[u8]) -> Result<(), NetworkError> {
        if (200..=299).contains(&status) {
            return Ok(());
        }
        let api_error = serde_json::from_slice::<ApiErrorBody>(body).ok();
        let message = std::str::from_utf8(body).ok().map(str::to_string);
        Err(NetworkError::Server {
            code: status,
            message,
            api_error,
        })
    }

    /// Map a reqwest transport error onto the taxonomy
    pub fn from_transport(error: &reqwest::Error) -> NetworkError {
        if error.is_timeout() {
            NetworkError::TimedOut
        } else if error.is_connect() {
            NetworkError::NoInternet
        } else if error.is_builder() {
            NetworkError::InvalidUrl
        } else {
            NetworkError::Transport(error.to_string())
        }
    }

    /// Whether cached data may stand in for this error; decoding failures always surface
    pub fn serves_cache(&self) -> bool {
        !matches!(self, NetworkError::Decoding(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range_passes() {
        assert!(NetworkError::check_status(200, b"").is_ok());
        assert!(NetworkError::check_status(299, b"").is_ok());
    }

    #[test]
    fn test_server_error_decodes_api_body() {
        let body = br#"{"status_message":"Invalid API key","status_code":7,"success":false}"#;
        let err = NetworkError::check_status(401, body).unwrap_err();
        match &err {
            NetworkError::Server { code, api_error, message } => {
                assert_eq!(*code, 401);
                assert_eq!(api_error.as_ref().unwrap().status_code, 7);
                assert!(message.as_ref().unwrap().contains("Invalid API key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.to_string(), "Invalid API key");
    }

    #[test]
    fn test_server_error_falls_back_to_raw_body() {
        let err = NetworkError::check_status(500, b"upstream exploded").unwrap_err();
        assert_eq!(err.to_string(), "upstream exploded");

        let err = NetworkError::check_status(502, &[0xff, 0xfe]).unwrap_err();
        assert_eq!(err.to_string(), "Server error");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(NetworkError::InvalidUrl.to_string(), "Invalid request URL.");
        assert_eq!(NetworkError::NoInternet.to_string(), "No internet connection.");
        assert_eq!(NetworkError::TimedOut.to_string(), "The request timed out.");
        assert_eq!(
            NetworkError::Decoding("bad".into()).to_string(),
            "Decoding failed: bad"
        );
    }

    #[test]
    fn test_cache_fallback_classification() {
        assert!(NetworkError::NoInternet.serves_cache());
        assert!(NetworkError::TimedOut.serves_cache());
        assert!(NetworkError::check_status(503, b"upstream down").unwrap_err().serves_cache());
        assert!(!NetworkError::Decoding("expected value".into()).serves_cache());
    }
}
