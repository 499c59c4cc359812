use thiserror::Error;

use crate::network::NetworkError;

/// Errors surfaced to the screens. Display strings are the user-facing text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MovieError {
    #[error("Result not found")]
    NotFound,

    #[error("No internet connection. Showing offline data if available.")]
    NoInternet,

    #[error("The request timed out. Please try again.")]
    Timeout,

    #[error("{message}")]
    Server { message: String },

    #[error("Something went wrong.")]
    Unknown,
}

impl From<NetworkError> for MovieError {
    fn from(error: NetworkError) -> Self {
        match error {
            NetworkError::NoInternet | NetworkError::Transport(_) => MovieError::NoInternet,
            NetworkError::TimedOut => MovieError::Timeout,
            NetworkError::Server { code: 404, .. } => MovieError::NotFound,
            NetworkError::Server { api_error, .. } => MovieError::Server {
                message: api_error
                    .map(|e| e.status_message)
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Server error".to_string()),
            },
            NetworkError::InvalidUrl
            | NetworkError::Cancelled
            | NetworkError::Decoding(_)
            | NetworkError::Unknown(_) => MovieError::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let err = NetworkError::check_status(404, b"{}").unwrap_err();
        assert_eq!(MovieError::from(err), MovieError::NotFound);
    }

    #[test]
    fn test_server_message_from_api_body() {
        let body = br#"{"status_message":"Invalid API key: You must be granted a valid key.","status_code":7}"#;
        let err = MovieError::from(NetworkError::check_status(401, body).unwrap_err());
        assert_eq!(err.to_string(), "Invalid API key: You must be granted a valid key.");
    }

    #[test]
    fn test_server_without_body() {
        let err = MovieError::from(NetworkError::check_status(502, b"<html>").unwrap_err());
        assert_eq!(err.to_string(), "Server error");
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            MovieError::from(NetworkError::NoInternet).to_string(),
            "No internet connection. Showing offline data if available."
        );
        assert_eq!(
            MovieError::from(NetworkError::TimedOut).to_string(),
            "The request timed out. Please try again."
        );
        assert_eq!(
            MovieError::from(NetworkError::Decoding("eof".into())).to_string(),
            "Something went wrong."
        );
    }
}
