//! Network layer (Core) - API requests, poster images and connectivity
//!
//! The Network actor receives commands from the App layer, runs them on the
//! Tokio runtime and sends back responses.

pub mod actor;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod image;
pub mod monitor;
pub mod request;

pub use actor::{NetworkActor, Services};
pub use client::{HttpClient, ReqwestHttpClient};
pub use config::ApiConfig;
pub use endpoint::{Endpoint, HttpMethod};
pub use error::{ApiErrorBody, NetworkError};
pub use executor::RequestExecutor;
pub use image::{CachePolicy, ImageError, ImageLoader, ImageOptions, ImageResponse};
pub use request::{DefaultRequestBuilder, HttpRequest, HttpResponse, RequestBuilding};

use crate::constants::PROJECT_VERSION_NUMBER;

/// Core layer version number
pub const VERSION_NUMBER: f64 = PROJECT_VERSION_NUMBER;

/// Core layer version string
pub const VERSION_STRING: &str = concat!("MarqueeCore-", env!("CARGO_PKG_VERSION"));
