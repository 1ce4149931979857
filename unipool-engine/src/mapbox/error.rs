//! Mapbox client error types.

use std::fmt;

/// Errors from the Mapbox HTTP client.
#[derive(Debug)]
pub enum MapboxError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    Api { status: u16, message: String },

    /// Directions found no route between the requested points
    NoRoute,

    /// Rate limited by the API
    RateLimited,

    /// Invalid access token or unauthorized
    Unauthorized,
}

impl fmt::Display for MapboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapboxError::Http(e) => write!(f, "HTTP error: {e}"),
            MapboxError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            MapboxError::Api { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            MapboxError::NoRoute => write!(f, "no route between the requested points"),
            MapboxError::RateLimited => write!(f, "rate limited by Mapbox API"),
            MapboxError::Unauthorized => write!(f, "unauthorized (invalid access token)"),
        }
    }
}

impl std::error::Error for MapboxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapboxError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MapboxError {
    fn from(err: reqwest::Error) -> Self {
        MapboxError::Http(err)
    }
}
