use thiserror::Error;

/// Fallback shown when the server gives us nothing usable.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

// Error types shared by every API call. Validation and payment errors live
// next to their components; this is the cross-cutting transport taxonomy.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Your session has expired. Please sign in again.")]
    Unauthorized,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for showing directly in a notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) | ApiError::Decode(_) => {
                GENERIC_ERROR.to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }
}
