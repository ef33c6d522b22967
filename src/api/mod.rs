//! One call per remote operation, grouped by resource. Each call attaches
//! the bearer token when present, runs under the fixed timeout, and maps
//! failures through the shared transport layer; nothing here retries.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod listings;
pub mod messages;
pub mod payments;
pub mod reviews;
pub mod users;
pub mod wishlist;

use std::sync::Arc;

use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::session::SessionStore;

pub use bookings::BookingApi;
pub use payments::PaymentApi;

/// Acknowledgement body for operations with no meaningful payload.
#[derive(Debug, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

pub struct ApiClient {
    pub(crate) http: HttpClient,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpClient::new(config, Arc::clone(&session))?,
            session,
        })
    }

    /// Build a client with a fresh in-memory session, for callers that do
    /// not need persistence across runs.
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config, Arc::new(SessionStore::in_memory()))
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}
