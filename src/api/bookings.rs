use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Booking, GuestCounts};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Everything the booking form submits, already validated client-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub listing_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: GuestCounts,
    pub contact: ContactDetails,
}

/// Seam the booking form submits through, so the form logic can be
/// exercised against a scripted double.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn create_booking(&self, payload: &BookingPayload) -> Result<Booking, ApiError>;
}

#[async_trait]
impl BookingApi for ApiClient {
    async fn create_booking(&self, payload: &BookingPayload) -> Result<Booking, ApiError> {
        self.http.post("/bookings", payload).await
    }
}

impl ApiClient {
    pub async fn booking(&self, id: &str) -> Result<Booking, ApiError> {
        self.http.get(&format!("/bookings/{id}")).await
    }

    /// Stays the signed-in user booked as a guest.
    pub async fn guest_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.http.get("/bookings/guest").await
    }

    /// Bookings against the signed-in host's listings.
    pub async fn host_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.http.get("/bookings/host").await
    }

    pub async fn cancel_booking(&self, id: &str, reason: &str) -> Result<Booking, ApiError> {
        self.http
            .put(
                &format!("/bookings/{id}/cancel"),
                &serde_json::json!({ "reason": reason }),
            )
            .await
    }
}
