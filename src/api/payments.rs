use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Ack, ApiClient};
use crate::error::ApiError;
use crate::models::PaymentStatus;

/// Server-issued handle for an authorized-but-unconfirmed charge. The
/// client never inspects the secret; it is passed through to the payment
/// processor's confirmation call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub payment_intent_id: String,
    pub status: PaymentStatus,
}

/// Seam the payment flow talks through; the flow itself never touches the
/// transport directly.
#[async_trait]
pub trait PaymentApi: Send + Sync {
    async fn create_payment_intent(&self, booking_id: &str) -> Result<PaymentIntent, ApiError>;

    /// Report the processor outcome back against the booking.
    async fn record_payment(
        &self,
        booking_id: &str,
        record: &PaymentRecord,
    ) -> Result<(), ApiError>;
}

#[async_trait]
impl PaymentApi for ApiClient {
    async fn create_payment_intent(&self, booking_id: &str) -> Result<PaymentIntent, ApiError> {
        self.http
            .post(
                "/payments/intent",
                &serde_json::json!({ "bookingId": booking_id }),
            )
            .await
    }

    async fn record_payment(
        &self,
        booking_id: &str,
        record: &PaymentRecord,
    ) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .put(&format!("/payments/{booking_id}/status"), record)
            .await?;
        Ok(())
    }
}
