use serde::Serialize;

use super::{Ack, ApiClient};
use crate::error::ApiError;
use crate::models::{CategoryRatings, Review};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub listing_id: String,
    pub booking_id: String,
    pub rating: u8,
    pub categories: CategoryRatings,
    pub title: String,
    pub comment: String,
}

impl ApiClient {
    pub async fn listing_reviews(&self, listing_id: &str) -> Result<Vec<Review>, ApiError> {
        self.http.get(&format!("/reviews/listing/{listing_id}")).await
    }

    pub async fn create_review(&self, draft: &ReviewDraft) -> Result<Review, ApiError> {
        self.http.post("/reviews", draft).await
    }

    /// Host reply shown under the review.
    pub async fn respond_to_review(&self, review_id: &str, body: &str) -> Result<Review, ApiError> {
        self.http
            .put(
                &format!("/reviews/{review_id}/response"),
                &serde_json::json!({ "body": body }),
            )
            .await
    }

    /// Adds or removes the signed-in user's helpful vote; the server
    /// returns the review with the updated vote set.
    pub async fn toggle_helpful(&self, review_id: &str) -> Result<Review, ApiError> {
        self.http
            .put(&format!("/reviews/{review_id}/helpful"), &serde_json::json!({}))
            .await
    }

    pub async fn delete_review(&self, review_id: &str) -> Result<(), ApiError> {
        let _: Ack = self.http.delete(&format!("/reviews/{review_id}")).await?;
        Ok(())
    }
}
