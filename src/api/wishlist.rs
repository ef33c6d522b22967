use serde::Deserialize;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::Listing;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WishlistStatus {
    pub saved: bool,
}

impl ApiClient {
    pub async fn wishlist(&self) -> Result<Vec<Listing>, ApiError> {
        self.http.get("/wishlist").await
    }

    /// Whether the signed-in user has saved this listing. Fetched
    /// independently of the listing itself on the detail view.
    pub async fn wishlist_status(&self, listing_id: &str) -> Result<WishlistStatus, ApiError> {
        self.http.get(&format!("/wishlist/{listing_id}")).await
    }

    pub async fn toggle_wishlist(&self, listing_id: &str) -> Result<WishlistStatus, ApiError> {
        self.http
            .post(
                &format!("/wishlist/{listing_id}"),
                &serde_json::json!({}),
            )
            .await
    }
}
