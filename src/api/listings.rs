use chrono::NaiveDate;
use serde::Serialize;

use super::{Ack, ApiClient};
use crate::error::ApiError;
use crate::models::{Listing, ListingImage, Location, Paginated};

/// Search filters; unset fields are left out of the query string.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Comma-separated tag list, e.g. `wifi,pool`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Host-editable subset of a listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub title: String,
    pub description: Option<String>,
    pub price_per_night: f64,
    pub max_guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub amenities: Vec<String>,
    pub location: Location,
    pub images: Vec<ListingImage>,
}

impl ApiClient {
    pub async fn search_listings(
        &self,
        filter: &ListingSearch,
    ) -> Result<Paginated<Listing>, ApiError> {
        self.http.get_query("/listings", filter).await
    }

    pub async fn listing(&self, id: &str) -> Result<Listing, ApiError> {
        self.http.get(&format!("/listings/{id}")).await
    }

    pub async fn create_listing(&self, draft: &ListingDraft) -> Result<Listing, ApiError> {
        self.http.post("/listings", draft).await
    }

    pub async fn update_listing(&self, id: &str, draft: &ListingDraft) -> Result<Listing, ApiError> {
        self.http.put(&format!("/listings/{id}"), draft).await
    }

    pub async fn delete_listing(&self, id: &str) -> Result<(), ApiError> {
        let _: Ack = self.http.delete(&format!("/listings/{id}")).await?;
        Ok(())
    }

    /// The signed-in host's own listings.
    pub async fn host_listings(&self) -> Result<Vec<Listing>, ApiError> {
        self.http.get("/listings/host/mine").await
    }
}
