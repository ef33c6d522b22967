use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::PriceBreakdown;

// Entities as the REST API ships them. The client never owns these; every
// copy is transient view state, re-fetched on navigation or after a
// mutation. Server-optional data is modelled as Option / serde defaults so
// normalization happens here, once, instead of at every call site.

/// Gates which views render; enforces nothing that matters for security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Host,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub country: String,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Images keep their server order; the first one is the cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingImage {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    pub average: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_per_night: f64,
    pub max_guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub location: Location,
    #[serde(default)]
    pub images: Vec<ListingImage>,
    #[serde(default)]
    pub rating: Rating,
    pub host_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestCounts {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl GuestCounts {
    pub fn total(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cancellation {
    pub reason: String,
    pub cancelled_at: DateTime<Utc>,
    pub refund_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub listing_id: String,
    pub guest_id: String,
    pub host_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: GuestCounts,
    pub pricing: PriceBreakdown,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub cancellation: Option<Cancellation>,
    pub created_at: DateTime<Utc>,
}

/// The six per-category scores, each 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRatings {
    pub cleanliness: u8,
    pub accuracy: u8,
    pub check_in: u8,
    pub communication: u8,
    pub location: u8,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostResponse {
    pub body: String,
    pub responded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub listing_id: String,
    pub booking_id: String,
    pub user_id: String,
    pub rating: u8,
    pub categories: CategoryRatings,
    pub title: String,
    pub comment: String,
    #[serde(default)]
    pub host_response: Option<HostResponse>,
    #[serde(default)]
    pub helpful_votes: HashSet<String>,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub participants: Vec<String>,
    #[serde(default)]
    pub listing_id: Option<String>,
    #[serde(default)]
    pub last_message: Option<Message>,
    pub updated_at: DateTime<Utc>,
}

/// Host dashboard summary, computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSummary {
    pub total_earnings: f64,
    pub upcoming_bookings: u32,
    pub occupancy_rate: f64,
    pub average_rating: f64,
    pub listings_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}
