//! Light client-side derivations for the detail views: eligibility
//! checks, aggregate figures, formatting. Pure functions over fetched
//! entities; no presentation markup lives here.

use chrono::NaiveDate;
use futures::join;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Booking, BookingStatus, Listing, Review};

/// A booking can still be called off while it is upcoming and not already
/// terminal.
pub fn can_cancel(booking: &Booking, today: NaiveDate) -> bool {
    matches!(
        booking.status,
        BookingStatus::Pending | BookingStatus::Confirmed
    ) && booking.check_in > today
}

/// Only the guest of a completed stay may review it, once.
pub fn can_review(booking: &Booking, viewer_id: &str, existing_reviews: &[Review]) -> bool {
    booking.status == BookingStatus::Completed
        && booking.guest_id == viewer_id
        && !existing_reviews
            .iter()
            .any(|review| review.booking_id == booking.id)
}

pub fn found_helpful_by(review: &Review, user_id: &str) -> bool {
    review.helpful_votes.contains(user_id)
}

/// Mean of each category across a listing's reviews; `None` with no
/// reviews rather than a misleading zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryAverages {
    pub cleanliness: f64,
    pub accuracy: f64,
    pub check_in: f64,
    pub communication: f64,
    pub location: f64,
    pub value: f64,
}

pub fn category_averages(reviews: &[Review]) -> Option<CategoryAverages> {
    if reviews.is_empty() {
        return None;
    }
    let count = reviews.len() as f64;
    let mean = |extract: fn(&Review) -> u8| {
        reviews.iter().map(|r| f64::from(extract(r))).sum::<f64>() / count
    };
    Some(CategoryAverages {
        cleanliness: mean(|r| r.categories.cleanliness),
        accuracy: mean(|r| r.categories.accuracy),
        check_in: mean(|r| r.categories.check_in),
        communication: mean(|r| r.categories.communication),
        location: mean(|r| r.categories.location),
        value: mean(|r| r.categories.value),
    })
}

pub fn format_money(amount: f64) -> String {
    if amount == amount.trunc() {
        format!("${amount:.0}")
    } else {
        format!("${amount:.2}")
    }
}

pub fn format_stay_range(check_in: NaiveDate, check_out: NaiveDate) -> String {
    format!(
        "{} to {}",
        check_in.format("%-d %b %Y"),
        check_out.format("%-d %b %Y")
    )
}

/// Listing detail view state. The two fetches are independent: each slot
/// reflects only its own outcome, so a wishlist failure never hides the
/// listing (and vice versa).
#[derive(Debug)]
pub struct ListingDetailView {
    pub listing: Result<Listing, ApiError>,
    /// `None` when signed out or when the status fetch failed.
    pub wishlisted: Option<bool>,
}

pub async fn load_listing_detail(api: &ApiClient, listing_id: &str) -> ListingDetailView {
    let (listing, wishlist) = join!(api.listing(listing_id), api.wishlist_status(listing_id));
    ListingDetailView {
        listing,
        wishlisted: wishlist.ok().map(|status| status.saved),
    }
}
