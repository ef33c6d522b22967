//! In-progress booking input: a single editing state gated by a submit
//! action. Validation short-circuits on the first failure with a
//! user-facing message and never reaches the network; a busy flag keeps a
//! second submission from going out while one is in flight.

use chrono::NaiveDate;
use thiserror::Error;

use crate::api::bookings::{BookingApi, BookingPayload, ContactDetails};
use crate::error::ApiError;
use crate::models::{Booking, GuestCounts, Listing};
use crate::pricing::{self, PriceBreakdown};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select both check-in and check-out dates")]
    MissingDates,

    #[error("Check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,

    #[error("This listing accommodates at most {capacity} guests")]
    TooManyGuests { capacity: u32 },

    #[error("Please fill in all contact details")]
    IncompleteContact,

    #[error("You cannot book your own listing")]
    OwnListing,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("A booking request is already in progress")]
    Busy,
}

#[derive(Debug, Clone)]
pub struct BookingForm {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    in_flight: bool,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            check_in: None,
            check_out: None,
            adults: 1,
            children: 0,
            infants: 0,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            in_flight: false,
        }
    }
}

impl BookingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guest_total(&self) -> u32 {
        self.adults + self.children + self.infants
    }

    pub fn nights(&self) -> u32 {
        pricing::nights_between(self.check_in, self.check_out)
    }

    /// Live price preview for the current date range.
    pub fn quote(&self, listing: &Listing) -> PriceBreakdown {
        pricing::quote_stay(self.check_in, self.check_out, listing.price_per_night)
    }

    /// The submit control stays disabled while a request is out or while
    /// no positive night count can be derived from the dates.
    pub fn can_submit(&self) -> bool {
        !self.in_flight && self.nights() > 0
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Checks run in a fixed order and stop at the first failure.
    pub fn validate(&self, listing: &Listing, viewer_id: &str) -> Result<(), ValidationError> {
        self.validated_payload(listing, viewer_id).map(|_| ())
    }

    fn validated_payload(
        &self,
        listing: &Listing,
        viewer_id: &str,
    ) -> Result<BookingPayload, ValidationError> {
        let (check_in, check_out) = match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => (check_in, check_out),
            _ => return Err(ValidationError::MissingDates),
        };
        if check_out <= check_in {
            return Err(ValidationError::CheckOutNotAfterCheckIn);
        }
        if self.guest_total() > listing.max_guests {
            return Err(ValidationError::TooManyGuests {
                capacity: listing.max_guests,
            });
        }
        let contact = [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
        ];
        if contact.iter().any(|field| field.trim().is_empty()) {
            return Err(ValidationError::IncompleteContact);
        }
        if viewer_id == listing.host_id {
            return Err(ValidationError::OwnListing);
        }

        Ok(BookingPayload {
            listing_id: listing.id.clone(),
            check_in,
            check_out,
            guests: GuestCounts {
                adults: self.adults,
                children: self.children,
                infants: self.infants,
            },
            contact: ContactDetails {
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                email: self.email.trim().to_string(),
                phone: self.phone.trim().to_string(),
            },
        })
    }

    /// Validate and submit. On API failure the form state is untouched so
    /// the user can correct and retry; the caller receives the created
    /// booking on success and hands it to the payment flow.
    pub async fn submit<A: BookingApi>(
        &mut self,
        api: &A,
        listing: &Listing,
        viewer_id: &str,
    ) -> Result<Booking, SubmitError> {
        if self.in_flight {
            return Err(SubmitError::Busy);
        }
        let payload = self.validated_payload(listing, viewer_id)?;

        self.in_flight = true;
        let result = api.create_booking(&payload).await;
        self.in_flight = false;

        Ok(result?)
    }
}
