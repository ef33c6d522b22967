// Client library for the StayNest rental marketplace REST API.

// The remote API owns all business rules; this crate is the typed access
// layer plus the small amount of client-side computation the booking and
// payment views need.
pub mod api;
pub mod booking_form;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod payment;
pub mod pricing;
pub mod session;
pub mod view_state;
pub mod views;

// Re-export key types for convenience
pub use api::{ApiClient, BookingApi, PaymentApi};
pub use booking_form::{BookingForm, SubmitError, ValidationError};
pub use config::ClientConfig;
pub use error::ApiError;
pub use payment::{
    BillingDetails, CardDetails, ConfirmOutcome, PaymentConfirmation, PaymentForm, PaymentProcessor,
};
pub use pricing::{quote, quote_stay, PriceBreakdown};
pub use session::{SessionEvent, SessionStore, StoredSession, TokenStore};
