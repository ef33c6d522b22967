use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Fee schedule. The server recomputes the same breakdown independently and
// validates the submitted total against it, so the arithmetic here has to
// match to the bit: plain IEEE-754 doubles and half-up rounding.
pub const SERVICE_FEE_RATE: f64 = 0.10;
pub const CLEANING_FEE: f64 = 50.0;
pub const TAX_RATE: f64 = 0.08;

/// Itemized components summing to a booking's total price. Shown to the
/// user before payment and embedded in the booking entity by the server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub nights: u32,
    pub base_price: f64,
    pub service_fee: f64,
    pub cleaning_fee: f64,
    pub taxes: f64,
    pub total: f64,
}

/// Whole nights in the stay; 0 when either date is missing or the range is
/// not positive. Dates are day-resolution, so the whole-day count is exact
/// and needs no ceiling correction.
pub fn nights_between(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> u32 {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => (check_out - check_in).num_days().max(0) as u32,
        _ => 0,
    }
}

// Half-up to the nearest integer currency unit, matching what the server's
// runtime does for positive amounts.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Price a stay of a known night count.
///
/// Zero nights is a valid computation (the total degenerates to the
/// cleaning fee plus taxes on it); callers that gate submission on
/// `nights > 0` do so at the form layer, not here.
pub fn quote(nightly_price: f64, nights: u32) -> PriceBreakdown {
    let base_price = nightly_price * f64::from(nights);
    let service_fee = round_half_up(base_price * SERVICE_FEE_RATE);
    let cleaning_fee = CLEANING_FEE;
    let taxes = round_half_up((base_price + service_fee + cleaning_fee) * TAX_RATE);
    let total = base_price + service_fee + cleaning_fee + taxes;

    PriceBreakdown {
        nights,
        base_price,
        service_fee,
        cleaning_fee,
        taxes,
        total,
    }
}

/// Price a stay given the form's (possibly incomplete) date range.
pub fn quote_stay(
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    nightly_price: f64,
) -> PriceBreakdown {
    quote(nightly_price, nights_between(check_in, check_out))
}
