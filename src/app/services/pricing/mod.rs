//! Per-profile price computation
//!
//! A pure function over an owned copy of the base table records:
//! `price_out = round(price_base * factor [* rate], digits[currency])`.
//! The exchange rate is consumed as an opaque float; its floor/fallback
//! contract lives with the rate provider.

use crate::app::models::NormalizedRecord;
use crate::config::{Currency, Rounding};
use tracing::debug;

/// Round half-away-from-zero at `digits` decimal places.
///
/// This is `f64::round` semantics scaled to the digit count: 2.5 at zero
/// digits becomes 3, -2.5 becomes -3. Chosen over half-to-even because
/// displayed prices should round the way customers expect.
pub fn round_to_digits(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round() / scale
}

/// Apply a profile's markup and currency conversion to an owned record set.
///
/// NaN base prices (unparseable feed values) are coerced to zero before the
/// multiplication so they can never inflate into a bogus output price. The
/// rate is consulted only for the non-base currency.
pub fn apply_pricing(
    mut records: Vec<NormalizedRecord>,
    factor: f64,
    currency: Currency,
    rate: f64,
    rounding: &Rounding,
) -> Vec<NormalizedRecord> {
    let digits = rounding.digits_for(currency);
    let conversion = match currency {
        Currency::Eur => 1.0,
        Currency::Uah => rate,
    };

    for record in records.iter_mut() {
        let base = if record.price.is_nan() {
            0.0
        } else {
            record.price
        };
        record.price = round_to_digits(base * factor * conversion, digits);
    }

    debug!(
        count = records.len(),
        factor,
        %currency,
        digits,
        "applied pricing"
    );
    records
}
