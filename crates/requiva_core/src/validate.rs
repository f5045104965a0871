//! Order input validation and total computation.

use crate::value::Value;
use thiserror::Error;

/// Why an order input was rejected.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Item name missing or blank.
    #[error("ITEM is required.")]
    MissingItem,

    /// Quantity is not a number.
    #[error("NUMBER OF ITEM must be a number.")]
    QuantityNotANumber,

    /// Quantity is negative.
    #[error("NUMBER OF ITEM must be >= 0.")]
    NegativeQuantity,

    /// Unit price is not a number.
    #[error("AMOUNT PER ITEM must be a number.")]
    PriceNotANumber,

    /// Unit price is negative.
    #[error("AMOUNT PER ITEM must be >= 0.")]
    NegativePrice,

    /// Vendor missing or blank.
    #[error("VENDOR is required.")]
    MissingVendor,
}

/// Validates the required order inputs.
///
/// Checks run in order (item, quantity, price, vendor) and the first
/// failure is returned.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate(
    item: Option<&str>,
    quantity: &Value,
    price: &Value,
    vendor: Option<&str>,
) -> Result<(), ValidationError> {
    if is_blank(item) {
        return Err(ValidationError::MissingItem);
    }

    match quantity.as_number() {
        None => return Err(ValidationError::QuantityNotANumber),
        Some(q) if q < 0.0 => return Err(ValidationError::NegativeQuantity),
        Some(_) => {}
    }

    match price.as_number() {
        None => return Err(ValidationError::PriceNotANumber),
        Some(p) if p < 0.0 => return Err(ValidationError::NegativePrice),
        Some(_) => {}
    }

    if is_blank(vendor) {
        return Err(ValidationError::MissingVendor);
    }

    Ok(())
}

/// Runs [`validate`] and returns an `(ok, message)` pair.
///
/// The message is empty on success.
#[must_use]
pub fn validation_outcome(
    item: Option<&str>,
    quantity: &Value,
    price: &Value,
    vendor: Option<&str>,
) -> (bool, String) {
    match validate(item, quantity, price, vendor) {
        Ok(()) => (true, String::new()),
        Err(e) => (false, e.to_string()),
    }
}

fn is_blank(s: Option<&str>) -> bool {
    s.map_or(true, |s| s.trim().is_empty())
}

/// Computes `TOTAL` as quantity times unit price, rounded to cents.
///
/// Rounding is half-up on the shortest decimal form of the product, so
/// `3 * 19.995` gives `59.99`. Inputs that are not numbers give `0.0`.
#[must_use]
pub fn compute_total(quantity: &Value, price: &Value) -> f64 {
    match (quantity.as_number(), price.as_number()) {
        (Some(q), Some(p)) => {
            let product = q * p;
            if product.is_finite() {
                round_cents(product)
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn round_cents(x: f64) -> f64 {
    let repr = x.abs().to_string();
    let (int_part, frac) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    if frac.len() <= 2 {
        return x;
    }

    let Ok(mut cents) = format!("{int_part}{}", &frac[..2]).parse::<u128>() else {
        return (x * 100.0).round() / 100.0;
    };
    if frac.as_bytes()[2] >= b'5' {
        cents += 1;
    }

    (cents as f64 / 100.0).copysign(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    #[test]
    fn item_required() {
        assert_eq!(
            validation_outcome(Some(""), &n(1.0), &n(1.0), Some("Acme")),
            (false, "ITEM is required.".to_string())
        );
        assert_eq!(
            validate(None, &n(1.0), &n(1.0), Some("Acme")),
            Err(ValidationError::MissingItem)
        );
        assert_eq!(
            validate(Some("   "), &n(1.0), &n(1.0), Some("Acme")),
            Err(ValidationError::MissingItem)
        );
    }

    #[test]
    fn quantity_rules() {
        assert_eq!(
            validation_outcome(Some("Tubes"), &n(-1.0), &n(1.0), Some("Acme")),
            (false, "NUMBER OF ITEM must be >= 0.".to_string())
        );
        assert_eq!(
            validation_outcome(Some("Tubes"), &Value::text("lots"), &n(1.0), Some("Acme")),
            (false, "NUMBER OF ITEM must be a number.".to_string())
        );
        assert_eq!(
            validate(Some("Tubes"), &Value::Null, &n(1.0), Some("Acme")),
            Err(ValidationError::QuantityNotANumber)
        );
    }

    #[test]
    fn price_rules() {
        assert_eq!(
            validate(Some("Tubes"), &n(1.0), &n(-0.5), Some("Acme")),
            Err(ValidationError::NegativePrice)
        );
        assert_eq!(
            validation_outcome(Some("Tubes"), &n(1.0), &Value::text("abc"), Some("Acme")),
            (false, "AMOUNT PER ITEM must be a number.".to_string())
        );
    }

    #[test]
    fn vendor_required() {
        assert_eq!(
            validation_outcome(Some("Tubes"), &n(1.0), &n(1.0), Some("")),
            (false, "VENDOR is required.".to_string())
        );
        assert_eq!(
            validate(Some("Tubes"), &n(1.0), &n(1.0), None),
            Err(ValidationError::MissingVendor)
        );
    }

    #[test]
    fn first_failure_wins() {
        assert_eq!(
            validate(Some(""), &n(-1.0), &n(-1.0), Some("")),
            Err(ValidationError::MissingItem)
        );
        assert_eq!(
            validate(Some("Tubes"), &n(-1.0), &n(-1.0), Some("")),
            Err(ValidationError::NegativeQuantity)
        );
    }

    #[test]
    fn valid_input() {
        assert_eq!(
            validation_outcome(Some("Tubes"), &n(1.0), &n(1.0), Some("Acme")),
            (true, String::new())
        );
        assert!(validate(Some("Tubes"), &n(0.0), &Value::text("0"), Some("Acme")).is_ok());
    }

    #[test]
    fn total_rounds_half_up() {
        assert_eq!(compute_total(&n(3.0), &n(19.995)), 59.99);
        assert_eq!(compute_total(&n(1.0), &n(2.675)), 2.68);
        assert_eq!(compute_total(&n(1.0), &n(1.005)), 1.01);
        assert_eq!(compute_total(&n(2.0), &n(10.0)), 20.0);
        assert_eq!(compute_total(&n(0.1), &n(3.0)), 0.3);
        assert_eq!(compute_total(&n(3.0), &n(1.234)), 3.7);
    }

    #[test]
    fn total_with_text_inputs() {
        assert_eq!(compute_total(&Value::text("x"), &n(5.0)), 0.0);
        assert_eq!(compute_total(&Value::text("4"), &Value::text("2.5")), 10.0);
        assert_eq!(compute_total(&Value::Null, &n(5.0)), 0.0);
    }

    #[test]
    fn total_overflow_is_zero() {
        assert_eq!(compute_total(&n(1.0e308), &n(10.0)), 0.0);
    }
}
