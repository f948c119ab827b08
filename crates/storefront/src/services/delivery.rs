//! Delivery-fee resolution from the selected governorate.
//!
//! The fee table is static and keyed by governorate names in both Arabic
//! and English, because the checkout form historically submitted either
//! depending on the active locale. Input is trimmed and case-folded before
//! the lookup so "cairo" and " Giza " resolve like their canonical forms
//! instead of silently falling back to the default fee.

use etar_core::Price;

/// Flat fee in EGP for governorates not in the table.
pub const DEFAULT_DELIVERY_FEE: u32 = 80;

/// Known governorate fees in EGP, keyed by lowercase name.
const FEES: &[(&str, u32)] = &[
    ("alexandria", 60),
    ("الإسكندرية", 60),
    ("cairo", 75),
    ("القاهرة", 75),
    ("giza", 75),
    ("الجيزة", 75),
];

/// Resolve the flat delivery fee for a governorate name in either
/// language. Unknown names fall back to [`DEFAULT_DELIVERY_FEE`].
#[must_use]
pub fn resolve_fee(governorate: &str) -> u32 {
    let key = governorate.trim().to_lowercase();
    FEES.iter()
        .find(|(name, _)| *name == key)
        .map_or(DEFAULT_DELIVERY_FEE, |&(_, fee)| fee)
}

/// [`resolve_fee`] as a [`Price`], for the order insert payload.
#[must_use]
pub fn resolve_fee_price(governorate: &str) -> Price {
    Price::from_pounds(resolve_fee(governorate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_governorates_english() {
        assert_eq!(resolve_fee("Cairo"), 75);
        assert_eq!(resolve_fee("Alexandria"), 60);
        assert_eq!(resolve_fee("Giza"), 75);
    }

    #[test]
    fn test_known_governorates_arabic() {
        assert_eq!(resolve_fee("القاهرة"), 75);
        assert_eq!(resolve_fee("الإسكندرية"), 60);
        assert_eq!(resolve_fee("الجيزة"), 75);
    }

    #[test]
    fn test_unknown_governorate_default() {
        assert_eq!(resolve_fee("Unknown"), DEFAULT_DELIVERY_FEE);
        assert_eq!(resolve_fee("Aswan"), 80);
        assert_eq!(resolve_fee(""), 80);
    }

    #[test]
    fn test_lookup_is_normalized() {
        // Case and surrounding whitespace must not change the fee.
        assert_eq!(resolve_fee("cairo"), 75);
        assert_eq!(resolve_fee("ALEXANDRIA"), 60);
        assert_eq!(resolve_fee(" Giza "), 75);
    }

    #[test]
    fn test_fee_as_price() {
        assert_eq!(resolve_fee_price("Cairo"), Price::from_pounds(75));
        assert_eq!(resolve_fee_price("Other"), Price::from_pounds(80));
    }
}
