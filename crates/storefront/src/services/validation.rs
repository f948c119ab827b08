//! Pure validation rules for user-entered form data.
//!
//! Every check is a side-effect-free predicate over the raw field values.
//! Validation is fail-fast: each function returns the **first** failing
//! field and leaves the rest unchecked, which is what the flash-message UI
//! can display. Running the same check twice on identical input always
//! yields the same result.

use thiserror::Error;

use etar_core::{FrameSize, FrameType};

use crate::supabase::types::Address;

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Required field is empty or unselected.
    Required,
    /// Value does not match the expected shape.
    InvalidFormat,
    /// Numeric value outside the allowed range.
    InvalidRange,
}

/// The first field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {kind:?}")]
pub struct FieldError {
    /// Form field name.
    pub field: &'static str,
    /// Failure category.
    pub kind: FieldErrorKind,
}

impl FieldError {
    const fn new(field: &'static str, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }

    /// Stable code carried through redirect query strings and mapped to a
    /// localized flash message at render time.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match (self.field, self.kind) {
            ("phone1", _) => "phone1_invalid",
            ("phone2", _) => "phone2_invalid",
            ("governorate", _) => "governorate_required",
            ("city", _) => "city_required",
            ("street", _) => "street_required",
            ("size", _) => "size_required",
            ("frame_type", _) => "frame_type_required",
            ("quantity", _) => "quantity_invalid",
            _ => "invalid_input",
        }
    }
}

/// Raw checkout address fields, exactly as submitted.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct AddressForm {
    pub governorate: String,
    pub city: String,
    pub street: String,
    pub postal_code: String,
}

/// Raw custom-order fields, exactly as submitted.
#[derive(Debug, Clone, Default)]
pub struct CustomOrderForm {
    pub size: String,
    pub frame_type: String,
    pub notes: String,
    pub quantity: u32,
    pub led_option: bool,
}

/// Validated custom-order selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomOrderSpec {
    pub size: FrameSize,
    pub frame_type: FrameType,
    pub notes: Option<String>,
    pub quantity: u32,
    pub led_option: bool,
}

/// Validate an Egyptian mobile number: exactly 11 ASCII digits starting
/// with `01`.
///
/// # Errors
///
/// Returns `InvalidFormat` for anything else, including shorter/longer
/// strings and non-digit characters.
pub fn validate_phone(field: &'static str, phone: &str) -> Result<(), FieldError> {
    let ok = phone.len() == 11
        && phone.starts_with("01")
        && phone.bytes().all(|b| b.is_ascii_digit());

    if ok {
        Ok(())
    } else {
        Err(FieldError::new(field, FieldErrorKind::InvalidFormat))
    }
}

/// Validate the checkout address: governorate, city, and street must be
/// non-blank; postal code is always optional.
///
/// # Errors
///
/// Returns `Required` for the first blank field, in form order.
pub fn validate_address(form: &AddressForm) -> Result<Address, FieldError> {
    let governorate = form.governorate.trim();
    if governorate.is_empty() {
        return Err(FieldError::new("governorate", FieldErrorKind::Required));
    }

    let city = form.city.trim();
    if city.is_empty() {
        return Err(FieldError::new("city", FieldErrorKind::Required));
    }

    let street = form.street.trim();
    if street.is_empty() {
        return Err(FieldError::new("street", FieldErrorKind::Required));
    }

    let postal_code = form.postal_code.trim();

    Ok(Address {
        governorate: governorate.to_owned(),
        city: city.to_owned(),
        street: street.to_owned(),
        postal_code: if postal_code.is_empty() {
            None
        } else {
            Some(postal_code.to_owned())
        },
    })
}

/// Validate the custom-order selection: size and frame type must parse to
/// known variants, quantity must be at least 1.
///
/// # Errors
///
/// Returns the first failure in form order: size, frame type, quantity.
pub fn validate_custom_order(form: &CustomOrderForm) -> Result<CustomOrderSpec, FieldError> {
    let size: FrameSize = form
        .size
        .parse()
        .map_err(|_| FieldError::new("size", FieldErrorKind::Required))?;

    let frame_type: FrameType = form
        .frame_type
        .parse()
        .map_err(|_| FieldError::new("frame_type", FieldErrorKind::Required))?;

    if form.quantity < 1 {
        return Err(FieldError::new("quantity", FieldErrorKind::InvalidRange));
    }

    let notes = form.notes.trim();

    Ok(CustomOrderSpec {
        size,
        frame_type,
        notes: if notes.is_empty() {
            None
        } else {
            Some(notes.to_owned())
        },
        quantity: form.quantity,
        led_option: form.led_option,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_valid() {
        assert!(validate_phone("phone1", "01012345678").is_ok());
        assert!(validate_phone("phone1", "01598765432").is_ok());
    }

    #[test]
    fn test_phone_too_short() {
        // 10 digits
        let err = validate_phone("phone1", "0101234567").unwrap_err();
        assert_eq!(err.kind, FieldErrorKind::InvalidFormat);
    }

    #[test]
    fn test_phone_wrong_prefix() {
        assert!(validate_phone("phone1", "11012345678").is_err());
        assert!(validate_phone("phone1", "00012345678").is_err());
    }

    #[test]
    fn test_phone_non_digits() {
        assert!(validate_phone("phone1", "0101234567a").is_err());
        assert!(validate_phone("phone1", "٠١٠١٢٣٤٥٦٧٨").is_err());
    }

    #[test]
    fn test_phone_is_idempotent() {
        let first = validate_phone("phone2", "0101234567");
        let second = validate_phone("phone2", "0101234567");
        assert_eq!(first, second);
    }

    fn full_address() -> AddressForm {
        AddressForm {
            governorate: "Giza".to_string(),
            city: "Dokki".to_string(),
            street: "12 Tahrir St".to_string(),
            postal_code: String::new(),
        }
    }

    #[test]
    fn test_address_valid_without_postal_code() {
        let address = validate_address(&full_address()).unwrap();
        assert_eq!(address.governorate, "Giza");
        assert_eq!(address.postal_code, None);
    }

    #[test]
    fn test_address_first_failure_wins() {
        // Both governorate and city blank: governorate is reported.
        let form = AddressForm {
            governorate: "  ".to_string(),
            city: String::new(),
            ..full_address()
        };
        let err = validate_address(&form).unwrap_err();
        assert_eq!(err.field, "governorate");
        assert_eq!(err.kind, FieldErrorKind::Required);
    }

    #[test]
    fn test_address_blank_street() {
        let form = AddressForm {
            street: " \t".to_string(),
            ..full_address()
        };
        assert_eq!(validate_address(&form).unwrap_err().field, "street");
    }

    #[test]
    fn test_address_trims_fields() {
        let form = AddressForm {
            city: "  Dokki  ".to_string(),
            postal_code: " 12511 ".to_string(),
            ..full_address()
        };
        let address = validate_address(&form).unwrap();
        assert_eq!(address.city, "Dokki");
        assert_eq!(address.postal_code.as_deref(), Some("12511"));
    }

    fn full_custom_order() -> CustomOrderForm {
        CustomOrderForm {
            size: "medium".to_string(),
            frame_type: "wood".to_string(),
            notes: String::new(),
            quantity: 1,
            led_option: true,
        }
    }

    #[test]
    fn test_custom_order_valid() {
        let spec = validate_custom_order(&full_custom_order()).unwrap();
        assert_eq!(spec.size, FrameSize::Medium);
        assert_eq!(spec.frame_type, FrameType::Wood);
        assert_eq!(spec.notes, None);
        assert!(spec.led_option);
    }

    #[test]
    fn test_custom_order_unselected_size() {
        let form = CustomOrderForm {
            size: String::new(),
            ..full_custom_order()
        };
        let err = validate_custom_order(&form).unwrap_err();
        assert_eq!(err.field, "size");
        assert_eq!(err.kind, FieldErrorKind::Required);
    }

    #[test]
    fn test_custom_order_unknown_frame_type() {
        let form = CustomOrderForm {
            frame_type: "glass".to_string(),
            ..full_custom_order()
        };
        assert_eq!(
            validate_custom_order(&form).unwrap_err().field,
            "frame_type"
        );
    }

    #[test]
    fn test_custom_order_zero_quantity() {
        let form = CustomOrderForm {
            quantity: 0,
            ..full_custom_order()
        };
        let err = validate_custom_order(&form).unwrap_err();
        assert_eq!(err.kind, FieldErrorKind::InvalidRange);
        assert_eq!(err.code(), "quantity_invalid");
    }

    #[test]
    fn test_size_failure_reported_before_quantity() {
        let form = CustomOrderForm {
            size: String::new(),
            quantity: 0,
            ..full_custom_order()
        };
        assert_eq!(validate_custom_order(&form).unwrap_err().field, "size");
    }
}
