//! Order contact details.

use serde::{Deserialize, Serialize};

/// Errors that can occur when building an [`OrderContact`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The name is empty or whitespace.
    #[error("name cannot be empty")]
    EmptyName,
    /// The phone number is empty or whitespace.
    #[error("phone cannot be empty")]
    EmptyPhone,
    /// The phone number contains characters other than digits and separators.
    #[error("phone may only contain digits, spaces and + - ( )")]
    InvalidPhone,
    /// The delivery address is empty or whitespace.
    #[error("address cannot be empty")]
    EmptyAddress,
    /// A field is longer than allowed.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field name.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
}

/// Who to deliver an order to.
///
/// ## Constraints
///
/// - `name`, `phone` and `address` are required and stored trimmed
/// - `phone` has at least one digit and otherwise only `+ - ( )` and spaces
/// - every field is at most [`OrderContact::MAX_FIELD_LENGTH`] characters
///
/// ## Examples
///
/// ```
/// use needledrop_core::OrderContact;
///
/// assert!(OrderContact::new("Ann", "+7 (999) 123-45-67", "Main St 1").is_ok());
/// assert!(OrderContact::new("Ann", "call me", "Main St 1").is_err());
/// assert!(OrderContact::new("", "123", "Main St 1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOrderContact")]
pub struct OrderContact {
    name: String,
    phone: String,
    address: String,
}

#[derive(Deserialize)]
struct RawOrderContact {
    name: String,
    phone: String,
    address: String,
}

impl TryFrom<RawOrderContact> for OrderContact {
    type Error = ContactError;

    fn try_from(raw: RawOrderContact) -> Result<Self, Self::Error> {
        Self::new(&raw.name, &raw.phone, &raw.address)
    }
}

impl OrderContact {
    /// Maximum length of any contact field.
    pub const MAX_FIELD_LENGTH: usize = 255;

    /// Validate and build contact details.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is blank or too long, or if the phone
    /// number contains anything other than digits and separators.
    pub fn new(name: &str, phone: &str, address: &str) -> Result<Self, ContactError> {
        let name = required(name, "name", ContactError::EmptyName)?;
        let phone = required(phone, "phone", ContactError::EmptyPhone)?;
        let address = required(address, "address", ContactError::EmptyAddress)?;

        let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' ');
        if !phone.chars().all(allowed) || !phone.chars().any(|c| c.is_ascii_digit()) {
            return Err(ContactError::InvalidPhone);
        }

        Ok(Self {
            name: name.to_owned(),
            phone: phone.to_owned(),
            address: address.to_owned(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

fn required<'a>(
    value: &'a str,
    field: &'static str,
    empty: ContactError,
) -> Result<&'a str, ContactError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(empty);
    }
    if value.chars().count() > OrderContact::MAX_FIELD_LENGTH {
        return Err(ContactError::TooLong {
            field,
            max: OrderContact::MAX_FIELD_LENGTH,
        });
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_fields() {
        let contact = OrderContact::new(" Ann ", " 8 800 555 35 35 ", " Main St 1 ").unwrap();
        assert_eq!(contact.name(), "Ann");
        assert_eq!(contact.phone(), "8 800 555 35 35");
        assert_eq!(contact.address(), "Main St 1");
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(
            OrderContact::new(" ", "123", "x"),
            Err(ContactError::EmptyName)
        );
        assert_eq!(
            OrderContact::new("Ann", "", "x"),
            Err(ContactError::EmptyPhone)
        );
        assert_eq!(
            OrderContact::new("Ann", "123", "\n"),
            Err(ContactError::EmptyAddress)
        );
    }

    #[test]
    fn test_phone_characters() {
        assert!(OrderContact::new("Ann", "+7 (999) 123-45-67", "x").is_ok());
        assert_eq!(
            OrderContact::new("Ann", "123abc", "x"),
            Err(ContactError::InvalidPhone)
        );
        assert_eq!(
            OrderContact::new("Ann", "+ ( ) -", "x"),
            Err(ContactError::InvalidPhone)
        );
    }

    #[test]
    fn test_too_long() {
        let long = "a".repeat(OrderContact::MAX_FIELD_LENGTH + 1);
        assert!(matches!(
            OrderContact::new("Ann", "123", &long),
            Err(ContactError::TooLong {
                field: "address",
                ..
            })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let contact: OrderContact = serde_json::from_str(
            r#"{"name": " Ann ", "phone": "123", "address": "Main St 1"}"#,
        )
        .unwrap();
        assert_eq!(contact.name(), "Ann");

        let err = serde_json::from_str::<OrderContact>(
            r#"{"name": "Ann", "phone": "call me", "address": "Main St 1"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("phone may only contain"));
    }
}
