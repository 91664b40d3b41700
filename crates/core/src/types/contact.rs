//! Phone number and postal code types used by checkout and order tracking.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing contact details.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// Phone number is not exactly 10 ASCII digits.
    #[error("phone number must be exactly {expected} digits")]
    InvalidPhone {
        /// Required digit count.
        expected: usize,
    },
    /// PIN code is not exactly 6 ASCII digits.
    #[error("PIN code must be exactly {expected} digits")]
    InvalidPinCode {
        /// Required digit count.
        expected: usize,
    },
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// A 10-digit Indian mobile number, without country code or separators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Number of digits in a phone number.
    pub const DIGITS: usize = 10;

    /// Parse a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidPhone`] unless the input is exactly ten
    /// ASCII digits.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        if is_digits(s, Self::DIGITS) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ContactError::InvalidPhone {
                expected: Self::DIGITS,
            })
        }
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 6-digit Indian postal index number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PinCode(String);

impl PinCode {
    /// Number of digits in a PIN code.
    pub const DIGITS: usize = 6;

    /// Parse a PIN code.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidPinCode`] unless the input is exactly six
    /// ASCII digits.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        if is_digits(s, Self::DIGITS) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ContactError::InvalidPinCode {
                expected: Self::DIGITS,
            })
        }
    }

    /// Returns the PIN code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_number() {
        assert!(PhoneNumber::parse("9876543210").is_ok());
        assert!(PhoneNumber::parse("987654321").is_err());
        assert!(PhoneNumber::parse("98765432101").is_err());
        assert!(PhoneNumber::parse("98765-4321").is_err());
        assert!(PhoneNumber::parse("+919876543210").is_err());
        // Non-ASCII digits are rejected even if the count matches
        assert!(PhoneNumber::parse("٩٨٧٦٥٤٣٢١٠").is_err());
    }

    #[test]
    fn test_pin_code() {
        assert!(PinCode::parse("400001").is_ok());
        assert!(PinCode::parse("40001").is_err());
        assert!(PinCode::parse("4000011").is_err());
        assert!(PinCode::parse("40000a").is_err());
    }
}
