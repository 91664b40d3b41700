//! Customer details entered at the first checkout step.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use verse_core::{Email, PhoneNumber, PinCode};

/// Shipping and contact details as entered by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// A checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    Email,
    Phone,
    Address,
    City,
    State,
    PinCode,
}

impl Field {
    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Address => "Address",
            Self::City => "City",
            Self::State => "State",
            Self::PinCode => "PIN code",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every problem found in a set of [`CustomerDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_field_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Whether `field` was rejected.
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl CustomerDetails {
    /// Check every field, collecting all failures.
    ///
    /// Required fields must be non-blank, the email must look like
    /// `name@domain.tld`, the phone must be 10 digits and the PIN code 6.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing each rejected field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        let mut reject = |field, message: String| errors.push(FieldError { field, message });

        for (field, value) in [
            (Field::FullName, &self.full_name),
            (Field::Address, &self.address),
            (Field::City, &self.city),
            (Field::State, &self.state),
        ] {
            if value.trim().is_empty() {
                reject(field, "is required".to_string());
            }
        }

        if self.email.trim().is_empty() {
            reject(Field::Email, "is required".to_string());
        } else if let Err(e) = Email::parse(self.email.trim()) {
            reject(Field::Email, e.to_string());
        }

        if self.phone.trim().is_empty() {
            reject(Field::Phone, "is required".to_string());
        } else if let Err(e) = PhoneNumber::parse(self.phone.trim()) {
            reject(Field::Phone, e.to_string());
        }

        if self.pincode.trim().is_empty() {
            reject(Field::PinCode, "is required".to_string());
        } else if let Err(e) = PinCode::parse(self.pincode.trim()) {
            reject(Field::PinCode, e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            pincode: self.pincode.trim().to_string(),
        }
    }
}
