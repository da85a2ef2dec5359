//! Field checks for the checkout form.

use crate::model::CustomerInfo;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::LazyLock;

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,11}$").expect("phone pattern compiles"));

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckoutField {
    FullName,
    Phone,
    Address,
    Email,
}

impl Display for CheckoutField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CheckoutField::FullName => "fullName",
            CheckoutField::Phone => "phone",
            CheckoutField::Address => "address",
            CheckoutField::Email => "email",
        })
    }
}

/// Field → message, one per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<CheckoutField, String>);

impl FieldErrors {
    pub fn get(&self, field: CheckoutField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = CheckoutField> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn add(&mut self, field: CheckoutField, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Checks every field and reports all failures at once.
pub fn validate_customer(info: &CustomerInfo) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if info.full_name.trim().is_empty() {
        errors.add(CheckoutField::FullName, "full name is required");
    }
    if info.address.trim().is_empty() {
        errors.add(CheckoutField::Address, "address is required");
    }

    let phone = info.phone.trim();
    if phone.is_empty() {
        errors.add(CheckoutField::Phone, "phone is required");
    } else if !PHONE.is_match(phone) {
        errors.add(CheckoutField::Phone, "phone must be 10 or 11 digits");
    }

    let email = info.email.trim();
    if email.is_empty() {
        errors.add(CheckoutField::Email, "email is required");
    } else if !EMAIL.is_match(email) {
        errors.add(CheckoutField::Email, "email is not a valid address");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CustomerInfo {
        CustomerInfo {
            full_name: "Le Van C".into(),
            phone: "0912345678".into(),
            address: "99 Nguyen Hue, Q1, TP HCM".into(),
            email: "c@example.vn".into(),
            notes: Some("Call before delivery".into()),
        }
    }

    #[test]
    fn test_valid_customer_passes() {
        assert_eq!(validate_customer(&valid()), Ok(()));
        let eleven = CustomerInfo {
            phone: " 01234567890 ".into(),
            ..valid()
        };
        assert_eq!(validate_customer(&eleven), Ok(()));
    }

    #[test]
    fn test_phone_must_be_10_or_11_digits() {
        for phone in ["091234567", "091234567890", "0912-345-678", "+84912345678"] {
            let info = CustomerInfo {
                phone: phone.into(),
                ..valid()
            };
            let errors = validate_customer(&info).unwrap_err();
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec![CheckoutField::Phone]);
        }
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let info = CustomerInfo {
            full_name: "   ".into(),
            phone: String::new(),
            address: String::new(),
            email: "not-an-email".into(),
            notes: None,
        };
        let errors = validate_customer(&info).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(CheckoutField::Email), Some("email is not a valid address"));
        assert!(errors.to_string().starts_with("fullName: full name is required"));
    }
}
