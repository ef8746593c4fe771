//! Field-shape validation for externally supplied input.
//!
//! Every rule here is a pure predicate on one field; cross-record rules
//! (uniqueness, turn state) live in the repository layer.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// A rejected field, reported to the caller with the offending field name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

fn reject(field: &'static str, message: &'static str) -> Result<(), FieldError> {
    Err(FieldError { field, message })
}

static RE_USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static RE_MOBILE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^09[0-9]{9}$").unwrap());
static RE_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{3}-[0-9]{8}$").unwrap());
static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Usernames are national-code style: exactly 10 ASCII digits.
pub fn username(value: &str) -> Result<(), FieldError> {
    if RE_USERNAME.is_match(value) {
        Ok(())
    } else {
        reject("username", "must be exactly 10 digits")
    }
}

pub fn email(value: &str) -> Result<(), FieldError> {
    if RE_EMAIL.is_match(value) {
        Ok(())
    } else {
        reject("email", "must be a valid email address")
    }
}

/// Mobile numbers: 09 followed by 9 digits.
pub fn mobile_number(value: &str) -> Result<(), FieldError> {
    if RE_MOBILE.is_match(value) {
        Ok(())
    } else {
        reject("mobile_number", "must be 09XXXXXXXXX")
    }
}

/// Landline numbers: XXX-XXXXXXXX.
pub fn phone_number(value: &str) -> Result<(), FieldError> {
    if RE_PHONE.is_match(value) {
        Ok(())
    } else {
        reject("phone_number", "must be XXX-XXXXXXXX")
    }
}

pub fn min_len(
    field: &'static str,
    value: &str,
    min: usize,
    message: &'static str,
) -> Result<(), FieldError> {
    if value.chars().count() >= min {
        Ok(())
    } else {
        reject(field, message)
    }
}

pub fn name(field: &'static str, value: &str) -> Result<(), FieldError> {
    min_len(field, value, 3, "must be at least 3 characters")
}

pub fn address(value: &str) -> Result<(), FieldError> {
    min_len("address", value, 10, "must be at least 10 characters")
}

pub fn speciality(value: &str) -> Result<(), FieldError> {
    min_len("speciality", value, 3, "must be at least 3 characters")
}
