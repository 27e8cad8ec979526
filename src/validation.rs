//! Input validation rules shared by forms and API payloads.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;

/// Inclusive length bounds, counted in characters.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LengthRule {
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ValidationRules {
    pub password: LengthRule,
    pub email_max_length: usize,
    pub name: LengthRule,
    pub phone_pattern: &'static str,
    pub slug_pattern: &'static str,
    pub sku_pattern: &'static str,
}

pub const VALIDATION: ValidationRules = ValidationRules {
    password: LengthRule { min: 8, max: 128 },
    email_max_length: 320,
    name: LengthRule { min: 2, max: 100 },
    // Vietnamese mobile numbers, with or without the +84 country code.
    phone_pattern: r"^(\+84|84|0)[3|5|7|8|9][0-9]{8}$",
    slug_pattern: r"^[a-z0-9]+(?:-[a-z0-9]+)*$",
    sku_pattern: r"^[A-Z0-9]{3,20}$",
};

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VALIDATION.phone_pattern).expect("phone pattern compiles"));
static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VALIDATION.slug_pattern).expect("slug pattern compiles"));
static SKU: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VALIDATION.sku_pattern).expect("sku pattern compiles"));

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} has an invalid format")]
    InvalidFormat { field: &'static str },
}

fn check_length(field: &'static str, value: &str, rule: LengthRule) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < rule.min {
        return Err(ValidationError::TooShort {
            field,
            min: rule.min,
        });
    }
    if len > rule.max {
        return Err(ValidationError::TooLong {
            field,
            max: rule.max,
        });
    }
    Ok(())
}

fn check_pattern(field: &'static str, value: &str, pattern: &Regex) -> Result<(), ValidationError> {
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat { field })
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    check_length("password", password, VALIDATION.password)
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required { field: "email" });
    }
    if email.chars().count() > VALIDATION.email_max_length {
        return Err(ValidationError::TooLong {
            field: "email",
            max: VALIDATION.email_max_length,
        });
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidFormat { field: "email" }),
    }
}

pub fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    check_length(field, name.trim(), VALIDATION.name)
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    check_pattern("phone", phone, &PHONE)
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    check_pattern("slug", slug, &SLUG)
}

pub fn validate_sku(sku: &str) -> Result<(), ValidationError> {
    check_pattern("sku", sku, &SKU)
}
