//! Common validation utilities for visit requests.

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum length of a visitor name.
const MAX_VISITOR_NAME_LEN: usize = 100;

/// Maximum length of a visit purpose.
const MAX_PURPOSE_LEN: usize = 200;

/// Maximum days into the future an expected date may lie.
const MAX_EXPECTED_DATE_AHEAD_DAYS: i64 = 365;

lazy_static! {
    /// Loose international phone format: optional +, digits, separators.
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").unwrap();
}

/// Validates a visitor name: non-blank, bounded length.
pub fn validate_visitor_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("visitor_name_blank");
        err.message = Some("Visitor name must not be blank".into());
        return Err(err);
    }
    if trimmed.len() > MAX_VISITOR_NAME_LEN {
        let mut err = ValidationError::new("visitor_name_length");
        err.message = Some("Visitor name is too long".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a phone number against a loose international format.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone number format is invalid".into());
        Err(err)
    }
}

/// Validates a visit purpose: non-blank, bounded length.
pub fn validate_purpose(purpose: &str) -> Result<(), ValidationError> {
    let trimmed = purpose.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("purpose_blank");
        err.message = Some("Purpose must not be blank".into());
        return Err(err);
    }
    if trimmed.len() > MAX_PURPOSE_LEN {
        let mut err = ValidationError::new("purpose_length");
        err.message = Some("Purpose is too long".into());
        return Err(err);
    }
    Ok(())
}

/// Validates an expected visit date: today or later, within a year.
pub fn validate_expected_date(date: &NaiveDate) -> Result<(), ValidationError> {
    let date = *date;
    let today = Utc::now().date_naive();
    if date < today {
        let mut err = ValidationError::new("expected_date_past");
        err.message = Some("Expected date must not be in the past".into());
        return Err(err);
    }
    if date > today + chrono::Duration::days(MAX_EXPECTED_DATE_AHEAD_DAYS) {
        let mut err = ValidationError::new("expected_date_too_far");
        err.message = Some("Expected date is too far in the future".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_visitor_name_ok() {
        assert!(validate_visitor_name("Amira Haddad").is_ok());
    }

    #[test]
    fn test_validate_visitor_name_blank() {
        assert!(validate_visitor_name("").is_err());
        assert!(validate_visitor_name("   ").is_err());
    }

    #[test]
    fn test_validate_visitor_name_too_long() {
        assert!(validate_visitor_name(&"x".repeat(101)).is_err());
        assert!(validate_visitor_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_phone_formats() {
        assert!(validate_phone("+974 4444 5555").is_ok());
        assert!(validate_phone("44445555").is_ok());
        assert!(validate_phone("+1 (555) 123-4567").is_ok());
    }

    #[test]
    fn test_validate_phone_rejects_garbage() {
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_validate_purpose_ok() {
        assert!(validate_purpose("Meeting").is_ok());
    }

    #[test]
    fn test_validate_purpose_blank() {
        assert!(validate_purpose(" ").is_err());
    }

    #[test]
    fn test_validate_purpose_too_long() {
        assert!(validate_purpose(&"p".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_expected_date_today_ok() {
        assert!(validate_expected_date(&Utc::now().date_naive()).is_ok());
    }

    #[test]
    fn test_validate_expected_date_past_rejected() {
        let yesterday = Utc::now().date_naive() - chrono::Duration::days(1);
        assert!(validate_expected_date(&yesterday).is_err());
    }

    #[test]
    fn test_validate_expected_date_far_future_rejected() {
        let far = Utc::now().date_naive() + chrono::Duration::days(400);
        assert!(validate_expected_date(&far).is_err());
    }
}
