//! Input validation for user-supplied fields.
//!
//! The CLI analog of the original form checks: email and mobile shapes are
//! configurable regexes, due dates are accepted in the two formats found in
//! the wild.

use chrono::NaiveDate;
use regex::Regex;

use crate::config::ValidationConfig;
use crate::error::{Error, Result};

/// Compiled validation patterns.
#[derive(Debug)]
pub struct Validator {
    email: Regex,
    mobile: Regex,
}

impl Validator {
    /// Compile the patterns from the validation configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a pattern does not compile.
    pub fn new(config: &ValidationConfig) -> Result<Self> {
        let email = Regex::new(&config.email_pattern).map_err(|e| Error::ConfigValidation {
            message: format!("invalid email_pattern: {e}"),
        })?;
        let mobile = Regex::new(&config.mobile_pattern).map_err(|e| Error::ConfigValidation {
            message: format!("invalid mobile_pattern: {e}"),
        })?;
        Ok(Self { email, mobile })
    }

    /// Check a required display name.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name is blank.
    pub fn name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::validation("name", "must not be empty"));
        }
        Ok(())
    }

    /// Check an email address against the configured pattern.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the address does not match.
    pub fn email(&self, email: &str) -> Result<()> {
        if !self.email.is_match(email) {
            return Err(Error::validation(
                "email",
                format!("'{email}' is not a valid email address"),
            ));
        }
        Ok(())
    }

    /// Check a mobile number against the configured pattern.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the number does not match.
    pub fn mobile(&self, mobile: &str) -> Result<()> {
        if !self.mobile.is_match(mobile) {
            return Err(Error::validation(
                "mobile",
                format!("'{mobile}' is not a valid mobile number"),
            ));
        }
        Ok(())
    }
}

/// Parse a due date in either ISO (`2025-03-14`) or day-first
/// (`14/03/2025`) form.
///
/// The store always receives the ISO form; both input forms exist in data
/// written by earlier clients.
///
/// # Errors
///
/// Returns a validation error when the input matches neither format.
pub fn parse_due_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
        .map_err(|_| {
            Error::validation(
                "due date",
                format!("'{input}' is neither yyyy-mm-dd nor dd/mm/yyyy"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(&ValidationConfig::default()).unwrap()
    }

    #[test]
    fn test_name_rejects_blank() {
        let v = validator();
        assert!(v.name("Ada").is_ok());
        assert!(v.name("  ").is_err());
        assert!(v.name("").is_err());
    }

    #[test]
    fn test_email_accepts_plain_addresses() {
        let v = validator();
        assert!(v.email("ada@example.com").is_ok());
        assert!(v.email("a.b+c@sub.example.org").is_ok());
    }

    #[test]
    fn test_email_rejects_malformed_addresses() {
        let v = validator();
        assert!(v.email("ada").is_err());
        assert!(v.email("ada@").is_err());
        assert!(v.email("ada@example").is_err());
        assert!(v.email("ada example@example.com").is_err());
    }

    #[test]
    fn test_mobile_accepts_common_forms() {
        let v = validator();
        assert!(v.mobile("+49 170 1234567").is_ok());
        assert!(v.mobile("0170 1234567").is_ok());
        assert!(v.mobile("0170-123-4567").is_ok());
    }

    #[test]
    fn test_mobile_rejects_garbage() {
        let v = validator();
        assert!(v.mobile("not a number").is_err());
        assert!(v.mobile("12").is_err());
    }

    #[test]
    fn test_parse_due_date_iso() {
        let date = parse_due_date("2025-03-14").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_parse_due_date_day_first() {
        let date = parse_due_date("14/03/2025").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_parse_due_date_trims_whitespace() {
        assert!(parse_due_date(" 2025-01-02 ").is_ok());
    }

    #[test]
    fn test_parse_due_date_rejects_other_forms() {
        assert!(parse_due_date("03/14/2025").is_err()); // month-first
        assert!(parse_due_date("tomorrow").is_err());
        assert!(parse_due_date("").is_err());
    }

    #[test]
    fn test_validator_rejects_bad_pattern() {
        let config = ValidationConfig {
            email_pattern: "[broken".to_string(),
            ..ValidationConfig::default()
        };
        assert!(Validator::new(&config).is_err());
    }
}
