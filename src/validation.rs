//! Input validation for contact records.
//!
//! Only the date of birth and the phone number carry a format constraint;
//! every other field is accepted verbatim, including the empty string.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{anyhow, Result as AnyResult};
use regex::Regex;

use crate::error::{ContactError, Result};
use crate::models::ContactRecord;

#[allow(clippy::expect_used)]
static DATE_OF_BIRTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern compiles"));

#[allow(clippy::expect_used)]
static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{3}\)\d{3} \d{4}$").expect("phone pattern compiles"));

/// Validation gate in front of every write
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a whole record; the date is checked before the phone number.
    pub fn validate_record(record: &ContactRecord) -> Result<()> {
        Self::validate_date_of_birth(&record.date_of_birth)?;
        Self::validate_phone_number(&record.phone_number)
    }

    /// Validate date of birth format (`YYYY-MM-DD`, pattern only)
    pub fn validate_date_of_birth(dob: &str) -> Result<()> {
        if DATE_OF_BIRTH.is_match(dob) {
            Ok(())
        } else {
            Err(ContactError::InvalidDateFormat(dob.to_string()))
        }
    }

    /// Validate phone number format (`(NNN)NNN NNNN`)
    pub fn validate_phone_number(phone: &str) -> Result<()> {
        if PHONE_NUMBER.is_match(phone) {
            Ok(())
        } else {
            Err(ContactError::InvalidPhoneFormat(phone.to_string()))
        }
    }

    /// Validate the email used to look a contact up
    pub fn validate_lookup_email(email: &str) -> Result<()> {
        if email.is_empty() {
            return Err(ContactError::MissingEmail);
        }
        Ok(())
    }

    /// Validate a configured file path
    pub fn validate_file_path(path: &Path) -> AnyResult<()> {
        let path_str = path.to_string_lossy();
        if path_str.trim().is_empty() {
            return Err(anyhow!("File path cannot be empty"));
        }

        if path_str.contains('\0') {
            return Err(anyhow!("File path contains a NUL byte"));
        }

        // Check path length
        if path_str.len() > 4096 {
            return Err(anyhow!("File path too long (max 4096 characters)"));
        }

        Ok(())
    }
}
