//! Database schema definitions
//!
//! This module provides constants for table and column names used with rusqlite,
//! and the key-space names used by the document store.

/// Contacts table schema
pub mod contacts {
    /// Table name
    pub const TABLE: &str = "contacts";
    /// Surrogate primary key column
    pub const ID: &str = "id";
    /// Given name column
    pub const FIRST_NAME: &str = "first_name";
    /// Family name column
    pub const LAST_NAME: &str = "last_name";
    /// Date of birth column
    pub const DATE_OF_BIRTH: &str = "date_of_birth";
    /// Street address column
    pub const STREET_ADDRESS: &str = "street_address";
    /// Postal code column
    pub const POSTAL_CODE: &str = "postal_code";
    /// State or province column
    pub const STATE_OR_PROVINCE: &str = "state_or_province";
    /// Country column
    pub const COUNTRY: &str = "country";
    /// Email address column, unique
    pub const EMAIL: &str = "email";
    /// Phone number column
    pub const PHONE_NUMBER: &str = "phone_number";
    /// Notes column
    pub const NOTES: &str = "notes";

    /// Every column except the surrogate key, in insert order
    pub const FIELDS: [&str; 10] = [
        FIRST_NAME,
        LAST_NAME,
        DATE_OF_BIRTH,
        STREET_ADDRESS,
        POSTAL_CODE,
        STATE_OR_PROVINCE,
        COUNTRY,
        EMAIL,
        PHONE_NUMBER,
        NOTES,
    ];
}

/// Document store trees
pub mod documents {
    /// Tree holding one JSON document per contact, keyed by big-endian id
    pub const CONTACTS: &str = "contacts";
    /// Tree mapping email to the document key
    pub const BY_EMAIL: &str = "contacts_by_email";
}
