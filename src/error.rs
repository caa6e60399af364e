//! Error types for the contact-book library.
//!
//! This module provides custom error types using `thiserror` so callers can
//! tell validation failures, constraint violations and storage faults apart.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the contact-book application.
#[derive(Error, Debug)]
pub enum ContactError {
    /// Date of birth does not match `YYYY-MM-DD`
    #[error("Invalid format. Please enter the date in YYYY-MM-DD format (got {0:?}).")]
    InvalidDateFormat(String),

    /// Phone number does not match `(NNN)NNN NNNN`
    #[error("Invalid format. Please enter the phone number in (---)--- ---- format (got {0:?}).")]
    InvalidPhoneFormat(String),

    /// A contact with this email is already stored
    #[error("A contact with this email already exists: {0}")]
    DuplicateEmail(String),

    /// Import source file is missing
    #[error("{} does not exist.", .0.display())]
    FileNotFound(PathBuf),

    /// No contact matched the given email
    #[error("No contact found with email: {0}")]
    ContactNotFound(String),

    /// An email is required to identify the contact
    #[error("Please enter an email to delete a contact.")]
    MissingEmail,

    /// Relational database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Connection pool errors
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Document store errors
    #[error("Document store error: {0}")]
    Document(#[from] sled::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The two dual-write backends no longer agree
    #[error("Backends diverged: {0}")]
    DualWriteDivergence(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

impl ContactError {
    /// True for errors that reject the input before anything is persisted.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidDateFormat(_) | Self::InvalidPhoneFormat(_))
    }

    /// Short label used for metrics and structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDateFormat(_) => "invalid_date_format",
            Self::InvalidPhoneFormat(_) => "invalid_phone_format",
            Self::DuplicateEmail(_) => "duplicate_email",
            Self::FileNotFound(_) => "file_not_found",
            Self::ContactNotFound(_) => "contact_not_found",
            Self::MissingEmail => "missing_email",
            Self::Database(_) => "database",
            Self::Pool(_) => "pool",
            Self::Document(_) => "document",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::DualWriteDivergence(_) => "dual_write_divergence",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for Result with `ContactError`
pub type Result<T> = std::result::Result<T, ContactError>;

impl From<sled::transaction::TransactionError<ContactError>> for ContactError {
    fn from(err: sled::transaction::TransactionError<ContactError>) -> Self {
        match err {
            sled::transaction::TransactionError::Abort(inner) => inner,
            sled::transaction::TransactionError::Storage(e) => Self::Document(e),
        }
    }
}
