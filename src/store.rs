//! Storage capability shared by every backend.
//!
//! The service and the command line are written once against
//! [`ContactStore`]; the relational, document and dual-write backends are
//! interchangeable implementations of it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ContactRecord, StoredContact};

/// Which backend a store persists to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Single SQLite table with a unique email column
    Relational,
    /// Schema-less JSON documents in an embedded sled database
    Document,
    /// Relational primary mirrored into the document store
    DualWrite,
}

impl BackendKind {
    /// Name used in configuration files, logs and metric labels
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Relational => "relational",
            Self::Document => "document",
            Self::DualWrite => "dual-write",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable collection of contacts.
///
/// Implementations persist records exactly as given: validation happens in
/// front of the store, not inside it. Every backend rejects a second record
/// with an email that is already stored.
#[cfg_attr(test, mockall::automock)]
pub trait ContactStore {
    /// Backend this store writes to
    fn backend(&self) -> BackendKind;

    /// Persist a record and return it with its assigned identity.
    ///
    /// Fails with [`ContactError::DuplicateEmail`](crate::ContactError::DuplicateEmail)
    /// without mutating anything when the email is taken.
    fn insert(&self, record: &ContactRecord) -> Result<StoredContact>;

    /// Every stored record, in insertion order
    fn list_all(&self) -> Result<Vec<StoredContact>>;

    /// The record stored under `email`, if any
    fn find_by_email(&self, email: &str) -> Result<Option<StoredContact>>;

    /// Remove the record stored under `email`. Returns how many records were
    /// removed; 0 means no record matched and nothing changed.
    fn delete_by_email(&self, email: &str) -> Result<usize>;

    /// Number of stored records
    fn count(&self) -> Result<usize>;

    /// Remove every record, returning how many were removed
    fn clear(&self) -> Result<usize>;

    /// Make buffered writes durable
    fn flush(&self) -> Result<()>;
}
