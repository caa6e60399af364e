//! Contact Book - Contact Record Storage and Transfer
//!
//! A Rust library for recording personal contact records into a persistent
//! store and moving them in and out as JSON.
//!
//! # Features
//!
//! - Regex validation of date of birth and phone number
//! - Relational (SQLite), document (sled) and dual-write backends
//! - Unique email enforced by every backend
//! - JSON export and batch import that skips bad records

/// Configuration management
pub mod config;
/// Relational backend and connection pooling
pub mod db;
/// Document backend
pub mod document;
/// Dual-write backend with compensating actions
pub mod dual;
/// Error types
pub mod error;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Database schema definitions
pub mod schema;
/// Application state and user actions
pub mod service;
/// Storage capability shared by all backends
pub mod store;
/// JSON export and import
pub mod transfer;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use db::Database;
pub use document::DocumentStore;
pub use dual::DualWriteStore;
pub use error::{ContactError, Result};
pub use models::{ContactRecord, ImportSummary, RecordId, StoredContact};
pub use service::ContactService;
pub use store::{BackendKind, ContactStore};
