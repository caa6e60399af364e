//! Application state: one open store plus the validation gate.
//!
//! A [`ContactService`] is created once at startup, serves every user
//! action, and is closed once at shutdown. Each action either completes or
//! fails as a unit; a failure leaves the service usable.

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::config::StorageConfig;
use crate::db::Database;
use crate::document::DocumentStore;
use crate::dual::DualWriteStore;
use crate::error::{ContactError, Result};
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{ContactRecord, ImportSummary, StoredContact};
use crate::store::{BackendKind, ContactStore};
use crate::transfer;
use crate::validation::InputValidator;

/// Long-lived application state owning the open store
pub struct ContactService {
    store: Box<dyn ContactStore>,
    metrics: MetricsCollector,
}

impl ContactService {
    /// Open the backend selected by `config`
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let store: Box<dyn ContactStore> = match config.backend {
            BackendKind::Relational => Box::new(Database::open(&config.sqlite_path, config.max_connections)?),
            BackendKind::Document => Box::new(DocumentStore::open(&config.document_path)?),
            BackendKind::DualWrite => Box::new(DualWriteStore::new(
                Database::open(&config.sqlite_path, config.max_connections)?,
                DocumentStore::open(&config.document_path)?,
            )),
        };
        Ok(Self::with_store(store))
    }

    /// Serve actions from an already opened store
    pub fn with_store(store: Box<dyn ContactStore>) -> Self {
        info!(backend = %store.backend(), "Contact service started");
        Self {
            store,
            metrics: MetricsCollector::default(),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &dyn ContactStore {
        self.store.as_ref()
    }

    fn observe<T>(&self, operation: &'static str, run: impl FnOnce(&dyn ContactStore) -> Result<T>) -> Result<T> {
        let timer = OperationTimer::new(operation);
        let result = run(self.store.as_ref());
        let duration = timer.finish();

        if let Err(e) = &result {
            warn!(operation, error = %e, "Operation failed");
        }
        self.metrics
            .record_operation(operation, self.store.backend(), duration, result.as_ref().err());
        result
    }

    /// Validate and persist a new contact
    #[instrument(skip(self, record), fields(email = %record.email))]
    pub fn add_contact(&self, record: &ContactRecord) -> Result<StoredContact> {
        self.observe("insert", |store| {
            InputValidator::validate_record(record)?;
            store.insert(record)
        })
    }

    /// Every stored contact in storage order
    pub fn list_contacts(&self) -> Result<Vec<StoredContact>> {
        self.observe("list", |store| store.list_all())
    }

    /// The contact stored under `email`
    pub fn find_contact(&self, email: &str) -> Result<StoredContact> {
        self.observe("find", |store| {
            InputValidator::validate_lookup_email(email)?;
            store
                .find_by_email(email)?
                .ok_or_else(|| ContactError::ContactNotFound(email.to_string()))
        })
    }

    /// Delete the contact stored under `email`.
    ///
    /// A zero count from the store becomes [`ContactError::ContactNotFound`].
    #[instrument(skip(self))]
    pub fn delete_contact(&self, email: &str) -> Result<usize> {
        self.observe("delete", |store| {
            InputValidator::validate_lookup_email(email)?;
            match store.delete_by_email(email)? {
                0 => Err(ContactError::ContactNotFound(email.to_string())),
                deleted => Ok(deleted),
            }
        })
    }

    /// Export every contact to `path`
    pub fn export_json(&self, path: &Path) -> Result<usize> {
        let written = self.observe("export", |store| transfer::export_json(store, path))?;
        self.metrics.record_export(written);
        Ok(written)
    }

    /// Import contacts from `path`
    pub fn import_json(&self, path: &Path) -> Result<ImportSummary> {
        let summary = self.observe("import", |store| transfer::import_json(store, path))?;
        self.metrics.record_import(&summary);
        Ok(summary)
    }

    /// Flush and release the store
    pub fn close(self) -> Result<()> {
        self.store.flush()?;
        info!(backend = %self.store.backend(), "Contact service closed");
        Ok(())
    }
}
