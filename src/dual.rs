//! Dual-write store: a primary backend mirrored into a secondary one.
//!
//! Reads are served by the primary. Writes go to the primary first, so a
//! primary rejection (a duplicate email, say) never reaches the secondary.
//! When the secondary then fails, the primary write is undone by a
//! compensating action; if that also fails the caller gets
//! [`ContactError::DualWriteDivergence`].

use tracing::{error, info, warn};

use crate::error::{ContactError, Result};
use crate::models::{ContactRecord, StoredContact};
use crate::store::{BackendKind, ContactStore};

/// Writes every change to two stores, reads from the first
pub struct DualWriteStore<P, S> {
    primary: P,
    secondary: S,
}

impl<P: ContactStore, S: ContactStore> DualWriteStore<P, S> {
    /// Mirror `primary` into `secondary`
    pub fn new(primary: P, secondary: S) -> Self {
        info!(
            primary = %primary.backend(),
            secondary = %secondary.backend(),
            "Dual-write store ready"
        );
        Self { primary, secondary }
    }

    /// The backend reads are served from
    pub const fn primary(&self) -> &P {
        &self.primary
    }

    /// The mirror backend
    pub const fn secondary(&self) -> &S {
        &self.secondary
    }
}

impl<P: ContactStore, S: ContactStore> ContactStore for DualWriteStore<P, S> {
    fn backend(&self) -> BackendKind {
        BackendKind::DualWrite
    }

    fn insert(&self, record: &ContactRecord) -> Result<StoredContact> {
        let stored = self.primary.insert(record)?;

        if let Err(mirror_err) = self.secondary.insert(record) {
            warn!(
                email = %record.email,
                error = %mirror_err,
                "Secondary insert failed, removing primary copy"
            );
            return match self.primary.delete_by_email(&record.email) {
                Ok(_) => Err(mirror_err),
                Err(undo_err) => {
                    error!(email = %record.email, error = %undo_err, "Compensating delete failed");
                    Err(ContactError::DualWriteDivergence(format!(
                        "{} stored only in {}: {mirror_err}; undo failed: {undo_err}",
                        record.email,
                        self.primary.backend()
                    )))
                }
            };
        }

        Ok(stored)
    }

    fn list_all(&self) -> Result<Vec<StoredContact>> {
        self.primary.list_all()
    }

    fn find_by_email(&self, email: &str) -> Result<Option<StoredContact>> {
        self.primary.find_by_email(email)
    }

    fn delete_by_email(&self, email: &str) -> Result<usize> {
        let Some(existing) = self.primary.find_by_email(email)? else {
            return Ok(0);
        };

        let deleted = self.primary.delete_by_email(email)?;
        if deleted == 0 {
            return Ok(0);
        }

        match self.secondary.delete_by_email(email) {
            Ok(0) => {
                warn!(email, "Contact was missing from the secondary store");
                Ok(deleted)
            }
            Ok(_) => Ok(deleted),
            Err(mirror_err) => {
                warn!(email, error = %mirror_err, "Secondary delete failed, restoring primary copy");
                match self.primary.insert(&existing.record) {
                    Ok(_) => Err(mirror_err),
                    Err(undo_err) => {
                        error!(email, error = %undo_err, "Compensating insert failed");
                        Err(ContactError::DualWriteDivergence(format!(
                            "{email} removed only from {}: {mirror_err}; undo failed: {undo_err}",
                            self.primary.backend()
                        )))
                    }
                }
            }
        }
    }

    fn count(&self) -> Result<usize> {
        self.primary.count()
    }

    fn clear(&self) -> Result<usize> {
        let removed = self.primary.clear()?;
        self.secondary.clear().map_err(|e| {
            ContactError::DualWriteDivergence(format!(
                "{} cleared but {} was not: {e}",
                self.primary.backend(),
                self.secondary.backend()
            ))
        })?;
        Ok(removed)
    }

    fn flush(&self) -> Result<()> {
        self.primary.flush()?;
        self.secondary.flush()
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::models::RecordId;
    use crate::store::MockContactStore;

    fn record(email: &str) -> ContactRecord {
        ContactRecord {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            date_of_birth: "1906-12-09".to_string(),
            email: email.to_string(),
            phone_number: "(202)555 0143".to_string(),
            ..ContactRecord::default()
        }
    }

    fn stored(email: &str) -> StoredContact {
        StoredContact {
            id: RecordId::Row(1),
            record: record(email),
        }
    }

    fn mock(kind: BackendKind) -> MockContactStore {
        let mut store = MockContactStore::new();
        store.expect_backend().return_const(kind);
        store
    }

    #[test]
    fn test_primary_rejection_never_reaches_secondary() {
        let mut primary = mock(BackendKind::Relational);
        primary
            .expect_insert()
            .returning(|r| Err(ContactError::DuplicateEmail(r.email.clone())));
        let mut secondary = mock(BackendKind::Document);
        secondary.expect_insert().never();

        let store = DualWriteStore::new(primary, secondary);
        let err = store.insert(&record("dup@x.io")).unwrap_err();
        assert!(matches!(err, ContactError::DuplicateEmail(_)));
    }

    #[test]
    fn test_secondary_insert_failure_removes_primary_copy() {
        let mut primary = mock(BackendKind::Relational);
        primary.expect_insert().returning(|r| {
            Ok(StoredContact {
                id: RecordId::Row(1),
                record: r.clone(),
            })
        });
        primary
            .expect_delete_by_email()
            .with(eq("a@x.io"))
            .times(1)
            .returning(|_| Ok(1));
        let mut secondary = mock(BackendKind::Document);
        secondary
            .expect_insert()
            .returning(|_| Err(ContactError::Other("disk full".to_string())));

        let store = DualWriteStore::new(primary, secondary);
        let err = store.insert(&record("a@x.io")).unwrap_err();
        assert!(matches!(err, ContactError::Other(_)));
    }

    #[test]
    fn test_failed_compensation_reports_divergence() {
        let mut primary = mock(BackendKind::Relational);
        primary.expect_insert().returning(|r| {
            Ok(StoredContact {
                id: RecordId::Row(1),
                record: r.clone(),
            })
        });
        primary
            .expect_delete_by_email()
            .returning(|_| Err(ContactError::Other("locked".to_string())));
        let mut secondary = mock(BackendKind::Document);
        secondary
            .expect_insert()
            .returning(|_| Err(ContactError::Other("disk full".to_string())));

        let store = DualWriteStore::new(primary, secondary);
        let err = store.insert(&record("a@x.io")).unwrap_err();
        assert!(matches!(err, ContactError::DualWriteDivergence(_)));
    }

    #[test]
    fn test_secondary_delete_failure_restores_primary_copy() {
        let mut primary = mock(BackendKind::Relational);
        primary
            .expect_find_by_email()
            .returning(|email| Ok(Some(stored(email))));
        primary.expect_delete_by_email().times(1).returning(|_| Ok(1));
        primary
            .expect_insert()
            .withf(|r| r.email == "b@x.io")
            .times(1)
            .returning(|r| {
                Ok(StoredContact {
                    id: RecordId::Row(2),
                    record: r.clone(),
                })
            });
        let mut secondary = mock(BackendKind::Document);
        secondary
            .expect_delete_by_email()
            .returning(|_| Err(ContactError::Other("io".to_string())));

        let store = DualWriteStore::new(primary, secondary);
        assert!(store.delete_by_email("b@x.io").is_err());
    }

    #[test]
    fn test_delete_of_unknown_email_touches_nothing() {
        let mut primary = mock(BackendKind::Relational);
        primary.expect_find_by_email().returning(|_| Ok(None));
        primary.expect_delete_by_email().never();
        let mut secondary = mock(BackendKind::Document);
        secondary.expect_delete_by_email().never();

        let store = DualWriteStore::new(primary, secondary);
        assert_eq!(store.delete_by_email("nobody@x.io").unwrap(), 0);
    }
}
