//! Document contact store on an embedded sled database.
//!
//! Each contact is one schema-less JSON document keyed by a monotonic id in
//! big-endian form, so key order is insertion order. A second tree maps
//! email to document key; both trees change in one transaction, which is
//! what makes the email unique.

use std::fs;
use std::path::Path;

use sled::transaction::{ConflictableTransactionError, ConflictableTransactionResult};
use sled::{IVec, Transactional};
use tracing::{debug, info, warn};

use crate::error::{ContactError, Result};
use crate::models::{ContactRecord, RecordId, StoredContact};
use crate::schema::documents;
use crate::store::{BackendKind, ContactStore};

/// Document-oriented contact store
pub struct DocumentStore {
    db: sled::Db,
    contacts: sled::Tree,
    by_email: sled::Tree,
}

impl DocumentStore {
    /// Open (or create) the store directory at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let db = sled::open(path)?;
        info!(path = %path.display(), "Opened document contact store");
        Self::from_db(db)
    }

    /// Store that lives only as long as the returned value
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let contacts = db.open_tree(documents::CONTACTS)?;
        let by_email = db.open_tree(documents::BY_EMAIL)?;
        Ok(Self { db, contacts, by_email })
    }

    fn decode(key: &IVec, value: &IVec) -> Result<StoredContact> {
        let bytes = <[u8; 8]>::try_from(&key[..])
            .map_err(|_| ContactError::Other(format!("Corrupt document key of {} bytes", key.len())))?;
        let record: ContactRecord = serde_json::from_slice(value)?;

        Ok(StoredContact {
            id: RecordId::Document(u64::from_be_bytes(bytes).to_string()),
            record,
        })
    }
}

impl ContactStore for DocumentStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Document
    }

    fn insert(&self, record: &ContactRecord) -> Result<StoredContact> {
        let id = self.db.generate_id()?;
        let key = id.to_be_bytes().to_vec();
        let document = serde_json::to_vec(record)?;
        let email = record.email.as_bytes();

        (&self.contacts, &self.by_email).transaction(
            |(contacts, by_email)| -> ConflictableTransactionResult<(), ContactError> {
                if by_email.get(email)?.is_some() {
                    return Err(ConflictableTransactionError::Abort(ContactError::DuplicateEmail(
                        record.email.clone(),
                    )));
                }
                contacts.insert(key.clone(), document.clone())?;
                by_email.insert(email, key.clone())?;
                Ok(())
            },
        )?;

        debug!(id, email = %record.email, "Inserted contact document");
        Ok(StoredContact {
            id: RecordId::Document(id.to_string()),
            record: record.clone(),
        })
    }

    fn list_all(&self) -> Result<Vec<StoredContact>> {
        let mut results = Vec::new();
        for entry in self.contacts.iter() {
            let (key, value) = entry?;
            results.push(Self::decode(&key, &value)?);
        }
        Ok(results)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<StoredContact>> {
        let Some(key) = self.by_email.get(email.as_bytes())? else {
            return Ok(None);
        };

        match self.contacts.get(&key)? {
            Some(value) => Ok(Some(Self::decode(&key, &value)?)),
            None => {
                warn!(email, "Email index points at a missing document");
                Ok(None)
            }
        }
    }

    fn delete_by_email(&self, email: &str) -> Result<usize> {
        let email_key = email.as_bytes();

        let deleted = (&self.contacts, &self.by_email).transaction(
            |(contacts, by_email)| -> ConflictableTransactionResult<usize, ContactError> {
                let Some(key) = by_email.remove(email_key)? else {
                    return Ok(0);
                };
                Ok(usize::from(contacts.remove(key)?.is_some()))
            },
        )?;

        debug!(email, deleted, "Deleted contact document");
        Ok(deleted)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.contacts.len())
    }

    fn clear(&self) -> Result<usize> {
        let removed = self.contacts.len();
        self.contacts.clear()?;
        self.by_email.clear()?;
        Ok(removed)
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_decode_in_insertion_order() {
        let store = DocumentStore::temporary().unwrap();
        for email in ["c@x.io", "a@x.io", "b@x.io"] {
            store
                .insert(&ContactRecord {
                    email: email.to_string(),
                    ..ContactRecord::default()
                })
                .unwrap();
        }

        let emails: Vec<_> = store.list_all().unwrap().into_iter().map(|c| c.record.email).collect();
        assert_eq!(emails, ["c@x.io", "a@x.io", "b@x.io"]);
    }

    #[test]
    fn test_delete_keeps_index_consistent() {
        let store = DocumentStore::temporary().unwrap();
        let record = ContactRecord {
            email: "gone@x.io".to_string(),
            ..ContactRecord::default()
        };
        store.insert(&record).unwrap();
        assert_eq!(store.delete_by_email("gone@x.io").unwrap(), 1);
        assert!(store.by_email.is_empty());
        // The email is free again
        store.insert(&record).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
