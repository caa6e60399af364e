//! JSON export and import of the full contact set.
//!
//! Export writes a JSON array of flat contact objects (identity included)
//! with 4-space indentation. Import inserts element by element so one bad
//! record never aborts the batch.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ContactError, Result};
use crate::models::{ContactRecord, ImportSummary};
use crate::store::ContactStore;
use crate::validation::InputValidator;

/// Write every stored contact to `path`, replacing any existing file.
///
/// Returns the number of contacts written.
pub fn export_json(store: &dyn ContactStore, path: &Path) -> Result<usize> {
    let contacts = store.list_all()?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    contacts.serialize(&mut serializer)?;
    writer.flush()?;

    info!(path = %path.display(), count = contacts.len(), backend = %store.backend(), "Exported contacts");
    Ok(contacts.len())
}

/// Insert every contact found in the JSON array at `path`.
///
/// The file must exist and hold a JSON array; otherwise nothing is inserted.
/// Elements that are not contact objects, fail validation, collide with a
/// stored email or fail to persist are skipped and counted.
pub fn import_json(store: &dyn ContactStore, path: &Path) -> Result<ImportSummary> {
    if !path.exists() {
        return Err(ContactError::FileNotFound(path.to_path_buf()));
    }

    let reader = BufReader::new(File::open(path)?);
    let elements: Vec<Value> = serde_json::from_reader(reader)?;

    let mut summary = ImportSummary::default();
    for (index, element) in elements.into_iter().enumerate() {
        let record: ContactRecord = match serde_json::from_value(element) {
            Ok(record) => record,
            Err(e) => {
                warn!(index, error = %e, "Skipping element that is not a contact");
                summary.invalid += 1;
                continue;
            }
        };

        match InputValidator::validate_record(&record).and_then(|()| store.insert(&record)) {
            Ok(_) => summary.imported += 1,
            Err(ContactError::DuplicateEmail(email)) => {
                warn!(index, email, "Skipping duplicate contact");
                summary.duplicates += 1;
            }
            Err(e) if e.is_validation() => {
                warn!(index, email = %record.email, error = %e, "Skipping invalid contact");
                summary.invalid += 1;
            }
            Err(e) => {
                warn!(index, email = %record.email, error = %e, "Skipping contact that failed to persist");
                summary.failed += 1;
            }
        }
    }

    info!(
        path = %path.display(),
        imported = summary.imported,
        skipped = summary.skipped(),
        backend = %store.backend(),
        "Imported contacts"
    );
    Ok(summary)
}
