//! Data models for contact handling and storage
//!
//! This module contains the contact record entered through the form, the
//! stored representation with its backend-assigned identity, and the
//! summary returned by a JSON import.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A contact as entered by the user, before any identity is assigned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Date of birth, `YYYY-MM-DD`
    pub date_of_birth: String,
    /// Street address line
    pub street_address: String,
    /// Postal or ZIP code
    pub postal_code: String,
    /// State or province
    pub state_or_province: String,
    /// Country
    pub country: String,
    /// Email address, the logical identity of the contact
    pub email: String,
    /// Phone number, `(NNN)NNN NNNN`
    pub phone_number: String,
    /// Free-form, possibly multi-line notes
    pub notes: String,
}

/// Identity assigned to a contact by the backend that stored it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Auto-incremented surrogate key of the relational table
    Row(i64),
    /// Stringified document key
    Document(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(id) => write!(f, "{id}"),
            Self::Document(key) => f.write_str(key),
        }
    }
}

/// A contact as held by a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredContact {
    /// Backend-assigned identity
    pub id: RecordId,
    /// The contact fields
    #[serde(flatten)]
    pub record: ContactRecord,
}

impl fmt::Display for StoredContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.record;
        writeln!(f, "Name: {} {}", r.first_name, r.last_name)?;
        writeln!(f, "Email: {}", r.email)?;
        writeln!(f, "Phone: {}", r.phone_number)?;
        writeln!(
            f,
            "Address: {}, {}, {}, {}",
            r.street_address, r.postal_code, r.state_or_province, r.country
        )?;
        writeln!(f, "DOB: {}", r.date_of_birth)?;
        writeln!(f, "Notes: {}", r.notes)
    }
}

/// Render a listing the way the contact viewer shows it.
#[must_use]
pub fn render_contacts(contacts: &[StoredContact]) -> String {
    if contacts.is_empty() {
        return "No contacts found.".to_string();
    }

    contacts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Outcome counts of a JSON import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Records inserted
    pub imported: usize,
    /// Records skipped because their email was already stored
    pub duplicates: usize,
    /// Records skipped because they failed validation or were not contact objects
    pub invalid: usize,
    /// Records skipped because the backend failed to persist them
    pub failed: usize,
}

impl ImportSummary {
    /// Total number of elements seen in the import file
    #[must_use]
    pub const fn total(&self) -> usize {
        self.imported + self.duplicates + self.invalid + self.failed
    }

    /// Number of elements that were not inserted
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.duplicates + self.invalid + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredContact {
        StoredContact {
            id: RecordId::Row(7),
            record: ContactRecord {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                date_of_birth: "1815-12-10".to_string(),
                street_address: "12 St James's Square".to_string(),
                postal_code: "SW1Y 4JH".to_string(),
                state_or_province: "London".to_string(),
                country: "UK".to_string(),
                email: "ada@example.com".to_string(),
                phone_number: "(555)123 4567".to_string(),
                notes: "Analytical engine".to_string(),
            },
        }
    }

    #[test]
    fn test_stored_contact_serializes_flat_with_id() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["email"], "ada@example.com");
        assert!(value.get("record").is_none());
    }

    #[test]
    fn test_document_id_serializes_as_string() {
        let mut contact = sample();
        contact.id = RecordId::Document("42".to_string());
        let value = serde_json::to_value(contact).unwrap();
        assert_eq!(value["id"], "42");
    }

    #[test]
    fn test_record_ignores_identity_keys() {
        let json = r#"{"_id": "abc", "id": 3, "first_name": "A", "last_name": "B",
            "date_of_birth": "2000-01-01", "street_address": "", "postal_code": "",
            "state_or_province": "", "country": "", "email": "a@b.c",
            "phone_number": "(123)456 7890", "notes": ""}"#;
        let record: ContactRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.email, "a@b.c");
    }

    #[test]
    fn test_display_layout() {
        let text = sample().to_string();
        assert!(text.starts_with("Name: Ada Lovelace\n"));
        assert!(text.contains("Address: 12 St James's Square, SW1Y 4JH, London, UK\n"));
        assert!(text.ends_with("Notes: Analytical engine\n"));
    }

    #[test]
    fn test_render_empty_listing() {
        assert_eq!(render_contacts(&[]), "No contacts found.");
    }
}
