//! Application records and loaders.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A submitted job application, as far as duplicate detection cares.
///
/// Owned by the caller; the engine only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Opaque unique identifier
    pub id: String,
    /// Raw, user-supplied name
    #[serde(default)]
    pub full_name: String,
    /// Birth date key, compared verbatim
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

impl ApplicationRecord {
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        date_of_birth: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            date_of_birth: date_of_birth.map(str::to_string),
        }
    }

    /// Bucket key used for clustering.
    ///
    /// A missing birth date and an empty one share the `""` key.
    pub fn dob_key(&self) -> &str {
        self.date_of_birth.as_deref().unwrap_or("")
    }
}

/// Load records from a JSON array.
pub fn load_json<R: Read>(reader: R) -> Result<Vec<ApplicationRecord>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load records from CSV with an `id,full_name,date_of_birth` header.
///
/// The `date_of_birth` column may be absent, and empty cells are read as missing.
pub fn load_csv<R: Read>(reader: R) -> Result<Vec<ApplicationRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in rdr.deserialize() {
        let mut record: ApplicationRecord = row?;
        if record.date_of_birth.as_deref() == Some("") {
            record.date_of_birth = None;
        }
        records.push(record);
    }
    Ok(records)
}
