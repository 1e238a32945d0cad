//! JSON persistence for `CatalogStore`.
//!
//! The store file is a single JSON document:
//!
//! ```json
//! { "entries": [ { "id": "603", "type": "popular", "title": "The Matrix" } ] }
//! ```
//!
//! Enrichment (`trailer`, `ratings`) is written back on save, so a synced
//! store round-trips through the same file.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, StoreError};
use crate::store::CatalogStore;
use crate::types::CatalogEntry;

/// On-disk layout of the store file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
}

/// Parse a store document from a string and validate its entries.
pub fn parse_document(source: &str, path: &str) -> Result<Vec<CatalogEntry>> {
    let document: CatalogDocument =
        serde_json::from_str(source).map_err(|source| StoreError::Malformed {
            path: path.to_string(),
            source,
        })?;
    validate_entries(&document.entries)?;
    Ok(document.entries)
}

/// Check ids and types are non-empty and ids are unique.
pub fn validate_entries(entries: &[CatalogEntry]) -> Result<()> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if entry.id.trim().is_empty() {
            return Err(StoreError::InvalidEntry {
                id: entry.id.clone(),
                field: "id".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if entry.kind.trim().is_empty() {
            return Err(StoreError::InvalidEntry {
                id: entry.id.clone(),
                field: "type".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(StoreError::DuplicateId(entry.id.clone()));
        }
    }
    Ok(())
}

impl CatalogStore {
    /// Load a store from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let path_str = path.display().to_string();
        let source = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::FileNotFound {
                path: path_str.clone(),
            },
            _ => StoreError::IoError(e),
        })?;

        let entries = parse_document(&source, &path_str)?;
        info!("Loaded {} entries from {}", entries.len(), path_str);
        CatalogStore::from_entries(entries)
    }

    /// Load a store from a JSON file, or start empty if the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load_from_file(path) {
            Err(StoreError::FileNotFound { .. }) => {
                info!("No store at {}, starting empty", path.display());
                Ok(Self::new())
            }
            other => other,
        }
    }

    /// Write every entry to a JSON file, replacing its contents.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let document = CatalogDocument {
            entries: self.entries(),
        };
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &document).map_err(|source| {
            StoreError::Malformed {
                path: path.display().to_string(),
                source,
            }
        })?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!("Saved {} entries to {}", document.entries.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntryField, RecordStore};
    use crate::types::ExternalRatings;

    #[test]
    fn test_parse_document() {
        let source = r#"{
            "entries": [
                {"id": "603", "type": "popular", "title": "The Matrix"},
                {"id": "680", "type": "top_rated", "poster_path": "/abc.jpg"}
            ]
        }"#;

        let entries = parse_document(source, "inline").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, "popular");
        assert_eq!(entries[1].poster_path.as_deref(), Some("/abc.jpg"));
        assert!(entries[1].trailer.is_none());
    }

    #[test]
    fn test_parse_document_rejects_duplicates() {
        let source = r#"{"entries": [
            {"id": "603", "type": "popular"},
            {"id": "603", "type": "upcoming"}
        ]}"#;

        let result = parse_document(source, "inline");
        assert!(matches!(result, Err(StoreError::DuplicateId(_))));
    }

    #[test]
    fn test_parse_document_rejects_empty_type() {
        let source = r#"{"entries": [{"id": "603", "type": " "}]}"#;

        let result = parse_document(source, "inline");
        assert!(matches!(
            result,
            Err(StoreError::InvalidEntry { ref field, .. }) if field == "type"
        ));
    }

    #[test]
    fn test_parse_document_malformed() {
        let result = parse_document("{ not json", "inline");
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn test_save_then_load_keeps_enrichment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.json");

        let store = CatalogStore::from_entries(vec![CatalogEntry::new("603", "popular")]).unwrap();
        store
            .update("603", &mut |e| {
                let mut ratings = ExternalRatings::new("603", "tt0133093");
                ratings.imdb_rating = "8.7".to_string();
                e.attach_ratings(ratings);
            })
            .unwrap();
        store.save_to_file(&path).unwrap();

        let loaded = CatalogStore::load_from_file(&path).unwrap();
        let entries = loaded.get_all_where(EntryField::Type, "popular").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ratings.as_ref().unwrap().imdb_rating, "8.7");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(
            CatalogStore::load_from_file(&path),
            Err(StoreError::FileNotFound { .. })
        ));
        assert!(CatalogStore::load_or_default(&path).unwrap().is_empty());
    }
}
