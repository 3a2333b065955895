use super::DataStore;
use crate::error::{EntryKind, OrganizerError, Result};
use crate::model::{Contact, Note};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const CONTACTS_FILE: &str = "contacts.json";
pub const NOTES_FILE: &str = "notes.json";

/// JSON-file store rooted at a data directory.
///
/// Cloning is cheap and every clone writes to the same files, which is how
/// autosave hooks get their own handle.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_name(kind: EntryKind) -> &'static str {
        match kind {
            EntryKind::Contact => CONTACTS_FILE,
            EntryKind::Note => NOTES_FILE,
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(OrganizerError::Io)?;
        }
        Ok(())
    }

    fn read_records<T: DeserializeOwned>(&self, kind: EntryKind) -> Result<Vec<T>> {
        let path = self.location(kind);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let load_error = |reason: String| OrganizerError::Load {
            path: path.clone(),
            reason,
        };
        let content = fs::read_to_string(&path).map_err(|e| load_error(e.to_string()))?;
        let records: Vec<T> =
            serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;
        debug!("event=store_read file={} count={}", path.display(), records.len());
        Ok(records)
    }

    // Write to a sibling temp file first so a crash never leaves a
    // half-written collection behind.
    fn write_records<T: Serialize>(&self, kind: EntryKind, records: &[T]) -> Result<()> {
        self.ensure_dir()?;
        let target = self.location(kind);
        let content = serde_json::to_string_pretty(records).map_err(OrganizerError::Serialization)?;

        let tmp_file = self
            .root
            .join(format!(".{}-{}.tmp", Self::file_name(kind), Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(OrganizerError::Io)?;
        fs::rename(&tmp_file, &target).map_err(OrganizerError::Io)?;
        debug!("event=store_write file={} count={}", target.display(), records.len());
        Ok(())
    }
}

impl DataStore for FileStore {
    fn load_contacts(&self) -> Result<Vec<Contact>> {
        self.read_records(EntryKind::Contact)
    }

    fn save_contacts(&mut self, contacts: &[Contact]) -> Result<()> {
        self.write_records(EntryKind::Contact, contacts)
    }

    fn load_notes(&self) -> Result<Vec<Note>> {
        self.read_records(EntryKind::Note)
    }

    fn save_notes(&mut self, notes: &[Note]) -> Result<()> {
        self.write_records(EntryKind::Note, notes)
    }

    fn location(&self, kind: EntryKind) -> PathBuf {
        self.root.join(Self::file_name(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("data"));
        (dir, store)
    }

    #[test]
    fn missing_files_load_as_empty() {
        let (_dir, store) = setup();
        assert!(store.load_contacts().unwrap().is_empty());
        assert!(store.load_notes().unwrap().is_empty());
    }

    #[test]
    fn save_creates_directory_and_canonical_json() {
        let (_dir, mut store) = setup();
        let contact = Contact::new("alice")
            .unwrap()
            .with_birthday(NaiveDate::from_ymd_opt(1995, 5, 20).unwrap())
            .unwrap();
        store.save_contacts(&[contact]).unwrap();

        let raw = fs::read_to_string(store.root().join(CONTACTS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["name"], "Alice");
        assert_eq!(value[0]["birthday"], "1995-05-20");
        assert!(value[0]["phone"].is_null());
        assert!(value[0]["last_modified"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn writes_leave_no_temp_files() {
        let (_dir, mut store) = setup();
        store.save_notes(&[Note::new("A").unwrap()]).unwrap();
        store.save_notes(&[]).unwrap();

        for entry in fs::read_dir(store.root()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
        assert!(store.load_notes().unwrap().is_empty());
    }

    #[test]
    fn garbage_content_is_a_load_error_naming_the_file() {
        let (_dir, store) = setup();
        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.root().join(NOTES_FILE), "this is not json").unwrap();

        match store.load_notes() {
            Err(OrganizerError::Load { path, .. }) => assert!(path.ends_with(NOTES_FILE)),
            other => panic!("expected load error, got {:?}", other),
        }
    }
}
