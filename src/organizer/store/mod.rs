//! # Storage Layer
//!
//! This module defines the persistence contract for the organizer. The
//! [`DataStore`] trait lets the collection services be hydrated from, and
//! flushed to, different backends.
//!
//! ## Contract
//!
//! - **Save** writes every record of a collection, with all fields in
//!   canonical form (dates as `YYYY-MM-DD`, timestamps as RFC 3339).
//! - **Load** reconstructs the records, keeping the persisted
//!   `last_modified` instead of re-stamping it.
//! - A load either returns every record or fails as a whole with a single
//!   [`OrganizerError::Load`]: unparseable content, a missing required field,
//!   a bad date, or a record that fails validation all abort the load.
//!
//! [`load_addressbook`] and [`load_notebook`] layer the collection rules on
//! top: records are re-added through the timestamp-preserving path, so a
//! duplicate entry in a file is also a load failure.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: JSON files in a data directory, written atomically
//! - [`memory::InMemoryStore`]: no I/O, for tests
//!
//! ## Storage Layout
//!
//! ```text
//! <data-dir>/
//! ├── contacts.json   # JSON array of contacts
//! ├── notes.json      # JSON array of notes
//! └── config.json     # OrganizerConfig
//! ```

use crate::error::{EntryKind, OrganizerError, Result};
use crate::model::{Contact, Note};
use crate::services::{AddressBook, Notebook};
use log::info;
use std::path::PathBuf;

pub mod fs;
pub mod memory;

/// Abstract interface for record persistence.
pub trait DataStore {
    /// Load all contacts. A missing backing file means no contacts.
    fn load_contacts(&self) -> Result<Vec<Contact>>;

    /// Replace the persisted contacts with `contacts`.
    fn save_contacts(&mut self, contacts: &[Contact]) -> Result<()>;

    /// Load all notes. A missing backing file means no notes.
    fn load_notes(&self) -> Result<Vec<Note>>;

    /// Replace the persisted notes with `notes`.
    fn save_notes(&mut self, notes: &[Note]) -> Result<()>;

    /// Where the given collection lives, for error messages.
    fn location(&self, kind: EntryKind) -> PathBuf;
}

fn hydration_error<S: DataStore>(
    store: &S,
    kind: EntryKind,
    err: OrganizerError,
) -> OrganizerError {
    match err {
        OrganizerError::Load { .. } => err,
        other => OrganizerError::Load {
            path: store.location(kind),
            reason: other.to_string(),
        },
    }
}

/// Builds an [`AddressBook`] from the store, without an autosave hook.
pub fn load_addressbook<S: DataStore>(store: &S) -> Result<AddressBook> {
    let contacts = store
        .load_contacts()
        .map_err(|e| hydration_error(store, EntryKind::Contact, e))?;

    let mut book = AddressBook::new();
    for contact in contacts {
        book.add_preserving(contact)
            .map_err(|e| hydration_error(store, EntryKind::Contact, e))?;
    }
    info!("event=contacts_loaded count={}", book.len());
    Ok(book)
}

/// Builds a [`Notebook`] from the store, without an autosave hook.
pub fn load_notebook<S: DataStore>(store: &S) -> Result<Notebook> {
    let notes = store
        .load_notes()
        .map_err(|e| hydration_error(store, EntryKind::Note, e))?;

    let mut notebook = Notebook::new();
    for note in notes {
        notebook
            .add_preserving(note)
            .map_err(|e| hydration_error(store, EntryKind::Note, e))?;
    }
    info!("event=notes_loaded count={}", notebook.len());
    Ok(notebook)
}

#[cfg(test)]
mod tests {
    use super::memory::fixtures::StoreFixture;
    use super::*;
    use crate::model::ContactField;
    use chrono::{Duration, Utc};

    #[test]
    fn load_keeps_persisted_timestamps() {
        let old = Utc::now() - Duration::days(30);
        let mut fixture = StoreFixture::new();
        fixture
            .store
            .save_contacts(&[Contact::new("Preserved").unwrap().with_last_modified(old)])
            .unwrap();

        let book = load_addressbook(&fixture.store).unwrap();
        assert_eq!(book.all()[0].last_modified(), old);
        assert!(!book.has_autosave());
    }

    #[test]
    fn duplicate_records_fail_the_whole_load() {
        let mut fixture = StoreFixture::new();
        let dup = Contact::new("Ann").unwrap().with_phone("1").unwrap();
        fixture
            .store
            .save_contacts(&[dup.clone(), Contact::new("Bob").unwrap(), dup])
            .unwrap();

        let err = load_addressbook(&fixture.store).unwrap_err();
        assert!(matches!(err, OrganizerError::Load { .. }));
    }

    #[test]
    fn duplicate_note_titles_fail_the_whole_load() {
        let mut fixture = StoreFixture::new();
        let note = Note::new("Same").unwrap();
        fixture.store.save_notes(&[note.clone(), note]).unwrap();

        assert!(matches!(
            load_notebook(&fixture.store),
            Err(OrganizerError::Load { .. })
        ));
    }

    #[test]
    fn save_then_load_round_trips() {
        let fixture = StoreFixture::new()
            .with_contact("Alice", Some("+123456789"))
            .with_contact("Bob", None)
            .with_note("Shopping", "Buy milk", &["groceries"]);
        let mut store = fixture.store;

        let mut book = load_addressbook(&store).unwrap();
        book.edit("bob", [ContactField::Email(Some("bob@example.com".into()))])
            .unwrap();
        store.save_contacts(book.all()).unwrap();

        let reloaded = load_addressbook(&store).unwrap();
        assert_eq!(reloaded.all(), book.all());

        let notebook = load_notebook(&store).unwrap();
        assert_eq!(notebook.get("Shopping").unwrap().tags(), ["groceries"]);
    }
}
