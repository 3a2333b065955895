use super::DataStore;
use crate::error::{EntryKind, OrganizerError, Result};
use crate::model::{Contact, Note};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

/// Store that keeps each collection as the JSON text a [`super::fs::FileStore`]
/// would write, so loads go through the same deserialization path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    contacts: Option<String>,
    notes: Option<String>,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves across both collections.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Replaces the raw persisted text of a collection.
    pub fn set_raw(&mut self, kind: EntryKind, raw: impl Into<String>) {
        match kind {
            EntryKind::Contact => self.contacts = Some(raw.into()),
            EntryKind::Note => self.notes = Some(raw.into()),
        }
    }

    fn decode<T: DeserializeOwned>(
        &self,
        kind: EntryKind,
        raw: Option<&String>,
    ) -> Result<Vec<T>> {
        match raw {
            None => Ok(Vec::new()),
            Some(text) => serde_json::from_str(text).map_err(|e| OrganizerError::Load {
                path: self.location(kind),
                reason: e.to_string(),
            }),
        }
    }

    fn encode<T: Serialize>(records: &[T]) -> Result<String> {
        serde_json::to_string(records).map_err(OrganizerError::Serialization)
    }
}

impl DataStore for InMemoryStore {
    fn load_contacts(&self) -> Result<Vec<Contact>> {
        self.decode(EntryKind::Contact, self.contacts.as_ref())
    }

    fn save_contacts(&mut self, contacts: &[Contact]) -> Result<()> {
        self.contacts = Some(Self::encode(contacts)?);
        self.saves += 1;
        Ok(())
    }

    fn load_notes(&self) -> Result<Vec<Note>> {
        self.decode(EntryKind::Note, self.notes.as_ref())
    }

    fn save_notes(&mut self, notes: &[Note]) -> Result<()> {
        self.notes = Some(Self::encode(notes)?);
        self.saves += 1;
        Ok(())
    }

    fn location(&self, kind: EntryKind) -> PathBuf {
        match kind {
            EntryKind::Contact => PathBuf::from("memory/contacts.json"),
            EntryKind::Note => PathBuf::from("memory/notes.json"),
        }
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct StoreFixture {
        pub store: InMemoryStore,
        contacts: Vec<Contact>,
        notes: Vec<Note>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                contacts: Vec::new(),
                notes: Vec::new(),
            }
        }

        pub fn with_contact(mut self, name: &str, phone: Option<&str>) -> Self {
            let mut contact = Contact::new(name).unwrap();
            if let Some(phone) = phone {
                contact = contact.with_phone(phone).unwrap();
            }
            self.contacts.push(contact);
            self.store.save_contacts(&self.contacts).unwrap();
            self
        }

        pub fn with_note(mut self, title: &str, text: &str, tags: &[&str]) -> Self {
            let note = Note::new(title)
                .unwrap()
                .with_text(text)
                .with_tags(tags.iter().copied())
                .unwrap();
            self.notes.push(note);
            self.store.save_notes(&self.notes).unwrap();
            self
        }
    }
}
