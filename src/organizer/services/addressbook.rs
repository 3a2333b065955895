use super::{ContactSort, PersistHook};
use crate::error::{EntryKind, OrganizerError, Result};
use crate::model::{Contact, ContactField};
use crate::validators::normalize_text;
use chrono::{Datelike, Local, NaiveDate};
use log::{debug, info, warn};
use std::fmt;

/// Default look-ahead window for [`AddressBook::upcoming_birthdays`].
pub const DEFAULT_BIRTHDAY_WINDOW: u32 = 7;

/// Ordered collection of contacts, looked up by normalized name.
#[derive(Default)]
pub struct AddressBook {
    contacts: Vec<Contact>,
    persist: Option<PersistHook<Contact>>,
}

impl fmt::Debug for AddressBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressBook")
            .field("contacts", &self.contacts)
            .field("autosave", &self.persist.is_some())
            .finish()
    }
}

fn same_value(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a hook that receives every contact after each committing
    /// mutation.
    pub fn with_autosave<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&[Contact]) -> Result<()> + 'static,
    {
        self.persist = Some(Box::new(hook));
        self
    }

    pub fn has_autosave(&self) -> bool {
        self.persist.is_some()
    }

    fn persist(&mut self) -> Result<()> {
        if let Some(hook) = self.persist.as_mut() {
            hook(&self.contacts)?;
        }
        Ok(())
    }

    /// Runs the autosave hook. When it fails, `undo` puts the contacts back
    /// the way they were before the mutation and the hook error is returned.
    fn persist_or_undo(&mut self, undo: impl FnOnce(&mut Vec<Contact>)) -> Result<()> {
        if let Err(err) = self.persist() {
            warn!("event=contact_autosave_failed error={}", err);
            undo(&mut self.contacts);
            return Err(err);
        }
        Ok(())
    }

    /// Adds a contact and stamps it as modified now.
    ///
    /// Fails with `DuplicateEntry` when a contact with the same normalized
    /// name already has the same phone or the same email.
    pub fn add(&mut self, contact: Contact) -> Result<()> {
        self.insert(contact, false)
    }

    /// Adds a contact keeping its `last_modified`. Used when hydrating from
    /// storage.
    pub fn add_preserving(&mut self, contact: Contact) -> Result<()> {
        self.insert(contact, true)
    }

    fn insert(&mut self, mut contact: Contact, preserve: bool) -> Result<()> {
        if contact.name().trim().is_empty() {
            return Err(OrganizerError::validation(
                "Contact name cannot be empty or None.",
            ));
        }

        let key = normalize_text(contact.name());
        let duplicate = self.contacts.iter().any(|existing| {
            normalize_text(existing.name()) == key
                && (same_value(existing.phone(), contact.phone())
                    || same_value(existing.email(), contact.email()))
        });
        if duplicate {
            return Err(OrganizerError::duplicate(
                EntryKind::Contact,
                contact.full_name(),
            ));
        }

        if !preserve {
            contact.update_modified_time();
        }
        debug!("event=contact_add name={} preserve={}", key, preserve);
        self.contacts.push(contact);
        self.persist_or_undo(|contacts| {
            contacts.pop();
        })
    }

    /// Every contact whose normalized name equals the normalized `name`.
    pub fn get(&self, name: &str) -> Result<Vec<&Contact>> {
        let key = normalize_text(name);
        let matches: Vec<&Contact> = self
            .contacts
            .iter()
            .filter(|c| normalize_text(c.name()) == key)
            .collect();
        if matches.is_empty() {
            return Err(OrganizerError::ContactNotFound(name.to_string()));
        }
        Ok(matches)
    }

    /// Removes every contact matching `name`; returns how many were removed.
    pub fn delete(&mut self, name: &str) -> Result<usize> {
        let key = normalize_text(name);
        let before = self.contacts.clone();
        self.contacts.retain(|c| normalize_text(c.name()) != key);
        let removed = before.len() - self.contacts.len();
        if removed == 0 {
            return Err(OrganizerError::ContactNotFound(name.to_string()));
        }
        info!("event=contact_delete name={} removed={}", key, removed);
        self.persist_or_undo(|contacts| *contacts = before)?;
        Ok(removed)
    }

    /// Applies `fields` to the first contact matching `name`.
    ///
    /// All fields are validated before the contact changes; on success its
    /// `last_modified` is refreshed.
    pub fn edit<I>(&mut self, name: &str, fields: I) -> Result<&Contact>
    where
        I: IntoIterator<Item = ContactField>,
    {
        let key = normalize_text(name);
        let index = self
            .contacts
            .iter()
            .position(|c| normalize_text(c.name()) == key)
            .ok_or_else(|| OrganizerError::ContactNotFound(name.to_string()))?;

        let previous = self.contacts[index].clone();
        self.contacts[index].apply(fields)?;
        debug!("event=contact_edit name={}", key);
        self.persist_or_undo(|contacts| contacts[index] = previous)?;
        Ok(&self.contacts[index])
    }

    /// Contacts whose normalized fields contain the normalized `query`.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Contact> {
        let needle = normalize_text(query);
        self.contacts
            .iter()
            .filter(|c| c.search_key().contains(&needle))
            .collect()
    }

    /// All contacts in insertion order.
    pub fn all(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn sort(&self, by: ContactSort) -> Vec<&Contact> {
        let mut sorted: Vec<&Contact> = self.contacts.iter().collect();
        match by {
            ContactSort::Name => sorted.sort_by_cached_key(|c| c.full_name().to_lowercase()),
            ContactSort::Updated => {
                sorted.sort_by(|a, b| b.last_modified().cmp(&a.last_modified()))
            }
        }
        sorted
    }

    /// Contacts whose birthday falls within the next `days` days, counting
    /// today.
    pub fn upcoming_birthdays(&self, days: u32) -> Vec<&Contact> {
        self.upcoming_birthdays_from(Local::now().date_naive(), days)
    }

    /// Same as [`AddressBook::upcoming_birthdays`] with an explicit `today`.
    ///
    /// The birthday is moved into `today`'s year; contacts born on Feb 29 are
    /// skipped in non-leap years.
    pub fn upcoming_birthdays_from(&self, today: NaiveDate, days: u32) -> Vec<&Contact> {
        self.contacts
            .iter()
            .filter(|c| {
                let Some(birthday) = c.birthday() else {
                    return false;
                };
                let Some(this_year) = birthday.with_year(today.year()) else {
                    return false;
                };
                let delta = (this_year - today).num_days();
                (0..=i64::from(days)).contains(&delta)
            })
            .collect()
    }
}
