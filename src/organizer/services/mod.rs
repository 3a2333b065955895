//! # Collection Services
//!
//! [`AddressBook`] and [`Notebook`] are the in-memory repositories the rest of
//! the application talks to. They own their records exclusively and enforce
//! the collection-level rules:
//!
//! - **AddressBook**: names may repeat, but the same normalized name with the
//!   same phone or the same email is a duplicate.
//! - **Notebook**: titles are unique (exact, case-sensitive match).
//!
//! ## Atomicity
//!
//! Every operation either commits fully or fails without touching the
//! collection. Validation runs before any record is replaced.
//!
//! ## Autosave
//!
//! A service may carry a [`PersistHook`]. It is called synchronously with the
//! full record list after each committing mutation (add, edit, delete, tag
//! changes). Services built with `new()` have no hook, which keeps tests free
//! of I/O. The hook runs inside the operation: if it fails, the mutation is
//! undone and the hook error is returned, so the collection is left as it
//! was.
//!
//! ## Edit semantics
//!
//! `edit` mutates the stored record in place: it is the same slot in the
//! collection, validated on a copy first and then swapped in.

use crate::error::{OrganizerError, Result};
use std::fmt;
use std::str::FromStr;

pub mod addressbook;
pub mod notebook;

pub use addressbook::AddressBook;
pub use notebook::{NoteEdit, Notebook};

/// Callback invoked with the whole collection after a committing mutation.
pub type PersistHook<T> = Box<dyn FnMut(&[T]) -> Result<()>>;

/// Orderings offered by [`AddressBook::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSort {
    /// Ascending full name, case-insensitive.
    Name,
    /// Most recently modified first.
    Updated,
}

impl FromStr for ContactSort {
    type Err = OrganizerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(ContactSort::Name),
            "updated" => Ok(ContactSort::Updated),
            other => Err(OrganizerError::InvalidArgument(format!(
                "Unsupported sort key '{}'. Use 'name' or 'updated'.",
                other
            ))),
        }
    }
}

impl fmt::Display for ContactSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactSort::Name => write!(f, "name"),
            ContactSort::Updated => write!(f, "updated"),
        }
    }
}

/// Orderings offered by [`Notebook::sorted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSort {
    /// Ascending title, case-insensitive.
    Title,
    /// Most recently modified first.
    LastModified,
}

impl FromStr for NoteSort {
    type Err = OrganizerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "title" => Ok(NoteSort::Title),
            "last_modified" => Ok(NoteSort::LastModified),
            other => Err(OrganizerError::InvalidArgument(format!(
                "Unsupported sort key '{}'. Use 'title' or 'last_modified'.",
                other
            ))),
        }
    }
}

impl fmt::Display for NoteSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteSort::Title => write!(f, "title"),
            NoteSort::LastModified => write!(f, "last_modified"),
        }
    }
}
