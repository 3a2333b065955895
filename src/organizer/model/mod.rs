//! Record types held by the collection services.
//!
//! - [`Contact`]: a person, with validated phone/email and capitalized names
//! - [`Note`]: a titled text with tags
//!
//! Both stamp `last_modified` on creation and on every mutation. Fields are
//! only reachable through accessors; changes go through [`ContactField`] and
//! [`NotePatch`], which validate before anything is stored.

pub mod contact;
pub mod note;

pub use contact::{Contact, ContactField};
pub use note::{Note, NotePatch};
