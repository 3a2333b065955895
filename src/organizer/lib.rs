//! # Organizer Architecture
//!
//! Organizer keeps two record collections, contacts and notes, and is a
//! library first: the command-line binary is one client of it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - Turns load failures into warnings and empty collections  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Service Layer (services/)                                  │
//! │  - AddressBook, Notebook: lookup, duplicates, search, sort  │
//! │  - Each operation commits fully or leaves state untouched   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model Layer (model/, validators.rs)                        │
//! │  - Contact, Note: records that are valid by construction    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DataStore trait                                 │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! Services, models and validators never touch stdout, stderr or the
//! filesystem. Persistence reaches a service only through an optional
//! autosave hook, so the same core can be driven from tests with no disk.
//!
//! ## Module Overview
//!
//! - [`services`]: `AddressBook` and `Notebook`
//! - [`model`]: `Contact`, `Note` and their update types
//! - [`validators`]: phone, email and name rules
//! - [`store`]: storage abstraction and implementations
//! - [`config`]: per-data-directory configuration
//! - [`logging`]: logger bootstrap for the binary
//! - [`error`]: error types
//! - `cli`: argument parsing and rendering for the binary (not part of the lib API)

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod services;
pub mod store;
pub mod validators;
