//! # CLI Layer
//!
//! The command-line shell is one client of the organizer library. It is the
//! only place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Decides where data lives on disk
//! - Catches load failures and turns them into warnings
//!
//! ## Structure
//!
//! - `run()`: argument parsing and dispatch (called by `main.rs`)
//! - `init_context()`: loads config and both collections, wires autosave
//! - `handle_*()`: per-command handlers that call the services and print
//!
//! ## Saving
//!
//! A collection that loaded cleanly is written back after every change:
//! through the service's autosave hook when `autosave` is on, or once at the
//! end of the command when it is off. A collection that failed to load is
//! replaced by an empty one and never written, so the unreadable file stays
//! as it was.

use super::render::{
    print_message, render_birthdays, render_config, render_contact, render_contact_list,
    render_contacts, render_note, render_note_list, render_summary, MessageLevel,
};
use super::setup::{Cli, Commands, ContactCommands, NoteCommands};
use clap::Parser;
use directories::ProjectDirs;
use log::{debug, warn};
use organizer::config::OrganizerConfig;
use organizer::error::{EntryKind, OrganizerError, Result};
use organizer::logging::{active_level, init_logging};
use organizer::model::{Contact, ContactField, Note, NotePatch};
use organizer::services::{AddressBook, ContactSort, NoteSort, Notebook};
use organizer::store::fs::FileStore;
use organizer::store::{load_addressbook, load_notebook, DataStore};
use std::path::{Path, PathBuf};

struct AppContext {
    store: FileStore,
    config: OrganizerConfig,
    book: AddressBook,
    notebook: Notebook,
    contacts_loaded: bool,
    notes_loaded: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;

    let config = match OrganizerConfig::load(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            print_message(MessageLevel::Warning, &format!("{}. Using defaults.", e));
            OrganizerConfig::default()
        }
    };

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    if let Err(e) = init_logging(level) {
        print_message(MessageLevel::Warning, &e);
    }
    debug!(
        "event=cli_start data_dir={} log_level={}",
        data_dir.display(),
        active_level().unwrap_or("off")
    );

    match cli.command {
        Some(Commands::Config { key, value }) => handle_config(&data_dir, config, key, value),
        Some(Commands::Contact(cmd)) => {
            let mut ctx = init_context(&data_dir, config);
            handle_contact(&mut ctx, cmd)
        }
        Some(Commands::Note(cmd)) => {
            let mut ctx = init_context(&data_dir, config);
            handle_note(&mut ctx, cmd)
        }
        None => {
            let ctx = init_context(&data_dir, config);
            handle_summary(&ctx)
        }
    }
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    ProjectDirs::from("com", "organizer", "organizer")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            OrganizerError::Config(
                "Could not determine a data directory; pass --data-dir".to_string(),
            )
        })
}

fn init_context(data_dir: &Path, config: OrganizerConfig) -> AppContext {
    let store = FileStore::new(data_dir);

    let (mut book, contacts_loaded) = match load_addressbook(&store) {
        Ok(book) => (book, true),
        Err(e) => {
            report_load_failure(EntryKind::Contact, &e);
            (AddressBook::new(), false)
        }
    };
    let (mut notebook, notes_loaded) = match load_notebook(&store) {
        Ok(notebook) => (notebook, true),
        Err(e) => {
            report_load_failure(EntryKind::Note, &e);
            (Notebook::new(), false)
        }
    };

    if config.autosave {
        if contacts_loaded {
            let mut hook_store = store.clone();
            book = book.with_autosave(move |contacts| hook_store.save_contacts(contacts));
        }
        if notes_loaded {
            let mut hook_store = store.clone();
            notebook = notebook.with_autosave(move |notes| hook_store.save_notes(notes));
        }
    }

    AppContext {
        store,
        config,
        book,
        notebook,
        contacts_loaded,
        notes_loaded,
    }
}

fn report_load_failure(kind: EntryKind, err: &OrganizerError) {
    warn!("event=load_failed kind={} error={}", kind, err);
    print_message(
        MessageLevel::Warning,
        &format!(
            "{}. Starting with no {}s; changes will not be saved.",
            err,
            kind.to_string().to_lowercase()
        ),
    );
}

impl AppContext {
    /// Writes contacts when the command changed them and no hook already did.
    fn commit_contacts(&mut self) -> Result<()> {
        if self.book.has_autosave() {
            return Ok(());
        }
        if !self.contacts_loaded {
            print_message(MessageLevel::Warning, "Contacts were not saved.");
            return Ok(());
        }
        self.store.save_contacts(self.book.all())
    }

    fn commit_notes(&mut self) -> Result<()> {
        if self.notebook.has_autosave() {
            return Ok(());
        }
        if !self.notes_loaded {
            print_message(MessageLevel::Warning, "Notes were not saved.");
            return Ok(());
        }
        self.store.save_notes(self.notebook.all())
    }
}

fn handle_summary(ctx: &AppContext) -> Result<()> {
    let contacts: Vec<&Contact> = ctx.book.all().iter().collect();
    let notes: Vec<&Note> = ctx.notebook.all().iter().collect();
    print!("{}", render_summary(&contacts, &notes));
    Ok(())
}

fn handle_contact(ctx: &mut AppContext, cmd: ContactCommands) -> Result<()> {
    match cmd {
        ContactCommands::Add { name, fields } => {
            let mut contact = Contact::new(&name)?;
            contact.apply(fields.into_fields()?)?;
            let label = contact.full_name();
            ctx.book.add(contact)?;
            ctx.commit_contacts()?;
            print_message(MessageLevel::Success, &format!("Contact '{}' added.", label));
        }
        ContactCommands::List { sort } => {
            let contacts = match sort {
                Some(key) => ctx.book.sort(key.parse::<ContactSort>()?),
                None => ctx.book.all().iter().collect(),
            };
            print!("{}", render_contact_list(&contacts));
        }
        ContactCommands::Show { name } => {
            let contacts = ctx.book.get(&name)?;
            print!("{}", render_contacts(&contacts));
        }
        ContactCommands::Edit {
            name,
            new_name,
            fields,
        } => {
            let mut updates: Vec<ContactField> =
                new_name.map(ContactField::Name).into_iter().collect();
            updates.extend(fields.into_fields()?);
            if updates.is_empty() {
                return Err(OrganizerError::InvalidArgument(
                    "Nothing to change. Pass at least one field option.".to_string(),
                ));
            }
            let rendered = render_contact(ctx.book.edit(&name, updates)?);
            ctx.commit_contacts()?;
            print_message(MessageLevel::Success, "Contact updated.");
            print!("{}", rendered);
        }
        ContactCommands::Delete { name } => {
            let removed = ctx.book.delete(&name)?;
            ctx.commit_contacts()?;
            print_message(
                MessageLevel::Success,
                &format!("Deleted {} contact(s) named '{}'.", removed, name),
            );
        }
        ContactCommands::Search { query } => {
            let found = ctx.book.search(query.as_deref().unwrap_or(""));
            print!("{}", render_contact_list(&found));
        }
        ContactCommands::Birthdays { days } => {
            let days = days.unwrap_or(ctx.config.birthday_window_days);
            let upcoming = ctx.book.upcoming_birthdays(days);
            print!("{}", render_birthdays(&upcoming, days));
        }
    }
    Ok(())
}

fn handle_note(ctx: &mut AppContext, cmd: NoteCommands) -> Result<()> {
    match cmd {
        NoteCommands::Add { title, text, tags } => {
            let note = Note::new(&title)?
                .with_text(text.unwrap_or_default())
                .with_tags(&tags)?;
            let label = note.title().to_string();
            ctx.notebook.add(note)?;
            ctx.commit_notes()?;
            print_message(MessageLevel::Success, &format!("Note '{}' added.", label));
        }
        NoteCommands::List { sort } => {
            let notes = match sort {
                Some(key) => ctx.notebook.sorted(key.parse::<NoteSort>()?),
                None => ctx.notebook.all().iter().collect(),
            };
            print!("{}", render_note_list(&notes));
        }
        NoteCommands::Show { title } => {
            print!("{}", render_note(ctx.notebook.get(&title)?));
        }
        NoteCommands::Edit {
            title,
            new_title,
            text,
            tags,
            clear_tags,
        } => {
            let tags = if clear_tags {
                Some(Vec::new())
            } else if tags.is_empty() {
                None
            } else {
                Some(tags)
            };
            let patch = NotePatch {
                title: new_title,
                text,
                tags,
            };
            let rendered = render_note(ctx.notebook.edit(&title, patch)?);
            ctx.commit_notes()?;
            print_message(MessageLevel::Success, "Note updated.");
            print!("{}", rendered);
        }
        NoteCommands::Delete { title } => {
            let removed = ctx.notebook.delete(&title)?;
            ctx.commit_notes()?;
            print_message(
                MessageLevel::Success,
                &format!("Note '{}' deleted.", removed.title()),
            );
        }
        NoteCommands::Search { query } => {
            let found = ctx.notebook.search(query.as_deref().unwrap_or(""));
            print!("{}", render_note_list(&found));
        }
        NoteCommands::Tag { title, tag } => {
            if ctx.notebook.tag(&title, &tag)? {
                ctx.commit_notes()?;
                print_message(
                    MessageLevel::Success,
                    &format!("Tagged '{}' with '{}'.", title, tag.trim()),
                );
            } else {
                print_message(
                    MessageLevel::Info,
                    &format!("'{}' already has tag '{}'.", title, tag.trim()),
                );
            }
        }
        NoteCommands::Untag { title, tag } => {
            if ctx.notebook.untag(&title, &tag)? {
                ctx.commit_notes()?;
                print_message(
                    MessageLevel::Success,
                    &format!("Removed tag '{}' from '{}'.", tag.trim(), title),
                );
            } else {
                print_message(
                    MessageLevel::Info,
                    &format!("'{}' has no tag '{}'.", title, tag.trim()),
                );
            }
        }
    }
    Ok(())
}

fn handle_config(
    data_dir: &Path,
    mut config: OrganizerConfig,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    match (key, value) {
        (None, _) => print!("{}", render_config(&config)),
        (Some(key), None) => println!("{} = {}", key, config.get(&key)?),
        (Some(key), Some(value)) => {
            config.set(&key, &value)?;
            config.save(data_dir)?;
            print_message(
                MessageLevel::Success,
                &format!("{} = {}", key, config.get(&key)?),
            );
        }
    }
    Ok(())
}
