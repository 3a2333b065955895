use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use organizer::error::{OrganizerError, Result};
use organizer::model::ContactField;
use organizer::validators::trimmed_or_none;
use std::path::PathBuf;

const BIRTHDAY_INPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Parser, Debug)]
#[command(name = "organizer", bin_name = "organizer", version)]
#[command(about = "Personal organizer for contacts and notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding contacts.json, notes.json and config.json
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage contacts
    #[command(subcommand, alias = "c")]
    Contact(ContactCommands),

    /// Manage notes
    #[command(subcommand, alias = "n")]
    Note(NoteCommands),

    /// Show or set configuration (birthday-days, autosave, log-level)
    Config {
        key: Option<String>,
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    /// Add a contact
    Add {
        name: String,

        #[command(flatten)]
        fields: ContactFieldArgs,
    },

    /// List contacts
    #[command(alias = "ls")]
    List {
        /// Sort by "name" or "updated"
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Show every contact with the given name
    Show { name: String },

    /// Edit the first contact with the given name; an empty value clears a field
    Edit {
        name: String,

        /// New first name
        #[arg(long = "name", value_name = "NAME")]
        new_name: Option<String>,

        #[command(flatten)]
        fields: ContactFieldArgs,
    },

    /// Delete every contact with the given name
    #[command(alias = "rm")]
    Delete { name: String },

    /// Search all contact fields
    Search { query: Option<String> },

    /// List contacts with a birthday in the coming days
    Birthdays {
        /// Look-ahead window in days (defaults to the birthday-days setting)
        #[arg(short, long)]
        days: Option<u32>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ContactFieldArgs {
    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD")]
    pub birthday: Option<String>,
}

impl ContactFieldArgs {
    /// Converts the flags that were given into field updates. A flag given
    /// with an empty value becomes a clearing update.
    pub fn into_fields(self) -> Result<Vec<ContactField>> {
        let mut fields = Vec::new();
        if let Some(v) = self.last_name {
            fields.push(ContactField::LastName(trimmed_or_none(Some(&v))));
        }
        if let Some(v) = self.company {
            fields.push(ContactField::Company(trimmed_or_none(Some(&v))));
        }
        if let Some(v) = self.phone {
            fields.push(ContactField::Phone(trimmed_or_none(Some(&v))));
        }
        if let Some(v) = self.address {
            fields.push(ContactField::Address(trimmed_or_none(Some(&v))));
        }
        if let Some(v) = self.email {
            fields.push(ContactField::Email(trimmed_or_none(Some(&v))));
        }
        if let Some(v) = self.birthday {
            fields.push(ContactField::Birthday(parse_birthday(&v)?));
        }
        Ok(fields)
    }
}

fn parse_birthday(value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, BIRTHDAY_INPUT_FORMAT)
        .map(Some)
        .map_err(|_| {
            OrganizerError::validation(format!(
                "Invalid birthday '{}'. Use YYYY-MM-DD.",
                value
            ))
        })
}

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Add a note
    Add {
        title: String,

        #[arg(short, long)]
        text: Option<String>,

        /// Tag to attach (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// List notes
    #[command(alias = "ls")]
    List {
        /// Sort by "title" or "last_modified"
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Show a note
    Show { title: String },

    /// Edit a note's title, text or tags
    Edit {
        title: String,

        /// New title
        #[arg(long = "title", value_name = "TITLE")]
        new_title: Option<String>,

        #[arg(short, long)]
        text: Option<String>,

        /// Replacement tag list (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Remove all tags
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },

    /// Delete a note
    #[command(alias = "rm")]
    Delete { title: String },

    /// Search titles, text and tags
    Search { query: Option<String> },

    /// Attach a tag to a note
    Tag { title: String, tag: String },

    /// Remove a tag from a note
    Untag { title: String, tag: String },
}
