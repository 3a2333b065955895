use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which collection a duplicate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Contact,
    Note,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Contact => write!(f, "Contact"),
            EntryKind::Note => write!(f, "Note"),
        }
    }
}

#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("{0}")]
    Validation(String),

    #[error("Contact '{0}' not found.")]
    ContactNotFound(String),

    #[error("Note '{0}' not found.")]
    NoteNotFound(String),

    #[error("{kind} '{identifier}' already exists.")]
    DuplicateEntry { kind: EntryKind, identifier: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OrganizerError {
    pub fn validation(message: impl Into<String>) -> Self {
        OrganizerError::Validation(message.into())
    }

    pub fn duplicate(kind: EntryKind, identifier: impl Into<String>) -> Self {
        OrganizerError::DuplicateEntry {
            kind,
            identifier: identifier.into(),
        }
    }

    /// True for errors the user can fix by correcting their input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            OrganizerError::Validation(_)
                | OrganizerError::ContactNotFound(_)
                | OrganizerError::NoteNotFound(_)
                | OrganizerError::DuplicateEntry { .. }
                | OrganizerError::InvalidArgument(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OrganizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_carry_the_key() {
        let err = OrganizerError::ContactNotFound("Ghost".into());
        assert_eq!(err.to_string(), "Contact 'Ghost' not found.");

        let err = OrganizerError::NoteNotFound("NonExistent".into());
        assert!(err.to_string().contains("NonExistent"));
    }

    #[test]
    fn duplicate_message_names_kind_and_identifier() {
        let err = OrganizerError::duplicate(EntryKind::Note, "Same");
        assert_eq!(err.to_string(), "Note 'Same' already exists.");
    }

    #[test]
    fn load_error_mentions_path() {
        let err = OrganizerError::Load {
            path: PathBuf::from("/tmp/contacts.json"),
            reason: "expected value".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load /tmp/contacts.json: expected value"
        );
        assert!(!err.is_user_error());
    }

    #[test]
    fn bad_input_is_a_user_error() {
        assert!(OrganizerError::validation("Invalid phone").is_user_error());
        assert!(OrganizerError::InvalidArgument("bad sort key".into()).is_user_error());
        assert!(!OrganizerError::Config("unreadable".into()).is_user_error());
    }
}
