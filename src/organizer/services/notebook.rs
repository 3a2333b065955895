use super::{NoteSort, PersistHook};
use crate::error::{EntryKind, OrganizerError, Result};
use crate::model::{Note, NotePatch};
use log::{debug, info, warn};
use std::fmt;

/// How [`Notebook::edit`] changes a note.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteEdit {
    /// Swap the stored note for this one.
    Replace(Note),
    /// Change only the fields set in the patch.
    Patch(NotePatch),
}

impl From<Note> for NoteEdit {
    fn from(note: Note) -> Self {
        NoteEdit::Replace(note)
    }
}

impl From<NotePatch> for NoteEdit {
    fn from(patch: NotePatch) -> Self {
        NoteEdit::Patch(patch)
    }
}

/// Ordered collection of notes keyed by exact title.
#[derive(Default)]
pub struct Notebook {
    notes: Vec<Note>,
    persist: Option<PersistHook<Note>>,
}

impl fmt::Debug for Notebook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notebook")
            .field("notes", &self.notes)
            .field("autosave", &self.persist.is_some())
            .finish()
    }
}

impl Notebook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_autosave<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&[Note]) -> Result<()> + 'static,
    {
        self.persist = Some(Box::new(hook));
        self
    }

    pub fn has_autosave(&self) -> bool {
        self.persist.is_some()
    }

    fn persist(&mut self) -> Result<()> {
        if let Some(hook) = self.persist.as_mut() {
            hook(&self.notes)?;
        }
        Ok(())
    }

    /// Runs the autosave hook. When it fails, `undo` puts the notes back the
    /// way they were before the mutation and the hook error is returned.
    fn persist_or_undo(&mut self, undo: impl FnOnce(&mut Vec<Note>)) -> Result<()> {
        if let Err(err) = self.persist() {
            warn!("event=note_autosave_failed error={}", err);
            undo(&mut self.notes);
            return Err(err);
        }
        Ok(())
    }

    fn position(&self, title: &str) -> Result<usize> {
        self.notes
            .iter()
            .position(|n| n.title() == title)
            .ok_or_else(|| OrganizerError::NoteNotFound(title.to_string()))
    }

    fn ensure_unique(&self, title: &str, skip: Option<usize>) -> Result<()> {
        let taken = self
            .notes
            .iter()
            .enumerate()
            .any(|(i, n)| Some(i) != skip && n.title() == title);
        if taken {
            return Err(OrganizerError::duplicate(EntryKind::Note, title));
        }
        Ok(())
    }

    /// Adds a note and stamps it as modified now. Titles must be unique.
    pub fn add(&mut self, note: Note) -> Result<()> {
        self.insert(note, false)
    }

    /// Adds a note keeping its `last_modified`. Used when hydrating from
    /// storage.
    pub fn add_preserving(&mut self, note: Note) -> Result<()> {
        self.insert(note, true)
    }

    fn insert(&mut self, mut note: Note, preserve: bool) -> Result<()> {
        if note.title().trim().is_empty() {
            return Err(OrganizerError::validation("Note title cannot be empty."));
        }
        self.ensure_unique(note.title(), None)?;

        if !preserve {
            note.update_modified_time();
        }
        debug!("event=note_add title={:?} preserve={}", note.title(), preserve);
        self.notes.push(note);
        self.persist_or_undo(|notes| {
            notes.pop();
        })
    }

    /// Exact, case-sensitive title lookup.
    pub fn get(&self, title: &str) -> Result<&Note> {
        let index = self.position(title)?;
        Ok(&self.notes[index])
    }

    /// Removes the note titled `title` and hands it back.
    pub fn delete(&mut self, title: &str) -> Result<Note> {
        let index = self.position(title)?;
        let removed = self.notes.remove(index);
        info!("event=note_delete title={:?}", title);
        if let Err(err) = self.persist() {
            warn!("event=note_autosave_failed error={}", err);
            self.notes.insert(index, removed);
            return Err(err);
        }
        Ok(removed)
    }

    /// Replaces or patches the note titled `title` and refreshes its
    /// `last_modified`.
    ///
    /// An empty patch is rejected as a validation error, as is a new title
    /// that belongs to another note (`DuplicateEntry`).
    pub fn edit(&mut self, title: &str, edit: impl Into<NoteEdit>) -> Result<&Note> {
        let index = self.position(title)?;

        let updated = match edit.into() {
            NoteEdit::Replace(mut note) => {
                note.update_modified_time();
                note
            }
            NoteEdit::Patch(patch) => {
                if patch.is_empty() {
                    return Err(OrganizerError::validation(format!(
                        "Nothing to update for note '{}'.",
                        title
                    )));
                }
                let mut note = self.notes[index].clone();
                note.apply(&patch)?;
                note
            }
        };
        self.ensure_unique(updated.title(), Some(index))?;

        debug!("event=note_edit title={:?} new_title={:?}", title, updated.title());
        let previous = std::mem::replace(&mut self.notes[index], updated);
        self.persist_or_undo(|notes| notes[index] = previous)?;
        Ok(&self.notes[index])
    }

    /// Adds `tag` to the note. Returns `false` if it was already tagged.
    pub fn tag(&mut self, title: &str, tag: &str) -> Result<bool> {
        let index = self.position(title)?;
        let previous = self.notes[index].clone();
        let added = self.notes[index].add_tag(tag)?;
        if added {
            self.persist_or_undo(|notes| notes[index] = previous)?;
        }
        Ok(added)
    }

    /// Removes `tag` from the note. Returns `false` if it was not tagged.
    pub fn untag(&mut self, title: &str, tag: &str) -> Result<bool> {
        let index = self.position(title)?;
        let previous = self.notes[index].clone();
        let removed = self.notes[index].remove_tag(tag);
        if removed {
            self.persist_or_undo(|notes| notes[index] = previous)?;
        }
        Ok(removed)
    }

    /// Case-insensitive substring match over title, text and tags.
    pub fn search(&self, query: &str) -> Vec<&Note> {
        let needle = query.to_lowercase();
        self.notes
            .iter()
            .filter(|n| n.search_key().contains(&needle))
            .collect()
    }

    pub fn all(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn sorted(&self, by: NoteSort) -> Vec<&Note> {
        let mut sorted: Vec<&Note> = self.notes.iter().collect();
        match by {
            NoteSort::Title => sorted.sort_by_cached_key(|n| n.title().to_lowercase()),
            NoteSort::LastModified => {
                sorted.sort_by(|a, b| b.last_modified().cmp(&a.last_modified()))
            }
        }
        sorted
    }
}
