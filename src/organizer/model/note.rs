use crate::error::{OrganizerError, Result};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};

/// A titled free-text note with tags.
///
/// The title is trimmed and never blank. Tags are trimmed, never blank, and
/// kept in insertion order without duplicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    title: String,
    text: String,
    tags: Vec<String>,
    last_modified: DateTime<Utc>,
}

/// Partial note update. Only the fields that are `Some` are replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub text: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NotePatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.text.is_none() && self.tags.is_none()
    }
}

fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(OrganizerError::validation("Note title cannot be empty."));
    }
    Ok(trimmed.to_string())
}

fn validate_tag(tag: &str) -> Result<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(OrganizerError::validation("Tag cannot be empty."));
    }
    Ok(trimmed.to_string())
}

fn normalize_tags<I, T>(tags: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut result: Vec<String> = Vec::new();
    for tag in tags {
        let tag = validate_tag(tag.as_ref())?;
        if !result.contains(&tag) {
            result.push(tag);
        }
    }
    Ok(result)
}

impl Note {
    pub fn new(title: &str) -> Result<Self> {
        Ok(Self {
            title: validate_title(title)?,
            text: String::new(),
            tags: Vec::new(),
            last_modified: Utc::now(),
        })
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.tags = normalize_tags(tags)?;
        Ok(self)
    }

    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// Replaces the provided fields. Everything is validated before anything
    /// is assigned, so a failed update leaves the note untouched.
    pub fn update(
        &mut self,
        title: Option<&str>,
        text: Option<&str>,
        tags: Option<&[String]>,
    ) -> Result<()> {
        let title = title.map(validate_title).transpose()?;
        let tags = tags.map(normalize_tags).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(text) = text {
            self.text = text.to_string();
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        self.update_modified_time();
        Ok(())
    }

    pub fn apply(&mut self, patch: &NotePatch) -> Result<()> {
        self.update(
            patch.title.as_deref(),
            patch.text.as_deref(),
            patch.tags.as_deref(),
        )
    }

    /// Appends a tag. Returns `false` when the tag was already present.
    pub fn add_tag(&mut self, tag: &str) -> Result<bool> {
        let tag = validate_tag(tag)?;
        if self.tags.contains(&tag) {
            return Ok(false);
        }
        self.tags.push(tag);
        self.update_modified_time();
        Ok(true)
    }

    /// Removes a tag. Returns `false` when the tag was not present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        if self.tags.len() == before {
            return false;
        }
        self.update_modified_time();
        true
    }

    pub fn update_modified_time(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Lowercased `title text tags...`, matched against search queries.
    pub fn search_key(&self) -> String {
        format!("{} {} {}", self.title, self.text, self.tags.join(" ")).to_lowercase()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = NoteHelper::deserialize(deserializer)?;
        let note = Note::new(&helper.title)
            .map_err(D::Error::custom)?
            .with_text(helper.text.unwrap_or_default())
            .with_tags(helper.tags)
            .map_err(D::Error::custom)?;
        Ok(note.with_last_modified(helper.last_modified))
    }
}

#[derive(Deserialize)]
struct NoteHelper {
    title: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    last_modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn note_creation() {
        let note = Note::new("Buy Milk")
            .unwrap()
            .with_text("Remember to buy milk.")
            .with_tags(["shopping"])
            .unwrap();
        assert_eq!(note.title(), "Buy Milk");
        assert_eq!(note.tags(), ["shopping"]);
    }

    #[test]
    fn minimal_note_has_empty_text_and_tags() {
        let note = Note::new("  Minimal ").unwrap();
        assert_eq!(note.title(), "Minimal");
        assert_eq!(note.text(), "");
        assert!(note.tags().is_empty());
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(matches!(Note::new(""), Err(OrganizerError::Validation(_))));
        assert!(Note::new("   ").is_err());
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let note = Note::new("T")
            .unwrap()
            .with_tags([" work ", "home", "work"])
            .unwrap();
        assert_eq!(note.tags(), ["work", "home"]);

        assert!(Note::new("T").unwrap().with_tags(["ok", " "]).is_err());
    }

    #[test]
    fn add_tag_appends_once() {
        let mut note = Note::new("T").unwrap();
        assert!(note.add_tag(" urgent ").unwrap());
        assert!(!note.add_tag("urgent").unwrap());
        assert_eq!(note.tags(), ["urgent"]);
        assert!(note.add_tag("").is_err());
    }

    #[test]
    fn remove_tag_reports_presence() {
        let mut note = Note::new("T").unwrap().with_tags(["a", "b"]).unwrap();
        assert!(note.remove_tag("a"));
        assert!(!note.remove_tag("a"));
        assert_eq!(note.tags(), ["b"]);
    }

    #[test]
    fn update_replaces_only_given_fields() {
        let old = Utc::now() - Duration::minutes(5);
        let mut note = Note::new("Plan")
            .unwrap()
            .with_text("Old text")
            .with_tags(["old"])
            .unwrap()
            .with_last_modified(old);

        let tags = vec!["updated".to_string(), "new".to_string()];
        note.update(None, None, Some(tags.as_slice())).unwrap();

        assert_eq!(note.title(), "Plan");
        assert_eq!(note.text(), "Old text");
        assert_eq!(note.tags(), ["updated", "new"]);
        assert!(note.last_modified() > old);
    }

    #[test]
    fn failed_update_leaves_note_untouched() {
        let mut note = Note::new("Plan").unwrap().with_text("keep");
        let snapshot = note.clone();

        assert!(note.update(Some("  "), Some("changed"), None).is_err());
        assert_eq!(note, snapshot);
    }

    #[test]
    fn search_key_joins_title_text_and_tags() {
        let note = Note::new("Shopping")
            .unwrap()
            .with_text("Buy MILK")
            .with_tags(["groceries", "urgent"])
            .unwrap();
        assert_eq!(note.search_key(), "shopping buy milk groceries urgent");
    }

    #[test]
    fn deserialize_requires_title_and_timestamp() {
        let missing_title = r#"{"text": "Some text", "tags": [], "last_modified": "2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Note>(missing_title).is_err());

        let missing_time = r#"{"title": "T"}"#;
        assert!(serde_json::from_str::<Note>(missing_time).is_err());

        let ok = r#"{"title": "T", "text": null, "last_modified": "2024-01-01T00:00:00Z"}"#;
        let note: Note = serde_json::from_str(ok).unwrap();
        assert_eq!(note.text(), "");
    }
}
