//! # Rendering
//!
//! Turns records into terminal text. Layout math (width, truncation, padding)
//! is Unicode-aware so names with wide characters still line up. Every
//! function returns a `String`; printing happens in the command handlers.

use chrono::{DateTime, Utc};
use colored::Colorize;
use organizer::config::OrganizerConfig;
use organizer::model::{Contact, Note};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
const NAME_WIDTH: usize = 28;
const PHONE_WIDTH: usize = 16;
const EMAIL_WIDTH: usize = 28;
const TITLE_WIDTH: usize = 24;
const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

pub fn render_message(level: MessageLevel, content: &str) -> String {
    match level {
        MessageLevel::Info => content.dimmed().to_string(),
        MessageLevel::Success => content.green().to_string(),
        MessageLevel::Warning => format!("{} {}", "Warning:".yellow(), content.yellow()),
    }
}

pub fn print_message(level: MessageLevel, content: &str) {
    match level {
        MessageLevel::Warning => eprintln!("{}", render_message(level, content)),
        _ => println!("{}", render_message(level, content)),
    }
}

pub fn render_contact_list(contacts: &[&Contact]) -> String {
    if contacts.is_empty() {
        return "No contacts found.".dimmed().to_string();
    }

    let mut out = String::new();
    for (i, contact) in contacts.iter().enumerate() {
        let index = format!("{:>3}. ", i + 1);
        let name = fit(&contact.full_name(), NAME_WIDTH);
        let phone = fit(contact.phone().unwrap_or("-"), PHONE_WIDTH);
        let email = fit(contact.email().unwrap_or("-"), EMAIL_WIDTH);

        let used = index.width() + NAME_WIDTH + PHONE_WIDTH + EMAIL_WIDTH;
        let gap = LINE_WIDTH.saturating_sub(used + TIME_WIDTH);

        out.push_str(&format!(
            "{}{}{}{}{}{}\n",
            index.yellow(),
            name.bold(),
            phone,
            email,
            " ".repeat(gap),
            format_time_ago(contact.last_modified()).dimmed()
        ));
    }
    out
}

pub fn render_contact(contact: &Contact) -> String {
    let mut out = format!("{}\n", contact.full_name().bold());
    out.push_str("--------------------------------\n");

    let birthday = contact.birthday().map(|d| d.format("%Y-%m-%d").to_string());
    let rows = [
        ("Company", contact.company().map(str::to_string)),
        ("Phone", contact.phone().map(str::to_string)),
        ("Email", contact.email().map(str::to_string)),
        ("Address", contact.address().map(str::to_string)),
        ("Birthday", birthday),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            out.push_str(&format!("{:<10}{}\n", format!("{}:", label), value));
        }
    }
    out.push_str(&format!(
        "{}\n",
        format!("Modified {}", format_time_ago(contact.last_modified()).trim()).dimmed()
    ));
    out
}

pub fn render_contacts(contacts: &[&Contact]) -> String {
    contacts
        .iter()
        .map(|c| render_contact(c))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_birthdays(contacts: &[&Contact], days: u32) -> String {
    if contacts.is_empty() {
        return format!("No birthdays in the next {} days.", days)
            .dimmed()
            .to_string();
    }

    let mut out = String::new();
    for contact in contacts {
        let date = contact
            .birthday()
            .map(|d| d.format("%d %b").to_string())
            .unwrap_or_default();
        out.push_str(&format!("  {}  {}\n", date.yellow(), contact.full_name()));
    }
    out
}

pub fn render_note_list(notes: &[&Note]) -> String {
    if notes.is_empty() {
        return "No notes found.".dimmed().to_string();
    }

    let mut out = String::new();
    for (i, note) in notes.iter().enumerate() {
        let index = format!("{:>3}. ", i + 1);
        let title = fit(note.title(), TITLE_WIDTH);
        let tags = if note.tags().is_empty() {
            String::new()
        } else {
            format!("[{}] ", note.tags().join(", "))
        };
        let preview: String = note
            .text()
            .chars()
            .take(PREVIEW_CHARS)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();

        let fixed = index.width() + TITLE_WIDTH + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let rest = truncate_to_width(&format!("{}{}", tags, preview), available);
        let padding = available.saturating_sub(rest.width());

        out.push_str(&format!(
            "{}{}{}{}{}\n",
            index.yellow(),
            title.bold(),
            rest,
            " ".repeat(padding),
            format_time_ago(note.last_modified()).dimmed()
        ));
    }
    out
}

pub fn render_note(note: &Note) -> String {
    let mut out = format!("{}\n", note.title().bold());
    if !note.tags().is_empty() {
        out.push_str(&format!("{}\n", note.tags().join(", ").cyan()));
    }
    out.push_str("--------------------------------\n");
    if !note.text().is_empty() {
        out.push_str(note.text());
        out.push('\n');
    }
    out.push_str(&format!(
        "{}\n",
        format!("Modified {}", format_time_ago(note.last_modified()).trim()).dimmed()
    ));
    out
}

pub fn render_config(config: &OrganizerConfig) -> String {
    format!(
        "birthday-days = {}\nautosave = {}\nlog-level = {}\n",
        config.birthday_window_days, config.autosave, config.log_level
    )
}

pub fn render_summary(contacts: &[&Contact], notes: &[&Note]) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        format!("Contacts ({})", contacts.len()).bold(),
        render_contact_list(contacts).trim_end(),
        format!("Notes ({})", notes.len()).bold(),
        render_note_list(notes)
    )
}

/// Truncates or pads `s` to exactly `width` columns.
fn fit(s: &str, width: usize) -> String {
    let cell = truncate_to_width(s, width.saturating_sub(1));
    let padding = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
