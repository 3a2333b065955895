use crate::error::Result;
use crate::validators::{
    capitalize_name, normalize_text, trimmed_or_none, validate_email, validate_phone,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};

/// Day-first format used when birthdays take part in search.
pub const BIRTHDAY_SEARCH_FORMAT: &str = "%d-%m-%Y";

/// A person in the address book.
///
/// Fields are private so the invariants hold for the lifetime of the value:
/// `name` is never blank and is capitalized, `phone`/`email` always pass
/// their validators. Mutation goes through [`Contact::apply`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    name: String,
    last_name: Option<String>,
    company: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    birthday: Option<NaiveDate>,
    email: Option<String>,
    last_modified: DateTime<Utc>,
}

/// A single recognised contact field change.
///
/// `None` (or a blank string) clears an optional field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactField {
    Name(String),
    LastName(Option<String>),
    Company(Option<String>),
    Phone(Option<String>),
    Address(Option<String>),
    Email(Option<String>),
    Birthday(Option<NaiveDate>),
}

impl Contact {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: capitalize_name(name)?,
            last_name: None,
            company: None,
            phone: None,
            address: None,
            birthday: None,
            email: None,
            last_modified: Utc::now(),
        })
    }

    /// Validates and stores `field` during construction.
    pub fn with(mut self, field: ContactField) -> Result<Self> {
        self.set(field)?;
        Ok(self)
    }

    pub fn with_last_name(self, last_name: &str) -> Result<Self> {
        self.with(ContactField::LastName(Some(last_name.to_string())))
    }

    pub fn with_company(self, company: &str) -> Result<Self> {
        self.with(ContactField::Company(Some(company.to_string())))
    }

    pub fn with_phone(self, phone: &str) -> Result<Self> {
        self.with(ContactField::Phone(Some(phone.to_string())))
    }

    pub fn with_address(self, address: &str) -> Result<Self> {
        self.with(ContactField::Address(Some(address.to_string())))
    }

    pub fn with_email(self, email: &str) -> Result<Self> {
        self.with(ContactField::Email(Some(email.to_string())))
    }

    pub fn with_birthday(self, birthday: NaiveDate) -> Result<Self> {
        self.with(ContactField::Birthday(Some(birthday)))
    }

    /// Overrides the modification timestamp. Used when restoring persisted
    /// records.
    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// Validates and stores one field. Does not touch `last_modified`.
    fn set(&mut self, field: ContactField) -> Result<()> {
        match field {
            ContactField::Name(name) => self.name = capitalize_name(&name)?,
            ContactField::LastName(value) => {
                self.last_name = match trimmed_or_none(value.as_deref()) {
                    Some(v) => Some(capitalize_name(&v)?),
                    None => None,
                }
            }
            ContactField::Company(value) => self.company = trimmed_or_none(value.as_deref()),
            ContactField::Address(value) => self.address = trimmed_or_none(value.as_deref()),
            ContactField::Phone(value) => {
                self.phone = match value.filter(|v| !v.trim().is_empty()) {
                    Some(v) => Some(validate_phone(&v)?),
                    None => None,
                }
            }
            ContactField::Email(value) => {
                self.email = match value.filter(|v| !v.trim().is_empty()) {
                    Some(v) => Some(validate_email(&v)?),
                    None => None,
                }
            }
            ContactField::Birthday(value) => self.birthday = value,
        }
        Ok(())
    }

    /// Applies all `fields` or none of them, then refreshes `last_modified`.
    pub fn apply<I>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = ContactField>,
    {
        let mut updated = self.clone();
        for field in fields {
            updated.set(field)?;
        }
        updated.update_modified_time();
        *self = updated;
        Ok(())
    }

    pub fn update_modified_time(&mut self) {
        self.last_modified = Utc::now();
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name.as_deref().unwrap_or(""))
            .trim()
            .to_string()
    }

    /// Normalized concatenation of every field, matched against search queries.
    pub fn search_key(&self) -> String {
        let birthday = self
            .birthday
            .map(|d| d.format(BIRTHDAY_SEARCH_FORMAT).to_string());
        let fields = [
            Some(self.name.as_str()),
            self.last_name.as_deref(),
            self.company.as_deref(),
            self.phone.as_deref(),
            self.address.as_deref(),
            self.email.as_deref(),
            birthday.as_deref(),
        ];
        let combined = fields
            .iter()
            .map(|f| f.unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ");
        normalize_text(&combined)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }
}

// Persisted contacts go through the same validation as new ones, so a
// hand-edited file with a bad phone or a blank name fails to load.
impl<'de> Deserialize<'de> for Contact {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = ContactHelper::deserialize(deserializer)?;
        let fields = [
            ContactField::LastName(helper.last_name),
            ContactField::Company(helper.company),
            ContactField::Phone(helper.phone),
            ContactField::Address(helper.address),
            ContactField::Email(helper.email),
            ContactField::Birthday(helper.birthday),
        ];

        let mut contact = Contact::new(&helper.name).map_err(D::Error::custom)?;
        for field in fields {
            contact.set(field).map_err(D::Error::custom)?;
        }
        Ok(contact.with_last_modified(helper.last_modified))
    }
}

#[derive(Deserialize)]
struct ContactHelper {
    name: String,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    birthday: Option<NaiveDate>,
    #[serde(default)]
    email: Option<String>,
    last_modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrganizerError;
    use chrono::Duration;

    #[test]
    fn new_contact_is_capitalized_and_stamped() {
        let before = Utc::now();
        let contact = Contact::new("john")
            .unwrap()
            .with_email("john@example.com")
            .unwrap()
            .with_phone("+123456789")
            .unwrap();

        assert_eq!(contact.name(), "John");
        assert_eq!(contact.email(), Some("john@example.com"));
        assert_eq!(contact.phone(), Some("+123456789"));
        assert!(contact.last_modified() >= before);
    }

    #[test]
    fn blank_name_is_rejected() {
        for name in ["", "   ", "\n\t"] {
            assert!(matches!(
                Contact::new(name),
                Err(OrganizerError::Validation(_))
            ));
        }
    }

    #[test]
    fn invalid_phone_and_email_are_rejected() {
        let base = Contact::new("john").unwrap();
        assert!(base.clone().with_email("not-an-email").is_err());
        assert!(base.with_phone("invalid-phone").is_err());
    }

    #[test]
    fn last_name_is_capitalized_and_full_name_joins() {
        let contact = Contact::new("john").unwrap().with_last_name("doe").unwrap();
        assert_eq!(contact.last_name(), Some("Doe"));
        assert_eq!(contact.full_name(), "John Doe");

        let single = Contact::new("cher").unwrap();
        assert_eq!(single.full_name(), "Cher");
    }

    #[test]
    fn optional_text_fields_are_trimmed() {
        let contact = Contact::new("ann")
            .unwrap()
            .with_company("  Acme  ")
            .unwrap()
            .with_address(" 1 Main St ")
            .unwrap();
        assert_eq!(contact.company(), Some("Acme"));
        assert_eq!(contact.address(), Some("1 Main St"));
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let mut contact = Contact::new("mike").unwrap().with_phone("+1").unwrap();
        let snapshot = contact.clone();

        let result = contact.apply([
            ContactField::Company(Some("Acme".into())),
            ContactField::Phone(Some("no_digits".into())),
        ]);

        assert!(result.is_err());
        assert_eq!(contact, snapshot);
    }

    #[test]
    fn apply_clears_fields_and_refreshes_timestamp() {
        let old = Utc::now() - Duration::minutes(10);
        let mut contact = Contact::new("liam")
            .unwrap()
            .with_phone("+123456789")
            .unwrap()
            .with_email("liam@example.com")
            .unwrap()
            .with_last_modified(old);

        contact
            .apply([ContactField::Phone(None), ContactField::Email(Some("".into()))])
            .unwrap();

        assert_eq!(contact.phone(), None);
        assert_eq!(contact.email(), None);
        assert!(contact.last_modified() > old);
    }

    #[test]
    fn update_modified_time_moves_forward() {
        let mut contact = Contact::new("Jane").unwrap();
        let before = contact.last_modified();
        contact.update_modified_time();
        assert!(contact.last_modified() >= before);
    }

    #[test]
    fn search_key_covers_every_field() {
        let contact = Contact::new("bob")
            .unwrap()
            .with_birthday(NaiveDate::from_ymd_opt(1990, 12, 28).unwrap())
            .unwrap()
            .with_email("bob@mail.org")
            .unwrap();
        assert_eq!(contact.search_key(), "bobbobmailorg28121990");
    }

    #[test]
    fn deserialize_validates_fields() {
        let json = r#"{"name": "Test", "phone": "call me", "last_modified": "2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Contact>(json).is_err());

        let json = r#"{"name": "  ", "last_modified": "2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Contact>(json).is_err());
    }

    #[test]
    fn deserialize_keeps_persisted_timestamp() {
        let json = r#"{"name": "alice", "birthday": "1995-05-20", "last_modified": "2024-01-01T08:30:00Z"}"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.name(), "Alice");
        assert_eq!(contact.birthday(), NaiveDate::from_ymd_opt(1995, 5, 20));
        assert_eq!(
            contact.last_modified().to_rfc3339(),
            "2024-01-01T08:30:00+00:00"
        );
    }
}
