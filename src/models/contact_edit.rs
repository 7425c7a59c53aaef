use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{AddressEntry, Contact, EmailEntry};
use crate::error::ContactError;

/// Edit-form projection of a contact. `id` is `None` for the blank creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactEdit {
    pub id: Option<Uuid>,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub emails: Vec<EmailEntry>,
    pub addresses: Vec<AddressEntry>,
}

impl From<&Contact> for ContactEdit {
    fn from(contact: &Contact) -> Self {
        Self {
            id: Some(contact.id),
            title: contact.title.clone(),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            date_of_birth: contact.date_of_birth,
            emails: contact.emails.iter().map(EmailEntry::from).collect(),
            addresses: contact.addresses.iter().map(AddressEntry::from).collect(),
        }
    }
}

/// Body of a save: scalar fields plus full replacement child lists.
///
/// Missing keys bind to empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SaveContactRequest {
    pub id: Option<String>,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "deserialize_optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    pub emails: Vec<EmailEntry>,
    pub addresses: Vec<AddressEntry>,
}

impl SaveContactRequest {
    /// `None` when the payload describes a contact that has never been saved.
    pub fn contact_id(&self) -> Result<Option<Uuid>, ContactError> {
        match self.id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_contact_id(raw).map(|id| (!id.is_nil()).then_some(id)),
        }
    }
}

/// An id that does not parse cannot name a stored contact.
pub fn parse_contact_id(raw: &str) -> Result<Uuid, ContactError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ContactError::not_found(raw))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            // Accept "YYYY-MM-DD" and "YYYY-MM-DDThh:mm:ss"
            let date_part = s.split('T').next().unwrap_or(s);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}
