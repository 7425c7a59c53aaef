use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Address, AddressEntry, EmailAddress, EmailEntry, SaveContactRequest};

/// A person together with the child collections it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub emails: Vec<EmailAddress>,
    pub addresses: Vec<Address>,
}

impl Contact {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: None,
            created_at: now,
            updated_at: now,
            emails: Vec::new(),
            addresses: Vec::new(),
        }
    }

    /// "First Last", or "(unnamed)" when both are blank.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.trim(), self.last_name.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            "(unnamed)".to_string()
        } else {
            name
        }
    }

    /// Discard every email and re-add one per entry, linked to this contact.
    pub fn replace_emails(&mut self, entries: &[EmailEntry]) {
        self.emails = entries
            .iter()
            .map(|e| EmailAddress::new(self.id, e.email_type.clone(), e.email.clone()))
            .collect();
    }

    /// Discard every address and re-add one per entry, linked to this contact.
    pub fn replace_addresses(&mut self, entries: &[AddressEntry]) {
        self.addresses = entries.iter().map(|a| Address::new(self.id, a)).collect();
    }

    /// Overwrite scalars and child collections from a save payload.
    pub fn apply(&mut self, request: &SaveContactRequest) {
        self.replace_emails(&request.emails);
        self.replace_addresses(&request.addresses);
        self.title = request.title.clone();
        self.first_name = request.first_name.clone();
        self.last_name = request.last_name.clone();
        self.date_of_birth = request.date_of_birth;
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self::new()
    }
}
