use serde::Serialize;
use tera::{Context, Tera};
use uuid::Uuid;

use crate::models::{Contact, ContactEdit, EmailEntry};

const INDEX: &str = "index.html";
const CONTACT_LIST: &str = "contact_list.html";
const CONTACT_EDIT: &str = "contact_edit.html";

/// Templates compiled into the binary. Names end in `.html` so tera
/// autoescapes every interpolated value.
pub struct Views {
    tera: Tera,
}

/// One line of the contact list.
#[derive(Debug, Serialize)]
struct ContactRow {
    id: Uuid,
    name: String,
    title: String,
    date_of_birth: Option<String>,
    emails: Vec<EmailEntry>,
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.display_name(),
            title: contact.title.clone(),
            date_of_birth: contact.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string()),
            emails: contact.emails.iter().map(EmailEntry::from).collect(),
        }
    }
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (INDEX, include_str!("../../templates/index.html")),
            (CONTACT_LIST, include_str!("../../templates/contact_list.html")),
            (CONTACT_EDIT, include_str!("../../templates/contact_edit.html")),
        ])?;
        Ok(Self { tera })
    }

    pub fn index(&self) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("version", env!("CARGO_PKG_VERSION"));
        self.tera.render(INDEX, &context)
    }

    pub fn contact_list(&self, contacts: &[Contact]) -> Result<String, tera::Error> {
        let rows: Vec<ContactRow> = contacts.iter().map(ContactRow::from).collect();
        let mut context = Context::new();
        context.insert("contacts", &rows);
        self.tera.render(CONTACT_LIST, &context)
    }

    /// Edit form; a contact without an id renders as the creation form.
    pub fn contact_edit(&self, contact: &ContactEdit) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("contact", contact);
        context.insert("is_new", &contact.id.is_none());
        self.tera.render(CONTACT_EDIT, &context)
    }
}
