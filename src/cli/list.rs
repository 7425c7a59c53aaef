use anyhow::Result;

use crate::db::Database;
use crate::models::Contact;

const NAME_WIDTH: usize = 28;
const TITLE_WIDTH: usize = 10;

/// Contact data prepared for list display
pub struct ContactListRow {
    pub id: uuid::Uuid,
    pub display_name: String,
    pub title: String,
    pub emails: Vec<String>,
}

impl From<&Contact> for ContactListRow {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            display_name: contact.display_name(),
            title: contact.title.clone(),
            emails: contact
                .emails
                .iter()
                .map(|e| {
                    if e.email_type.is_empty() {
                        e.email.clone()
                    } else {
                        format!("{} ({})", e.email, e.email_type)
                    }
                })
                .collect(),
        }
    }
}

/// Execute the list command
pub fn run_list(db: &Database) -> Result<()> {
    let contacts = db.list_contacts()?;

    if contacts.is_empty() {
        println!("No contacts.");
        return Ok(());
    }

    println!("Contacts ({} total)\n", contacts.len());
    print_table_header();
    for contact in &contacts {
        println!("{}", format_contact_row(&ContactListRow::from(contact)));
    }
    Ok(())
}

fn print_table_header() {
    println!(
        "{:<name_w$}  {:<title_w$}  EMAILS",
        "NAME",
        "TITLE",
        name_w = NAME_WIDTH,
        title_w = TITLE_WIDTH
    );
}

fn format_contact_row(row: &ContactListRow) -> String {
    format!(
        "{:<name_w$}  {:<title_w$}  {}",
        truncate(&row.display_name, NAME_WIDTH),
        truncate(&row.title, TITLE_WIDTH),
        row.emails.join(", "),
        name_w = NAME_WIDTH,
        title_w = TITLE_WIDTH
    )
}

/// Truncate to at most `max_chars` characters, ending in an ellipsis when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
