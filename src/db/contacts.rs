use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::HashMap;
use uuid::Uuid;

use super::{Database, SaveMode};
use crate::error::ContactError;
use crate::models::{Address, Contact, EmailAddress};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Helper to convert UUID parse errors to rusqlite errors
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_timestamp(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl Database {
    // ==================== CONTACT READ ====================

    /// All contacts sorted by first name, each with its emails loaded.
    pub fn list_contacts(&self) -> Result<Vec<Contact>, ContactError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT * FROM contacts
             ORDER BY first_name COLLATE NOCASE ASC, last_name COLLATE NOCASE ASC, id ASC",
        )?;
        let mut contacts = stmt
            .query_map([], Self::row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // One query for every email instead of one per contact
        let mut stmt = conn.prepare(
            "SELECT id, contact_id, email_type, email
             FROM email_addresses ORDER BY contact_id, position",
        )?;
        let mut emails_by_contact: HashMap<Uuid, Vec<EmailAddress>> = HashMap::new();
        for email in stmt.query_map([], Self::row_to_email)? {
            let email = email?;
            emails_by_contact
                .entry(email.contact_id)
                .or_default()
                .push(email);
        }

        for contact in &mut contacts {
            contact.emails = emails_by_contact.remove(&contact.id).unwrap_or_default();
        }

        Ok(contacts)
    }

    /// A single contact with emails and addresses loaded.
    pub fn find_contact(&self, id: Uuid) -> Result<Option<Contact>, ContactError> {
        let conn = self.lock()?;

        let contact = conn
            .query_row(
                "SELECT * FROM contacts WHERE id = ?",
                [id.to_string()],
                Self::row_to_contact,
            )
            .optional()?;

        let Some(mut contact) = contact else {
            return Ok(None);
        };

        contact.emails = Self::emails_for_contact(&conn, id)?;
        contact.addresses = Self::addresses_for_contact(&conn, id)?;
        Ok(Some(contact))
    }

    pub fn count_contacts(&self) -> Result<u32, ContactError> {
        let conn = self.lock()?;
        let count: u32 = conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count)
    }

    fn emails_for_contact(conn: &Connection, id: Uuid) -> rusqlite::Result<Vec<EmailAddress>> {
        let mut stmt = conn.prepare(
            "SELECT id, contact_id, email_type, email
             FROM email_addresses WHERE contact_id = ? ORDER BY position",
        )?;
        let emails = stmt
            .query_map([id.to_string()], Self::row_to_email)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(emails)
    }

    fn addresses_for_contact(conn: &Connection, id: Uuid) -> rusqlite::Result<Vec<Address>> {
        let mut stmt = conn.prepare(
            "SELECT id, contact_id, address_type, street1, street2, city, state, zip
             FROM addresses WHERE contact_id = ? ORDER BY position",
        )?;
        let addresses = stmt
            .query_map([id.to_string()], Self::row_to_address)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(addresses)
    }

    // ==================== CONTACT WRITE ====================

    /// Persist a contact and replace its child rows in one transaction.
    ///
    /// Every existing email and address row of the contact is removed and the
    /// contact's current collections are inserted in their place. An update of a
    /// contact that no longer exists fails with `NotFound` and changes nothing.
    pub fn save_contact(&self, contact: &Contact, mode: SaveMode) -> Result<(), ContactError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let id = contact.id.to_string();
        let now = Utc::now();

        match mode {
            SaveMode::Insert => {
                tx.execute(
                    "INSERT INTO contacts (
                        id, title, first_name, last_name, date_of_birth, created_at, updated_at
                    ) VALUES (?, ?, ?, ?, ?, ?, ?)",
                    params![
                        id,
                        contact.title,
                        contact.first_name,
                        contact.last_name,
                        contact.date_of_birth.map(|d| d.format(DATE_FORMAT).to_string()),
                        contact.created_at.to_rfc3339(),
                        now.to_rfc3339(),
                    ],
                )?;
            }
            SaveMode::Update => {
                let rows = tx.execute(
                    "UPDATE contacts SET
                        title = ?, first_name = ?, last_name = ?, date_of_birth = ?, updated_at = ?
                     WHERE id = ?",
                    params![
                        contact.title,
                        contact.first_name,
                        contact.last_name,
                        contact.date_of_birth.map(|d| d.format(DATE_FORMAT).to_string()),
                        now.to_rfc3339(),
                        id,
                    ],
                )?;
                if rows == 0 {
                    // Dropping the transaction rolls it back
                    return Err(ContactError::not_found(contact.id));
                }
            }
        }

        tx.execute("DELETE FROM email_addresses WHERE contact_id = ?", [&id])?;
        tx.execute("DELETE FROM addresses WHERE contact_id = ?", [&id])?;

        for (position, email) in contact.emails.iter().enumerate() {
            Self::insert_email(&tx, &id, email, position)?;
        }
        for (position, address) in contact.addresses.iter().enumerate() {
            Self::insert_address(&tx, &id, address, position)?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Delete a contact. Emails are removed explicitly; addresses go with the
    /// contact row through the schema's cascade.
    pub fn delete_contact(&self, id: Uuid) -> Result<(), ContactError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let key = id.to_string();

        let exists = tx
            .query_row("SELECT 1 FROM contacts WHERE id = ?", [&key], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Err(ContactError::not_found(id));
        }

        tx.execute("DELETE FROM email_addresses WHERE contact_id = ?", [&key])?;
        tx.execute("DELETE FROM contacts WHERE id = ?", [&key])?;

        tx.commit()?;
        Ok(())
    }

    // The contact id is written from the parent so children can never point elsewhere
    fn insert_email(
        conn: &Connection,
        contact_id: &str,
        email: &EmailAddress,
        position: usize,
    ) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO email_addresses (id, contact_id, email_type, email, position)
             VALUES (?, ?, ?, ?, ?)",
            params![
                email.id.to_string(),
                contact_id,
                email.email_type,
                email.email,
                position as i64,
            ],
        )?;
        Ok(())
    }

    fn insert_address(
        conn: &Connection,
        contact_id: &str,
        address: &Address,
        position: usize,
    ) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO addresses (
                id, contact_id, address_type, street1, street2, city, state, zip, position
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                address.id.to_string(),
                contact_id,
                address.address_type,
                address.street1,
                address.street2,
                address.city,
                address.state,
                address.zip,
                position as i64,
            ],
        )?;
        Ok(())
    }

    // ==================== ROW MAPPERS ====================

    fn row_to_contact(row: &Row) -> rusqlite::Result<Contact> {
        let id: String = row.get("id")?;
        let date_of_birth: Option<String> = row.get("date_of_birth")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Contact {
            id: parse_uuid(&id)?,
            title: row.get("title")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            date_of_birth: date_of_birth.as_deref().map(parse_date).transpose()?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
            emails: Vec::new(),
            addresses: Vec::new(),
        })
    }

    fn row_to_email(row: &Row) -> rusqlite::Result<EmailAddress> {
        let id: String = row.get("id")?;
        let contact_id: String = row.get("contact_id")?;

        Ok(EmailAddress {
            id: parse_uuid(&id)?,
            contact_id: parse_uuid(&contact_id)?,
            email_type: row.get("email_type")?,
            email: row.get("email")?,
        })
    }

    fn row_to_address(row: &Row) -> rusqlite::Result<Address> {
        let id: String = row.get("id")?;
        let contact_id: String = row.get("contact_id")?;

        Ok(Address {
            id: parse_uuid(&id)?,
            contact_id: parse_uuid(&contact_id)?,
            address_type: row.get("address_type")?,
            street1: row.get("street1")?,
            street2: row.get("street2")?,
            city: row.get("city")?,
            state: row.get("state")?,
            zip: row.get("zip")?,
        })
    }
}
