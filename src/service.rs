//! Contact operations: the five actions the web layer exposes.
//!
//! Every mutation commits first and only then publishes `Update` and (for
//! saves) sends the alert email. Neither follow-up can undo a commit.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AlertDispatch;
use crate::db::{ContactRepository, SaveMode};
use crate::error::ContactError;
use crate::mail::{ContactAlert, Mailer};
use crate::models::{Contact, ContactEdit, SaveContactRequest};
use crate::notify::{ContactEvent, Notifier};

pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
    notifier: Arc<dyn Notifier>,
    mailer: Arc<dyn Mailer>,
    dispatch: AlertDispatch,
}

impl ContactService {
    pub fn new(
        repo: Arc<dyn ContactRepository>,
        notifier: Arc<dyn Notifier>,
        mailer: Arc<dyn Mailer>,
        dispatch: AlertDispatch,
    ) -> Self {
        Self {
            repo,
            notifier,
            mailer,
            dispatch,
        }
    }

    /// All contacts with emails, sorted by first name.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, ContactError> {
        self.repo.list().await
    }

    pub async fn count_contacts(&self) -> Result<u32, ContactError> {
        self.repo.count().await
    }

    pub async fn get_contact_for_edit(&self, id: Uuid) -> Result<ContactEdit, ContactError> {
        let contact = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| ContactError::not_found(id))?;
        Ok(ContactEdit::from(&contact))
    }

    /// Blank form for a contact that does not exist yet.
    pub fn prepare_new_contact(&self) -> ContactEdit {
        ContactEdit::default()
    }

    /// Create or update a contact from a save payload, replacing its emails
    /// and addresses with the payload's lists. Returns the contact id.
    pub async fn save_contact(&self, request: SaveContactRequest) -> Result<Uuid, ContactError> {
        let (mut contact, mode) = match request.contact_id()? {
            None => (Contact::new(), SaveMode::Insert),
            Some(id) => {
                let existing = self
                    .repo
                    .find(id)
                    .await?
                    .ok_or_else(|| ContactError::not_found(id))?;
                (existing, SaveMode::Update)
            }
        };

        contact.apply(&request);
        let id = contact.id;
        let (emails, addresses) = (contact.emails.len(), contact.addresses.len());

        self.repo.save(contact, mode).await?;
        info!(contact_id = %id, ?mode, emails, addresses, "Saved contact");

        self.notifier.publish(ContactEvent::Update);
        self.send_alert(id).await;

        Ok(id)
    }

    /// Remove a contact together with its emails and addresses.
    pub async fn delete_contact(&self, id: Uuid) -> Result<(), ContactError> {
        self.repo.delete(id).await?;
        info!(contact_id = %id, "Deleted contact");

        self.notifier.publish(ContactEvent::Update);
        Ok(())
    }

    async fn send_alert(&self, id: Uuid) {
        let alert = ContactAlert::contact_updated(id);
        match self.dispatch {
            AlertDispatch::Inline => deliver(self.mailer.as_ref(), &alert).await,
            AlertDispatch::Background => {
                let mailer = Arc::clone(&self.mailer);
                tokio::spawn(async move {
                    deliver(mailer.as_ref(), &alert).await;
                });
            }
        }
    }
}

async fn deliver(mailer: &dyn Mailer, alert: &ContactAlert) {
    if let Err(e) = mailer.send_alert(alert).await {
        warn!(contact_id = %alert.contact_id, error = %e, "Failed to send contact alert");
    }
}
