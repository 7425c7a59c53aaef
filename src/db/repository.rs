use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::Database;
use crate::error::ContactError;
use crate::models::Contact;

/// Whether a save creates the contact row or rewrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Insert,
    Update,
}

/// Repository for contacts and their child collections.
///
/// Each write is one unit of work: either every change it makes becomes
/// visible or none does.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// All contacts sorted by first name, emails loaded.
    async fn list(&self) -> Result<Vec<Contact>, ContactError>;

    async fn count(&self) -> Result<u32, ContactError>;

    /// One contact with emails and addresses loaded.
    async fn find(&self, id: Uuid) -> Result<Option<Contact>, ContactError>;

    /// Persist the contact and fully replace its child rows.
    async fn save(&self, contact: Contact, mode: SaveMode) -> Result<(), ContactError>;

    /// Remove the contact and its children.
    async fn delete(&self, id: Uuid) -> Result<(), ContactError>;
}

/// Runs `Database` calls on the blocking pool.
#[derive(Clone)]
pub struct SqliteContactRepository {
    db: Arc<Database>,
}

impl SqliteContactRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn run<T, F>(&self, f: F) -> Result<T, ContactError>
    where
        F: FnOnce(&Database) -> Result<T, ContactError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| ContactError::persistence(format!("database task failed: {}", e)))?
    }
}

#[async_trait]
impl ContactRepository for SqliteContactRepository {
    async fn list(&self) -> Result<Vec<Contact>, ContactError> {
        self.run(|db| db.list_contacts()).await
    }

    async fn count(&self) -> Result<u32, ContactError> {
        self.run(|db| db.count_contacts()).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<Contact>, ContactError> {
        self.run(move |db| db.find_contact(id)).await
    }

    async fn save(&self, contact: Contact, mode: SaveMode) -> Result<(), ContactError> {
        self.run(move |db| db.save_contact(&contact, mode)).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ContactError> {
        self.run(move |db| db.delete_contact(id)).await
    }
}
