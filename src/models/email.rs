use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub email_type: String,
    pub email: String,
}

impl EmailAddress {
    pub fn new(contact_id: Uuid, email_type: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact_id,
            email_type: email_type.into(),
            email: email.into(),
        }
    }
}

/// One row of the email list as it travels in the edit form and save payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EmailEntry {
    #[serde(rename = "Type")]
    pub email_type: String,
    pub email: String,
}

impl EmailEntry {
    pub fn new(email_type: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            email_type: email_type.into(),
            email: email.into(),
        }
    }
}

impl From<&EmailAddress> for EmailEntry {
    fn from(email: &EmailAddress) -> Self {
        Self {
            email_type: email.email_type.clone(),
            email: email.email.clone(),
        }
    }
}
