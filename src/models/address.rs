use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub address_type: String,
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    pub fn new(contact_id: Uuid, entry: &AddressEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact_id,
            address_type: entry.address_type.clone(),
            street1: entry.street1.clone(),
            street2: entry.street2.clone().filter(|s| !s.trim().is_empty()),
            city: entry.city.clone(),
            state: entry.state.clone(),
            zip: entry.zip.clone(),
        }
    }
}

/// One row of the address list as it travels in the edit form and save payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AddressEntry {
    #[serde(rename = "Type")]
    pub address_type: String,
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl From<&Address> for AddressEntry {
    fn from(address: &Address) -> Self {
        Self {
            address_type: address.address_type.clone(),
            street1: address.street1.clone(),
            street2: address.street2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip: address.zip.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_street2_is_dropped() {
        let entry = AddressEntry {
            address_type: "home".to_string(),
            street1: "1 Main St".to_string(),
            street2: Some("  ".to_string()),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62701".to_string(),
        };
        let address = Address::new(Uuid::new_v4(), &entry);
        assert_eq!(address.street2, None);

        let empty = AddressEntry {
            street2: Some(String::new()),
            ..entry.clone()
        };
        assert_eq!(Address::new(Uuid::new_v4(), &empty).street2, None);
        assert_eq!(AddressEntry::from(&address).street2, None);
        assert_eq!(address.city, "Springfield");
    }

    #[test]
    fn test_entry_deserializes_pascal_case() {
        let json = r#"{"Type":"work","Street1":"9 Elm","City":"Austin","State":"TX","Zip":"78701"}"#;
        let entry: AddressEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.address_type, "work");
        assert_eq!(entry.street1, "9 Elm");
        assert_eq!(entry.street2, None);
        assert_eq!(entry.zip, "78701");
    }
}
