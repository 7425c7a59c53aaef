mod address;
mod contact;
mod contact_edit;
mod email;

pub use address::{Address, AddressEntry};
pub use contact::Contact;
pub use contact_edit::{parse_contact_id, ContactEdit, SaveContactRequest};
pub use email::{EmailAddress, EmailEntry};
