pub const SCHEMA_VERSION: i32 = 1;

pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL
);
"#;

/// Child tables cascade on contact delete; every connection turns
/// `foreign_keys` on so the cascade is enforced.
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL DEFAULT '',
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    date_of_birth TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS email_addresses (
    id TEXT PRIMARY KEY,
    contact_id TEXT NOT NULL,
    email_type TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (contact_id) REFERENCES contacts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS addresses (
    id TEXT PRIMARY KEY,
    contact_id TEXT NOT NULL,
    address_type TEXT NOT NULL DEFAULT '',
    street1 TEXT NOT NULL DEFAULT '',
    street2 TEXT,
    city TEXT NOT NULL DEFAULT '',
    state TEXT NOT NULL DEFAULT '',
    zip TEXT NOT NULL DEFAULT '',
    position INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (contact_id) REFERENCES contacts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_contact_first_name ON contacts(first_name COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS idx_email_contact ON email_addresses(contact_id, position);
CREATE INDEX IF NOT EXISTS idx_address_contact ON addresses(contact_id, position);
"#;
