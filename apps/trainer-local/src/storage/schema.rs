//! SQLite schema for the key/value store.

/// Current envelope version written by this build.
pub const ENVELOPE_VERSION: u32 = 1;

/// Flat key/value table. Keys carry their own namespace prefix.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
