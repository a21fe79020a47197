/// Integer primary keys (users, lines) are SQLite `INTEGER PRIMARY KEY`.
pub type DbId = i64;

/// Page identifiers are short text keys assigned by the scan import.
pub type PageId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
