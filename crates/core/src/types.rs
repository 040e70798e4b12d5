/// Row ids of `users` and `refresh_tokens` (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// Stored and embedded timestamps, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
