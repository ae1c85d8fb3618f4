/// Primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Timestamps are stored and exchanged as UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
