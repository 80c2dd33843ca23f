/// All entity primary keys are PostgreSQL UUIDs.
pub type DbId = uuid::Uuid;

/// Question identifiers are stored as text: a UUID, or a CUID for rows
/// imported from the legacy schema.
pub type QuestionId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
