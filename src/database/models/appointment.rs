use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An appointment row. JSON output uses the camelCase names clients expect;
/// `deleted_at` is bookkeeping and never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub creator_id: String,
    pub creator_username: String,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Client-supplied fields for a new appointment. Owner identity is never
/// taken from the request body; it comes from the verified token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}
