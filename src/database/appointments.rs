use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Appointment, NewAppointment};
use crate::middleware::auth::AuthUser;

/// Errors from AppointmentStore
#[derive(Debug, Error)]
pub enum StoreError {
    /// Zero matching active rows. Covers a missing id, an id owned by
    /// someone else, and an already-cancelled appointment; the three cases
    /// are deliberately indistinguishable so callers cannot probe for
    /// other users' data.
    #[error("Appointment not found")]
    NotFound,

    #[error("Week {week} of year {year} is not representable")]
    WeekOutOfRange { year: i32, week: u32 },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence for appointments: insert, point lookup, week-range lookup,
/// and soft-delete. Every read and update is scoped to the owner's
/// `creator_id`, so one user can never see or touch another user's rows.
#[derive(Clone)]
pub struct AppointmentStore {
    pool: PgPool,
}

impl AppointmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new appointment for `owner`.
    ///
    /// The id is generated here (UUID v4, never client-supplied) and the
    /// owner identity is stamped from the authenticated caller. Returns the
    /// record as written, without a confirming re-read.
    pub async fn insert(
        &self,
        owner: &AuthUser,
        new: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            start_date: new.start_date,
            end_date: new.end_date,
            creator_id: owner.id.clone(),
            creator_username: owner.username.clone(),
            deleted_at: None,
        };

        sqlx::query(
            "INSERT INTO appointments \
             (id, title, description, start_date, end_date, creator_id, creator_username, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NULL)",
        )
        .bind(&appointment.id)
        .bind(&appointment.title)
        .bind(&appointment.description)
        .bind(appointment.start_date)
        .bind(appointment.end_date)
        .bind(&appointment.creator_id)
        .bind(&appointment.creator_username)
        .execute(&self.pool)
        .await?;

        Ok(appointment)
    }

    /// Fetch a single active appointment owned by `owner`.
    pub async fn get(&self, owner: &AuthUser, id: &str) -> Result<Appointment, StoreError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments \
             WHERE id = $1 AND deleted_at IS NULL AND creator_id = $2 LIMIT 1",
        )
        .bind(id)
        .bind(&owner.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    /// List `owner`'s active appointments whose start date falls within the
    /// given week: the half-open interval [week start, week start + 7 days).
    ///
    /// Empty weeks yield an empty vec, not an error. Results are ordered by
    /// start date then id so repeated calls are deterministic.
    pub async fn list_week(
        &self,
        owner: &AuthUser,
        year: i32,
        week: u32,
    ) -> Result<Vec<Appointment>, StoreError> {
        let out_of_range = || StoreError::WeekOutOfRange { year, week };
        let from = start_of_week(year, week).ok_or_else(out_of_range)?;
        let to = from
            .checked_add_signed(Duration::days(7))
            .ok_or_else(out_of_range)?;

        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments \
             WHERE start_date >= $1 AND start_date < $2 \
               AND deleted_at IS NULL AND creator_id = $3 \
             ORDER BY start_date, id",
        )
        .bind(from)
        .bind(to)
        .bind(&owner.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    /// Soft-delete an appointment by stamping `deleted_at`.
    ///
    /// The update is conditional on the row still being active and owned by
    /// `owner`; exactly one affected row means success, anything else is
    /// NotFound. Among concurrent cancels of the same id, at most one can
    /// succeed - the database's atomic single-row update is the
    /// serialization point.
    pub async fn cancel(&self, owner: &AuthUser, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE appointments SET deleted_at = $1 \
             WHERE id = $2 AND deleted_at IS NULL AND creator_id = $3",
        )
        .bind(Utc::now())
        .bind(id)
        .bind(&owner.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() != 1 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Midnight UTC on the Monday that starts the given 1-based week.
///
/// Week 1 begins on the first Monday on or after January 1 of `year`
/// (January 1 itself when it is a Monday). This anchors to the calendar
/// year, not ISO-8601 week numbering, and must stay that way: existing
/// clients depend on the exact boundaries.
///
/// Returns None when chrono cannot represent the requested date.
pub fn start_of_week(year: i32, week: u32) -> Option<DateTime<Utc>> {
    let jan1 = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;

    // Days until the first Monday, with weekday 0=Sunday..6=Saturday
    let diff = (7 - jan1.weekday().num_days_from_sunday() + 1) % 7;

    let days = i64::from(diff) + (i64::from(week) - 1) * 7;
    jan1.checked_add_signed(Duration::days(days))
}
