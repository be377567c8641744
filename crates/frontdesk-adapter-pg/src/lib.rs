//! Postgres-backed [`RecordStore`].
//!
//! All queries are bind-parameter SQL against two tables, `clinic_leads` and
//! `clinic_appointments`. Appointment ids travel through the pipeline as
//! opaque strings and are parsed back to UUIDs at this boundary; an
//! unparseable id is an infrastructure error, never a query wildcard.

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use frontdesk_runtime::store::{
    AppointmentSnapshot, AppointmentStatus, Candidate, RecordStore, SearchWindow,
};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::Row;
use uuid::Uuid;

/// Waits longer than this are flagged in the queue overview.
const LONG_WAIT_MINUTES: i64 = 30;

/// Lead statuses that count as stalling.
const STALLING_STATUSES: [&str; 2] = ["New Inquiry", "Follow Up"];

/// Cap on the stalling-leads listing, oldest first.
const STALLING_LEADS_LIMIT: i64 = 10;

#[derive(Debug, Clone)]
pub struct PgRecordStoreOptions {
    pub max_connections: u32,
}

impl Default for PgRecordStoreOptions {
    fn default() -> Self {
        Self { max_connections: 5 }
    }
}

pub struct PgRecordStore {
    pool: sqlx::PgPool,
}

impl PgRecordStore {
    pub async fn connect(
        database_url: &str,
        options: PgRecordStoreOptions,
    ) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn parse_appointment_id(id: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(id).map_err(|e| anyhow::anyhow!("invalid appointment id '{}': {}", id, e))
}

fn row_to_snapshot(row: &sqlx::postgres::PgRow) -> anyhow::Result<AppointmentSnapshot> {
    Ok(AppointmentSnapshot {
        id: row.try_get::<Uuid, _>("id")?.to_string(),
        patient_name: row.try_get("patient_name")?,
        time: row.try_get("appointment_time")?,
        doctor_name: row.try_get("doctor_name")?,
        status: AppointmentStatus::parse(row.try_get::<&str, _>("status")?),
    })
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn search_appointments(
        &self,
        window: SearchWindow,
        name_hint: &str,
    ) -> anyhow::Result<Vec<Candidate>> {
        let pattern = format!("%{}%", name_hint.trim());
        let rows = sqlx::query(
            "SELECT id, patient_name, appointment_time, doctor_name, status \
             FROM clinic_appointments \
             WHERE appointment_date BETWEEN $1 AND $2 \
               AND patient_name ILIKE $3 \
             ORDER BY appointment_date DESC, appointment_time ASC",
        )
        .bind(window.from)
        .bind(window.to)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let snapshot = row_to_snapshot(row)?;
                Ok(Candidate {
                    id: snapshot.id,
                    patient_name: snapshot.patient_name,
                    time: snapshot.time,
                    doctor_name: snapshot.doctor_name,
                    status: snapshot.status,
                })
            })
            .collect()
    }

    async fn appointment(&self, id: &str) -> anyhow::Result<Option<AppointmentSnapshot>> {
        let id = parse_appointment_id(id)?;
        let row = sqlx::query(
            "SELECT id, patient_name, appointment_time, doctor_name, status \
             FROM clinic_appointments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_snapshot).transpose()
    }

    async fn set_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
        checked_in_at: Option<DateTime<Utc>>,
    ) -> anyhow::Result<()> {
        let id = parse_appointment_id(id)?;
        let result = sqlx::query(
            "UPDATE clinic_appointments \
             SET status = $2, checked_in_at = COALESCE($3, checked_in_at), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(checked_in_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("appointment {} no longer exists", id);
        }
        tracing::debug!(appointment = %id, status = %status, "appointment status updated");
        Ok(())
    }

    async fn stalling_leads(&self) -> anyhow::Result<serde_json::Value> {
        let rows = sqlx::query(
            "SELECT id, name, status, age, gender, inquiry, source, \
                    date_added, assigned_to_user_id \
             FROM clinic_leads \
             WHERE status = ANY($1) \
             ORDER BY date_added ASC \
             LIMIT $2",
        )
        .bind(&STALLING_STATUSES[..])
        .bind(STALLING_LEADS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        let leads: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                Ok(json!({
                    "id": row.try_get::<Uuid, _>("id")?.to_string(),
                    "name": row.try_get::<String, _>("name")?,
                    "status": row.try_get::<String, _>("status")?,
                    "age": row.try_get::<Option<i32>, _>("age")?,
                    "gender": row.try_get::<Option<String>, _>("gender")?,
                    "inquiry": row.try_get::<Option<String>, _>("inquiry")?,
                    "source": row.try_get::<Option<String>, _>("source")?,
                    "date_added": row.try_get::<chrono::NaiveDate, _>("date_added")?,
                    "assigned_to_user_id": row
                        .try_get::<Option<Uuid>, _>("assigned_to_user_id")?
                        .map(|u| u.to_string()),
                }))
            })
            .collect::<anyhow::Result<_>>()?;

        Ok(json!({ "total_count": leads.len(), "leads": leads }))
    }

    async fn today_appointments(&self, principal_id: &str) -> anyhow::Result<serde_json::Value> {
        let today = Local::now().date_naive();
        let rows = sqlx::query(
            "SELECT status, doctor_id FROM clinic_appointments WHERE appointment_date = $1",
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        let mut breakdown = serde_json::Map::new();
        let mut mine = 0usize;
        for row in &rows {
            let status: String = row.try_get("status")?;
            let count = breakdown.entry(status).or_insert(json!(0));
            *count = json!(count.as_u64().unwrap_or(0) + 1);

            let doctor_id: Option<Uuid> = row.try_get("doctor_id")?;
            if doctor_id.is_some_and(|d| d.to_string() == principal_id) {
                mine += 1;
            }
        }

        Ok(json!({
            "total_count": rows.len(),
            "breakdown": breakdown,
            "my_appointments_count": mine,
        }))
    }

    async fn waiting_patients(&self) -> anyhow::Result<serde_json::Value> {
        let today = Local::now().date_naive();
        let rows = sqlx::query(
            "SELECT status, checked_in_at, updated_at \
             FROM clinic_appointments \
             WHERE appointment_date = $1 AND status = ANY($2)",
        )
        .bind(today)
        .bind(&["Arrived", "Checked-In"][..])
        .fetch_all(&self.pool)
        .await?;

        let now = Utc::now();
        let mut max_wait = 0i64;
        let mut long_waits = 0usize;
        for row in &rows {
            let reference: Option<DateTime<Utc>> = row
                .try_get::<Option<DateTime<Utc>>, _>("checked_in_at")?
                .or(row.try_get::<Option<DateTime<Utc>>, _>("updated_at")?);
            let minutes = reference
                .map(|t| (now - t).num_minutes().max(0))
                .unwrap_or(0);
            max_wait = max_wait.max(minutes);
            if minutes > LONG_WAIT_MINUTES {
                long_waits += 1;
            }
        }

        Ok(json!({
            "total_waiting": rows.len(),
            "max_wait_time_minutes": max_wait,
            "long_wait_count": long_waits,
        }))
    }

    async fn clinic_summary(&self) -> anyhow::Result<serde_json::Value> {
        let today = Local::now().date_naive();

        let leads_today: i64 =
            sqlx::query("SELECT count(*)::bigint AS cnt FROM clinic_leads WHERE date_added >= $1")
                .bind(today)
                .fetch_one(&self.pool)
                .await?
                .try_get("cnt")?;

        let appointments_today: i64 = sqlx::query(
            "SELECT count(*)::bigint AS cnt FROM clinic_appointments WHERE appointment_date = $1",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?
        .try_get("cnt")?;

        let waiting: i64 = sqlx::query(
            "SELECT count(*)::bigint AS cnt FROM clinic_appointments \
             WHERE appointment_date = $1 AND status = ANY($2)",
        )
        .bind(today)
        .bind(&["Arrived", "Checked-In"][..])
        .fetch_one(&self.pool)
        .await?
        .try_get("cnt")?;

        let stalling: i64 =
            sqlx::query("SELECT count(*)::bigint AS cnt FROM clinic_leads WHERE status = ANY($1)")
                .bind(&STALLING_STATUSES[..])
                .fetch_one(&self.pool)
                .await?
                .try_get("cnt")?;

        Ok(json!({
            "total_leads_today": leads_today,
            "total_appointments_today": appointments_today,
            "total_waiting_patients": waiting,
            "stalling_leads_count": stalling,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_ids_must_be_uuids() {
        assert!(parse_appointment_id("not-a-uuid").is_err());
        assert!(parse_appointment_id("6f2e1db4-9f6e-4d57-9f5d-0a4f0e6cbb55").is_ok());
    }
}
