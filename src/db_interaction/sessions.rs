use anyhow::Context;
use chrono::{DateTime, Utc};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};

use crate::{models::SessionRecord, schema::sessions, telemetry::spawn_blocking_with_tracing, utils::DbConnection};

// Look a session up by key, expired rows are removed and reported as absent
#[tracing::instrument(
    "Getting session from db",
    skip_all
)]
pub async fn load_session(
    mut conn: DbConnection,
    session_key: String
) -> Result<Option<SessionRecord>, anyhow::Error>{
    spawn_blocking_with_tracing(move || -> Result<Option<SessionRecord>, anyhow::Error> {
        let record = sessions::table
            .filter(sessions::session_key.eq(&session_key))
            .select(SessionRecord::as_select())
            .first::<SessionRecord>(&mut conn)
            .optional()
            .context("Failed to load session")?;

        match record {
            Some(record) if record.expires_at <= Utc::now() => {
                diesel::delete(sessions::table)
                    .filter(sessions::session_key.eq(&session_key))
                    .execute(&mut conn)
                    .context("Failed to delete expired session")?;
                Ok(None)
            },
            other => Ok(other)
        }
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Inserting session into db",
    skip_all
)]
pub async fn insert_session(
    mut conn: DbConnection,
    record: SessionRecord
) -> Result<(), anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::insert_into(sessions::table)
            .values(&record)
            .execute(&mut conn)
            .context("Failed to insert session")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}

// Only live rows are touched, the number of updated rows is returned
#[tracing::instrument(
    "Updating session state in db",
    skip_all
)]
pub async fn update_session_state(
    mut conn: DbConnection,
    session_key: String,
    state: String,
    expires_at: DateTime<Utc>
) -> Result<usize, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::update(sessions::table)
            .filter(sessions::session_key.eq(session_key))
            .filter(sessions::expires_at.gt(Utc::now()))
            .set((
                sessions::state.eq(state),
                sessions::expires_at.eq(expires_at)
            ))
            .execute(&mut conn)
            .context("Failed to update session state")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Extending session in db",
    skip_all
)]
pub async fn update_session_expiry(
    mut conn: DbConnection,
    session_key: String,
    expires_at: DateTime<Utc>
) -> Result<usize, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::update(sessions::table)
            .filter(sessions::session_key.eq(session_key))
            .set(sessions::expires_at.eq(expires_at))
            .execute(&mut conn)
            .context("Failed to extend session")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Deleting session from db",
    skip_all
)]
pub async fn delete_session(
    mut conn: DbConnection,
    session_key: String
) -> Result<(), anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::delete(sessions::table)
            .filter(sessions::session_key.eq(session_key))
            .execute(&mut conn)
            .context("Failed to delete session")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}

// Drop every session past its expiry, returns how many went
#[tracing::instrument(
    "Deleting expired sessions from db",
    skip_all
)]
pub async fn delete_expired_sessions(
    mut conn: DbConnection
) -> Result<usize, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::delete(sessions::table)
            .filter(sessions::expires_at.le(Utc::now()))
            .execute(&mut conn)
            .context("Failed to delete expired sessions")
    })
    .await
    .context("Failed due to threadpool error")?
}
