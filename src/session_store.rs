use std::collections::HashMap;

use actix_session::storage::{LoadError, SaveError, SessionKey, SessionStore, UpdateError};
use actix_web::{cookie::time::Duration, web};
use anyhow::Context;
use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};

use crate::{db_interaction::{delete_expired_sessions, delete_session, insert_session, load_session, update_session_expiry, update_session_state}, models::SessionRecord, utils::{get_pooled_connection, DbPool}};

pub const SESSION_KEY_LENGTH: usize = 64;

type SessionState = HashMap<String, String>;

// Session storage backed by the `sessions` table, the cookie only carries the key
#[derive(Clone)]
pub struct PgSessionStore{
    pool: web::Data<DbPool>
}

impl PgSessionStore {
    pub fn new(pool: web::Data<DbPool>) -> Self {
        PgSessionStore{ pool }
    }

    async fn insert_new(
        &self,
        state: String,
        ttl: &Duration
    ) -> Result<SessionKey, anyhow::Error> {
        let session_key = generate_session_key()?;
        let conn = get_pooled_connection(&self.pool).await?;

        insert_session(conn, SessionRecord{
            session_key: session_key.as_ref().to_owned(),
            state,
            expires_at: expires_at(ttl)
        })
        .await?;

        Ok(session_key)
    }
}

pub fn generate_session_key() -> Result<SessionKey, anyhow::Error> {
    let key: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_KEY_LENGTH)
        .map(char::from)
        .collect();

    SessionKey::try_from(key)
        .map_err(|e| anyhow::anyhow!("Generated an invalid session key: {:?}", e))
}

fn expires_at(ttl: &Duration) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::seconds(ttl.whole_seconds())
}

impl SessionStore for PgSessionStore {
    async fn load(&self, session_key: &SessionKey) -> Result<Option<SessionState>, LoadError> {
        let conn = get_pooled_connection(&self.pool)
            .await
            .map_err(|e| LoadError::Other(anyhow::Error::new(e)))?;
        let record = load_session(conn, session_key.as_ref().to_owned())
            .await
            .map_err(LoadError::Other)?;

        match record {
            Some(record) => serde_json::from_str(&record.state)
                .map(Some)
                .map_err(|e| LoadError::Deserialization(anyhow::Error::new(e))),
            None => Ok(None)
        }
    }

    async fn save(&self, session_state: SessionState, ttl: &Duration) -> Result<SessionKey, SaveError> {
        let state = serde_json::to_string(&session_state)
            .map_err(|e| SaveError::Serialization(anyhow::Error::new(e)))?;

        self.insert_new(state, ttl)
            .await
            .map_err(SaveError::Other)
    }

    async fn update(
        &self,
        session_key: SessionKey,
        session_state: SessionState,
        ttl: &Duration
    ) -> Result<SessionKey, UpdateError> {
        let state = serde_json::to_string(&session_state)
            .map_err(|e| UpdateError::Serialization(anyhow::Error::new(e)))?;

        let conn = get_pooled_connection(&self.pool)
            .await
            .map_err(|e| UpdateError::Other(anyhow::Error::new(e)))?;
        let updated = update_session_state(conn, session_key.as_ref().to_owned(), state.clone(), expires_at(ttl))
            .await
            .map_err(UpdateError::Other)?;

        if updated > 0 {
            return Ok(session_key)
        }

        // The row expired or was pruned since the request started
        self.insert_new(state, ttl)
            .await
            .map_err(UpdateError::Other)
    }

    async fn update_ttl(&self, session_key: &SessionKey, ttl: &Duration) -> Result<(), anyhow::Error> {
        let conn = get_pooled_connection(&self.pool).await?;
        update_session_expiry(conn, session_key.as_ref().to_owned(), expires_at(ttl)).await?;

        Ok(())
    }

    // The cookie is cleared even when the row cannot be deleted, it still expires
    async fn delete(&self, session_key: &SessionKey) -> Result<(), anyhow::Error> {
        let outcome = match get_pooled_connection(&self.pool).await {
            Ok(conn) => delete_session(conn, session_key.as_ref().to_owned()).await,
            Err(e) => Err(anyhow::Error::new(e))
        };

        if let Err(e) = outcome {
            tracing::error!(error = ?e, "Failed to delete session, leaving it to expire");
        }

        Ok(())
    }
}

#[tracing::instrument(
    "Pruning expired sessions",
    skip_all
)]
async fn prune_once(pool: &web::Data<DbPool>) -> Result<usize, anyhow::Error> {
    let conn = get_pooled_connection(pool)
        .await
        .context("Failed to get connection for pruning")?;

    delete_expired_sessions(conn).await
}

// Runs forever, removing sessions nobody came back for
pub async fn prune_expired_sessions(pool: web::Data<DbPool>, every: std::time::Duration) {
    let mut interval = tokio::time::interval(every);

    loop {
        interval.tick().await;

        match prune_once(&pool).await {
            Ok(0) => {},
            Ok(removed) => tracing::info!(removed, "Removed expired sessions"),
            Err(e) => tracing::error!(error = ?e, "Failed to prune expired sessions")
        }
    }
}
