use actix_web::{web, HttpResponse};

use crate::{auth::Authenticated, db_interaction::find_user_by_id, error::ApiError, models::SessionUser, routes::payloads::UserEnvelope, utils::{get_pooled_connection, DbPool}};

// The session is trusted for identity only; the row is re-read so a deleted
// user stops being logged in
#[tracing::instrument(
    "Getting current user",
    skip_all,
    fields(user_id = %user.0.id)
)]
pub async fn current_user(
    user: Authenticated,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;

    match find_user_by_id(conn, user.0.id).await? {
        Some(row) => Ok(HttpResponse::Ok().json(UserEnvelope{ user: SessionUser::from(row) })),
        None => Err(ApiError::Unauthenticated)
    }
}
