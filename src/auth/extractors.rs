use actix_session::SessionExt;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{domain::UserRole, error::ApiError, models::SessionUser, session_state::TypedSession};

// Extractor for any logged in user
pub struct Authenticated(pub SessionUser);

// Extractor for customer role
pub struct IsCustomer(pub SessionUser);

// Extractor for owner role
pub struct IsOwner(pub SessionUser);

// The session middleware already loaded the session, reading it never touches the database
fn session_user(
    req: &HttpRequest,
    required_role: Option<UserRole>
) -> Result<SessionUser, ApiError> {
    let session = TypedSession(req.get_session());

    let user = match session.get_user() {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ApiError::Unauthenticated),
        Err(e) => {
            tracing::warn!(error = ?e, "Ignoring unreadable session user");
            return Err(ApiError::Unauthenticated)
        }
    };

    match required_role {
        Some(role) if user.role != role => {
            tracing::info!(user_id = user.id, required = %role, "Rejected request with wrong role");
            Err(ApiError::Forbidden)
        },
        _ => Ok(user)
    }
}

impl FromRequest for Authenticated {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(session_user(req, None).map(Authenticated))
    }
}

impl FromRequest for IsCustomer {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(session_user(req, Some(UserRole::Customer)).map(IsCustomer))
    }
}

impl FromRequest for IsOwner {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(session_user(req, Some(UserRole::Owner)).map(IsOwner))
    }
}
