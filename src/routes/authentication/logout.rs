use actix_web::HttpResponse;

use crate::session_state::TypedSession;

// The session store never fails a purge, so the cookie is always cleared
#[tracing::instrument(
    "Logging out currently logged in user",
    skip_all
)]
pub async fn logout(
    session: TypedSession
) -> HttpResponse {
    session.purge();

    HttpResponse::NoContent().finish()
}
