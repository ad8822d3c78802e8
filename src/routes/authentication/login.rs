use actix_web::{web, HttpResponse};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use validator::Validate;

use crate::{db_interaction::find_user_by_email, domain::{form_value::email_address, FormValue}, error::{check_form, ApiError, FieldError}, models::SessionUser, password::verify_password, routes::payloads::UserEnvelope, session_state::TypedSession, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug, Validate)]
pub struct LoginForm{
    #[serde(default)]
    #[validate(custom(function = "email_address", message = "Valid email is required"))]
    pub email: FormValue<String>,
    #[serde(default)]
    pub password: FormValue<SecretString>
}

impl LoginForm {
    fn into_parts(self) -> Result<(String, SecretString), ApiError> {
        let mut problems = Vec::new();
        if self.password.value().map_or(true, |p| p.expose_secret().is_empty()) {
            problems.push(FieldError::new("password", "Password is required"));
        }
        check_form(&self, problems)?;

        let email = self.email.checked("email")?;
        let password = self.password.checked("password")?;
        Ok((email, password))
    }
}

#[tracing::instrument(
    "Logging in user",
    skip(session, pool, form),
    fields(email = ?form.email.value())
)]
pub async fn login(
    session: TypedSession,
    pool: web::Data<DbPool>,
    form: web::Json<LoginForm>
) -> Result<HttpResponse, ApiError>{
    let (email, password) = form.into_inner().into_parts()?;

    let conn = get_pooled_connection(&pool).await?;
    let user = find_user_by_email(conn, email).await?;

    // An unknown email still pays for one hash verification
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let verified = verify_password(password, stored_hash).await?;

    let user = match user {
        Some(user) if verified => SessionUser::from(user),
        _ => {
            tracing::info!("Rejected login attempt");
            return Err(ApiError::InvalidCredentials)
        }
    };

    session.renew();
    session.insert_user(&user)
        .context("Failed to store user in session")?;

    Ok(HttpResponse::Ok().json(UserEnvelope{ user }))
}
