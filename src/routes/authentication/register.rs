use actix_web::{web, HttpResponse};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use validator::Validate;

use crate::{db_interaction::{insert_user_into_database, UserInsertError}, domain::{form_value::email_address, FormValue, UserRole}, error::{check_form, ApiError, FieldError}, models::SessionUser, routes::payloads::UserEnvelope, session_state::TypedSession, utils::{get_pooled_connection, DbPool}};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Deserialize, Debug, Validate)]
pub struct RegistrationForm{
    #[serde(default)]
    #[validate(custom(function = "email_address", message = "Valid email is required"))]
    pub email: FormValue<String>,
    #[serde(default)]
    pub password: FormValue<SecretString>,
    #[serde(default)]
    pub role: FormValue<String>
}

impl RegistrationForm {
    // Validated email, password and role, or every field that failed
    fn into_parts(self) -> Result<(String, SecretString, UserRole), ApiError> {
        let role = self.role
            .value()
            .and_then(|r| r.parse::<UserRole>().ok());
        let password_ok = self.password
            .value()
            .is_some_and(|p| p.expose_secret().chars().count() >= MIN_PASSWORD_LENGTH);

        let mut problems = Vec::new();
        if !password_ok {
            problems.push(FieldError::new("password", "Password must be at least 6 characters"));
        }
        if role.is_none() {
            problems.push(FieldError::new("role", "Role must be 'customer' or 'owner'"));
        }
        check_form(&self, problems)?;

        match (self.email, self.password, role) {
            (FormValue::Present(email), FormValue::Present(password), Some(role)) => Ok((email, password, role)),
            _ => Err(ApiError::Internal(anyhow::anyhow!("Registration form passed validation incomplete")))
        }
    }
}

#[tracing::instrument(
    "User registration started",
    skip(session, pool, form),
    fields(email = ?form.email.value())
)]
pub async fn register(
    session: TypedSession,
    pool: web::Data<DbPool>,
    form: web::Json<RegistrationForm>
) -> Result<HttpResponse, ApiError> {
    let (email, password, role) = form.into_inner().into_parts()?;

    let conn = get_pooled_connection(&pool).await?;
    let user = insert_user_into_database(conn, email, password, role)
        .await
        .map_err(|e| {
            match e {
                UserInsertError::EmailNotUnique(_) => {
                    tracing::info!("Email already registered");
                    ApiError::Conflict
                },
                UserInsertError::UnexpectedError(e) => ApiError::Internal(e)
            }
        })?;

    let user = SessionUser::from(user);
    session.renew();
    session.insert_user(&user)
        .context("Failed to store user in session")?;

    Ok(HttpResponse::Created().json(UserEnvelope{ user }))
}
