use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::utils::{error_fmt_chain, PoolGetError};

// One failing field, shaped like `{"param": "...", "msg": "..."}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError{
    pub param: String,
    pub msg: String
}

impl FieldError {
    pub fn new(param: impl Into<String>, msg: impl Into<String>) -> Self {
        FieldError{
            param: param.into(),
            msg: msg.into()
        }
    }
}

// Body of every non-validation error response.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody{
    pub error: String
}

// Body of a validation error response.
#[derive(Serialize, Deserialize, Debug)]
pub struct ValidationBody{
    pub errors: Vec<FieldError>
}

#[derive(Error)]
pub enum ApiError{
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email already in use")]
    Conflict,
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Forbidden: wrong role")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Malformed request: {0}")]
    BadRequest(String),
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error)
}

impl ApiError {
    pub fn field(param: impl Into<String>, msg: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(param, msg)])
    }
}

impl Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidCredentials
            | ApiError::Conflict
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            ApiError::Validation(errors) => {
                HttpResponse::build(self.status_code())
                    .json(ValidationBody{ errors: errors.clone() })
            },
            ApiError::Internal(_) => {
                tracing::error!(error = ?self, "Request failed with internal error");
                HttpResponse::build(self.status_code())
                    .json(ErrorBody{ error: self.to_string() })
            },
            _ => HttpResponse::build(self.status_code())
                    .json(ErrorBody{ error: self.to_string() })
        }
    }
}

// Flatten validator output into field errors, sorted by field name so
// responses are stable
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let param = field.to_string();
            errs.iter().map(move |e| {
                let msg = e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", param));
                FieldError::new(param.clone(), msg)
            })
        })
        .collect();

    fields.sort_by(|a, b| a.param.cmp(&b.param));
    fields
}

// Run the declarative checks of `form` plus any hand written ones
pub fn check_form<T: Validate>(form: &T, mut extra: Vec<FieldError>) -> Result<(), ApiError> {
    let mut fields = match form.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => field_errors(&errors)
    };
    fields.append(&mut extra);

    if fields.is_empty() {
        Ok(())
    } else {
        fields.sort_by(|a, b| a.param.cmp(&b.param));
        Err(ApiError::Validation(fields))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(field_errors(&errors))
    }
}

impl From<PoolGetError> for ApiError {
    fn from(e: PoolGetError) -> Self {
        ApiError::Internal(anyhow::Error::new(e))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}
