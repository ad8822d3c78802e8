use std::{error::Error, fmt::Debug};

use diesel::result::DatabaseErrorKind;
use thiserror::Error;

use crate::utils::error_fmt_chain;

// Error associated with deleting a row that other rows may still point at
#[derive(Error)]
pub enum DeleteError{
    #[error("row is still referenced by an order")]
    StillReferenced(#[source] diesel::result::Error),
    #[error("unexpected database error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for DeleteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

pub(crate) fn map_delete_error(e: diesel::result::Error, what: &'static str) -> DeleteError {
    match e {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DeleteError::StillReferenced(e)
        },
        _ => DeleteError::UnexpectedError(anyhow::Error::new(e).context(what))
    }
}
