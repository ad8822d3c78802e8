use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use validator::{ValidateEmail, ValidationError};

use crate::error::ApiError;

// A json field as the client sent it. A value of the wrong json type is kept
// as `WrongType` so validation can name the field instead of failing the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormValue<T>{
    Missing,
    Present(T),
    WrongType
}

impl<T> Default for FormValue<T> {
    fn default() -> Self {
        FormValue::Missing
    }
}

impl<T> From<T> for FormValue<T> {
    fn from(value: T) -> Self {
        FormValue::Present(value)
    }
}

impl<T> FormValue<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            FormValue::Present(value) => Some(value),
            _ => None
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            FormValue::Present(value) => Some(value),
            _ => None
        }
    }

    pub fn is_wrong_type(&self) -> bool {
        matches!(self, FormValue::WrongType)
    }

    // Value of a field that already passed validation
    pub fn checked(self, param: &str) -> Result<T, ApiError> {
        self.into_value()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("{} passed validation without a value", param)))
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for FormValue<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(FormValue::Missing)
        }

        Ok(match serde_json::from_value(value) {
            Ok(value) => FormValue::Present(value),
            Err(_) => FormValue::WrongType
        })
    }
}

impl<T: Serialize> Serialize for FormValue<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        self.value().serialize(serializer)
    }
}

// Field checks for `#[validate(custom(...))]`, the message comes from the attribute

pub fn filled(value: &FormValue<String>) -> Result<(), ValidationError> {
    match value {
        FormValue::Present(text) if !text.is_empty() => Ok(()),
        _ => Err(ValidationError::new("required"))
    }
}

pub fn email_address(value: &FormValue<String>) -> Result<(), ValidationError> {
    match value {
        FormValue::Present(text) if text.validate_email() => Ok(()),
        _ => Err(ValidationError::new("email"))
    }
}

pub fn text_or_absent(value: &FormValue<String>) -> Result<(), ValidationError> {
    if value.is_wrong_type() {
        Err(ValidationError::new("type"))
    } else {
        Ok(())
    }
}

// A positive integer that fits an INTEGER column
pub fn positive_int(value: &FormValue<i64>) -> Result<(), ValidationError> {
    match value {
        FormValue::Present(n) if (1..=i64::from(i32::MAX)).contains(n) => Ok(()),
        _ => Err(ValidationError::new("range"))
    }
}

pub fn non_empty<T>(value: &FormValue<Vec<T>>) -> Result<(), ValidationError> {
    match value {
        FormValue::Present(list) if !list.is_empty() => Ok(()),
        _ => Err(ValidationError::new("length"))
    }
}
