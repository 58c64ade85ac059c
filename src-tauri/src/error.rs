use serde_json::Value;
use thiserror::Error;

use crate::bounds::NumericField;
use crate::settings::PreferenceKey;

/// Rejection of typed input in a bounded numeric field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("`{input}` is not a number")]
    NotANumber { input: String },
    #[error("{value} is outside the allowed range {min}..={max}")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

#[derive(Debug, Error)]
pub enum PaneError {
    #[error("invalid {field}: {source}")]
    Field {
        field: NumericField,
        #[source]
        source: FieldError,
    },
    #[error("{key} cannot be changed while {gate} is off")]
    Disabled {
        key: PreferenceKey,
        gate: PreferenceKey,
    },
    #[error("unknown preference `{0}`")]
    UnknownKey(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: PreferenceKey, value: Value },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl PaneError {
    pub fn field(field: NumericField, source: FieldError) -> Self {
        PaneError::Field { field, source }
    }
}
