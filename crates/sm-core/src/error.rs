use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("No server type matches '{name}' {location}")]
    NoTemplate {
        name: String,
        location: ErrorLocation,
    },

    #[error("Server '{name}' not found in the configuration {location}")]
    EntryNotFound {
        name: String,
        location: ErrorLocation,
    },

    #[error("{count} servers named '{name}' found in the configuration {location}")]
    AmbiguousEntry {
        name: String,
        count: usize,
        location: ErrorLocation,
    },

    #[error("Server '{name}' has no '{field}' field {location}")]
    MissingField {
        name: String,
        field: &'static str,
        location: ErrorLocation,
    },

    #[error("Field '{field}' references unknown field '$({placeholder})' {location}")]
    UnknownPlaceholder {
        field: String,
        placeholder: String,
        location: ErrorLocation,
    },

    #[error("Field '{field}' is still unresolved after substitution: {value} {location}")]
    UnresolvedPlaceholder {
        field: String,
        value: String,
        location: ErrorLocation,
    },
}

impl CoreError {
    #[track_caller]
    pub fn no_template(name: &str) -> Self {
        Self::NoTemplate {
            name: name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn entry_not_found(name: &str) -> Self {
        Self::EntryNotFound {
            name: name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn ambiguous_entry(name: &str, count: usize) -> Self {
        Self::AmbiguousEntry {
            name: name.to_string(),
            count,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn missing_field(name: &str, field: &'static str) -> Self {
        Self::MissingField {
            name: name.to_string(),
            field,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_placeholder(field: &str, placeholder: &str) -> Self {
        Self::UnknownPlaceholder {
            field: field.to_string(),
            placeholder: placeholder.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unresolved_placeholder(field: &str, value: &str) -> Self {
        Self::UnresolvedPlaceholder {
            field: field.to_string(),
            value: value.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Whether the error comes from looking up the entry rather than from its content.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::EntryNotFound { .. } | Self::AmbiguousEntry { .. }
        )
    }
}

pub type Result<T> = StdResult<T, CoreError>;
