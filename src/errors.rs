use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrityError {
    #[error("Multiple parents are not allowed: {0} is already attached to a node")]
    AlreadyParented(String),

    #[error("Appending {0} would make it its own ancestor")]
    WouldCycle(String),

    #[error("Recursive definition of render tree: {0} was visited twice")]
    Recursion(String),

    #[error("The root node must be a Footprint, found {0}")]
    NotAFootprint(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{kind}: {field} not declared")]
    MissingField { kind: &'static str, field: &'static str },

    #[error("{kind}: '{value}' is an invalid {field}")]
    InvalidValue { kind: &'static str, field: &'static str, value: String },

    #[error("{kind}: {field} out of allowed range ({reason})")]
    OutOfRange { kind: &'static str, field: &'static str, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field, .. } => field,
            ValidationError::InvalidValue { field, .. } => field,
            ValidationError::OutOfRange { field, .. } => field,
        }
    }

    pub(crate) fn missing(kind: &'static str, field: &'static str) -> Self {
        ValidationError::MissingField { kind, field }
    }

    pub(crate) fn out_of_range(kind: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::OutOfRange { kind, field, reason: reason.into() }
    }
}

/// Parses a string-typed enumeration input, naming `field` when the value is not recognised.
pub fn parse_field<T: FromStr>(kind: &'static str, field: &'static str, value: &str) -> Result<T, ValidationError> {
    T::from_str(value).map_err(|_| ValidationError::InvalidValue { kind, field, value: value.into() })
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid name template: {0}")]
    Template(#[from] regex::Error),

    #[error("Name template uses an unknown placeholder '{0}'")]
    UnknownPlaceholder(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("Invalid identifier token at {0}")]
    InvalidIdentifier(usize),

    #[error("It is invalid to have a value with no parent node (at offset {0})")]
    OrphanValue(usize),

    #[error("Unbalanced parenthesis at offset {0}")]
    Unbalanced(usize),

    #[error("Empty document")]
    Empty,
}
