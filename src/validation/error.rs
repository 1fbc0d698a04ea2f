use crate::domain::{Board, Field};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unconfigured: {}", join(.fields, ", "))]
    Unconfigured { fields: Vec<Field> },
    #[error("{}", join(.issues, "; "))]
    Invalid { issues: Vec<Issue> },
    #[error("{board} needs an [extension.{expected}] section")]
    MissingExtension { board: Board, expected: &'static str },
}

impl ConfigError {
    /// Fields the operator has to revisit.
    pub fn fields(&self) -> Vec<Field> {
        match self {
            ConfigError::Unconfigured { fields } => fields.clone(),
            ConfigError::Invalid { issues } => issues.iter().map(|issue| issue.field).collect(),
            ConfigError::MissingExtension { .. } => Vec::new(),
        }
    }
}

/// A filled in value that cannot work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub field: Field,
    pub reason: String,
}

impl Issue {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Issue {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.reason)
    }
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(separator)
}
