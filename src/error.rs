// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types returned by [`crate::store::ReportingStore`].
//!
//! Callers mostly care about two kinds: the backend could not be reached or
//! used ([`Error::Connection`]), or the input was rejected before touching it
//! ([`Error::Validation`]). [`Error::Overflow`] is raised when stored values
//! are too large to add up.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A total left the representable range. Nothing is returned for the
    /// report; `quality_report` names the rows responsible.
    #[error("sum of {field} for '{group}' overflows")]
    Overflow { field: &'static str, group: String },
}

impl Error {
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, Error::Overflow { .. })
    }

    /// Fields named by a validation failure, empty for every other kind.
    pub fn violated_fields(&self) -> Vec<&'static str> {
        match self {
            Error::Validation(v) => v.fields(),
            _ => Vec::new(),
        }
    }
}

/// Backend could not be reached, or failed while a query was running.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection pool: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<r2d2::Error> for Error {
    fn from(e: r2d2::Error) -> Self {
        Error::Connection(e.into())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Connection(e.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn single(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                field,
                reason: reason.into(),
            }],
        }
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", v.field, v.reason)?;
        }
        Ok(())
    }
}

/// Accumulates violations so every bad field is reported at once.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<Violation>);

impl Violations {
    pub(crate) fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.0.push(Violation {
            field,
            reason: reason.into(),
        });
    }

    pub(crate) fn into_result(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations: self.0 }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_field() {
        let mut v = Violations::default();
        v.push("amount", "must not be negative");
        v.push("category", "is required");
        let err = v.into_result().unwrap_err();
        assert_eq!(err.violated_fields(), vec!["amount", "category"]);
        assert_eq!(
            err.to_string(),
            "validation failed: amount must not be negative; category is required"
        );
    }

    #[test]
    fn overflow_names_the_group() {
        let err = Error::Overflow {
            field: "quantity",
            group: "Sul".into(),
        };
        assert!(err.is_overflow());
        assert!(err.violated_fields().is_empty());
        assert_eq!(err.to_string(), "sum of quantity for 'Sul' overflows");
    }

    #[test]
    fn empty_violations_pass() {
        assert!(Violations::default().into_result().is_ok());
    }
}
