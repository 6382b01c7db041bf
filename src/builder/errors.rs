//! Build error types following ERRORS.md
//!
//! Every failure is a value the caller can inspect; the full violation
//! list of a rejected build is carried on the error, not logged and
//! dropped. Builds are never retried internally: the outcome is a
//! deterministic function of the input and mapping.

use thiserror::Error;

use crate::adapter::UnknownCrs;
use crate::validate::Violation;

use super::rows::SourceError;

/// Result type for build operations
pub type BuildResult<T> = Result<T, BuildError>;

/// A failed construction attempt.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The requested tag is not in the catalogue
    #[error("unknown variant '{0}'")]
    UnknownVariant(String),

    /// The mapping contradicts the catalogued field tree
    #[error("mapping error at '{path}': {reason}")]
    Mapping { path: String, reason: String },

    /// The external row producer failed mid-stream
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The CRS resolver does not know the requested identifier
    #[error("unknown coordinate reference system '{0}'")]
    UnknownCrs(String),

    /// The assembled draft is structurally invalid; nothing is returned
    #[error("construction rejected with {} violation(s)", violations.len())]
    SchemaViolation { violations: Vec<Violation> },
}

impl BuildError {
    pub(crate) fn mapping(path: impl Into<String>, reason: impl Into<String>) -> Self {
        BuildError::Mapping {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The violation list of a rejected build, if that is what failed.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            BuildError::SchemaViolation { violations } => Some(violations),
            _ => None,
        }
    }
}

impl From<UnknownCrs> for BuildError {
    fn from(err: UnknownCrs) -> Self {
        BuildError::UnknownCrs(err.0)
    }
}
