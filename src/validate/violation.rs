//! Violation reporting per ERRORS.md
//!
//! A violation pinpoints one structural defect: the field path, the kind
//! of check that failed and a human description. A build surfaces the
//! complete list in one pass, so a caller can fix every offending source
//! column without re-running for each defect.

use std::fmt;

use serde::Serialize;

use crate::primitive::CoerceError;

/// The kind of check a violation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field of the matched definition is unpopulated
    MissingRequired,
    /// A populated field holds the wrong primitive kind
    TypeMismatch,
    /// A populated field has the wrong arity or tuple shape
    ShapeMismatch,
    /// An index does not resolve within its target array
    IndexOutOfRange,
    /// A declared cross-field predicate evaluated false
    InvariantBroken,
}

impl ViolationKind {
    /// Returns the string code as defined in ERRORS.md
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::MissingRequired => "GEO_MISSING_REQUIRED",
            ViolationKind::TypeMismatch => "GEO_TYPE_MISMATCH",
            ViolationKind::ShapeMismatch => "GEO_SHAPE_MISMATCH",
            ViolationKind::IndexOutOfRange => "GEO_INDEX_OUT_OF_RANGE",
            ViolationKind::InvariantBroken => "GEO_INVARIANT_BROKEN",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single reported failure of a required-field, type or invariant check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Field path, e.g. "locations.values" or "indices[0][2]"
    pub path: String,
    /// Check kind
    pub kind: ViolationKind,
    /// Human description
    pub detail: String,
}

impl Violation {
    pub fn missing_required(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ViolationKind::MissingRequired,
            detail: "required field is not populated".into(),
        }
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl fmt::Display,
        got: impl fmt::Display,
    ) -> Self {
        Self {
            path: path.into(),
            kind: ViolationKind::TypeMismatch,
            detail: format!("expected {}, got {}", expected, got),
        }
    }

    pub fn shape_mismatch(
        path: impl Into<String>,
        expected: impl fmt::Display,
        got: impl fmt::Display,
    ) -> Self {
        Self {
            path: path.into(),
            kind: ViolationKind::ShapeMismatch,
            detail: format!("expected {}, got {}", expected, got),
        }
    }

    pub fn index_out_of_range(path: impl Into<String>, index: u64, bound: usize) -> Self {
        Self {
            path: path.into(),
            kind: ViolationKind::IndexOutOfRange,
            detail: format!("index {} out of range for length {}", index, bound),
        }
    }

    pub fn invariant_broken(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ViolationKind::InvariantBroken,
            detail: detail.into(),
        }
    }

    pub fn undeclared(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ViolationKind::InvariantBroken,
            detail: "field is not declared by the catalogue entry".into(),
        }
    }

    /// Folds a primitive coercion failure into a violation at `path`.
    pub fn from_coerce(path: impl Into<String>, err: CoerceError) -> Self {
        match err {
            CoerceError::TypeMismatch { expected, got } => {
                Violation::type_mismatch(path, expected, got)
            }
            CoerceError::ShapeMismatch { expected, got } => {
                Violation::shape_mismatch(path, expected, got)
            }
            CoerceError::IndexOutOfRange { index, bound } => {
                Violation::index_out_of_range(path, index, bound)
            }
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': [{}] {}", self.path, self.kind.code(), self.detail)
    }
}
