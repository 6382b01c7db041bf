//! Registry error types following ERRORS.md
//!
//! Error codes:
//! - GEO_UNKNOWN_VARIANT (REJECT)
//! - GEO_DUPLICATE_VARIANT (FATAL)

use std::fmt;

/// Severity levels for registry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, process continues
    Reject,
    /// Start-up must abort; the embedded table itself is defective
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Registry error codes as defined in ERRORS.md
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryErrorCode {
    /// Variant tag is not one of the registered kinds
    GeoUnknownVariant,
    /// The same variant tag was registered twice
    GeoDuplicateVariant,
}

impl RegistryErrorCode {
    /// Returns the string code as defined in ERRORS.md
    pub fn code(&self) -> &'static str {
        match self {
            RegistryErrorCode::GeoUnknownVariant => "GEO_UNKNOWN_VARIANT",
            RegistryErrorCode::GeoDuplicateVariant => "GEO_DUPLICATE_VARIANT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            RegistryErrorCode::GeoUnknownVariant => Severity::Reject,
            RegistryErrorCode::GeoDuplicateVariant => Severity::Fatal,
        }
    }
}

impl fmt::Display for RegistryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Registry error with full context
#[derive(Debug, Clone)]
pub struct RegistryError {
    code: RegistryErrorCode,
    message: String,
    variant: Option<String>,
}

impl RegistryError {
    /// Create an unknown variant error
    pub fn unknown_variant(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            code: RegistryErrorCode::GeoUnknownVariant,
            message: format!("variant '{}' is not in the catalogue", tag),
            variant: Some(tag),
        }
    }

    /// Create a duplicate variant error (FATAL)
    pub fn duplicate_variant(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            code: RegistryErrorCode::GeoDuplicateVariant,
            message: format!("variant '{}' registered twice", tag),
            variant: Some(tag),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> RegistryErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the variant tag if applicable
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Returns whether start-up must abort
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for RegistryError {}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
