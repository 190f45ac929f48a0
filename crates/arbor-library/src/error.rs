//! Error types for the archetype library
//!
//! Provides error handling for:
//! - Resolution (reference → content)
//! - Loading (resolution or parsing during population)
//! - Instancing (deep clone of a cached archetype)

use arbor_parser::ParseError;
use arbor_tree::CloneError;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors while mapping a reference to content
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// Nothing exists under the reference
    #[error("no tree found for reference '{reference}'")]
    NotFound {
        /// Requested reference
        reference: String,
    },

    /// Reference is not acceptable to this source
    #[error("invalid reference '{reference}': {reason}")]
    InvalidReference {
        /// Requested reference
        reference: String,
        /// Why the source refused it
        reason: String,
    },

    /// IO error while reading content
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl ResolutionError {
    /// Create not-found error for reference
    pub fn not_found(reference: impl Into<String>) -> Self {
        Self::NotFound {
            reference: reference.into(),
        }
    }

    /// Create invalid reference error
    pub fn invalid_reference(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to populate a repository entry
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Source could not resolve the reference
    #[error("resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// Parser rejected the content
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
}

/// Combined library error
#[derive(Debug, Clone, thiserror::Error)]
pub enum LibraryError {
    /// Population failed; shared by every caller that waited on the same attempt
    #[error("failed to load '{reference}': {source}")]
    Load {
        /// Requested reference
        reference: String,
        /// Shared population failure
        #[source]
        source: Arc<LoadError>,
    },

    /// Archetype could not be deep-copied
    #[error("failed to instantiate '{reference}': {source}")]
    Instantiate {
        /// Requested reference
        reference: String,
        /// Task that refused the copy
        #[source]
        source: CloneError,
    },

    /// Root fragment requested from an archetype without tasks
    #[error("archetype '{0}' has no root task")]
    EmptyArchetype(String),

    /// Reference already holds an archetype
    #[error("archetype '{0}' is already registered")]
    AlreadyRegistered(String),

    /// Registered archetype nests deeper than the library accepts
    #[error("archetype '{reference}' nests {depth} levels deep, limit is {limit}")]
    TooDeep {
        /// Requested reference
        reference: String,
        /// Nesting depth of the archetype
        depth: usize,
        /// Maximum accepted depth
        limit: usize,
    },
}

impl LibraryError {
    /// Create load error from a shared population failure
    pub fn load(reference: impl Into<String>, source: Arc<LoadError>) -> Self {
        Self::Load {
            reference: reference.into(),
            source,
        }
    }

    /// Create clone error for reference
    pub fn clone_failed(reference: impl Into<String>, source: CloneError) -> Self {
        Self::Instantiate {
            reference: reference.into(),
            source,
        }
    }

    /// Underlying parse error, if population failed while parsing
    #[must_use]
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Load { source, .. } => match &**source {
                LoadError::Parse(err) => Some(err),
                LoadError::Resolution(_) => None,
            },
            _ => None,
        }
    }

    /// Underlying resolution error, if population failed while resolving
    #[must_use]
    pub fn as_resolution_error(&self) -> Option<&ResolutionError> {
        match self {
            Self::Load { source, .. } => match &**source {
                LoadError::Resolution(err) => Some(err),
                LoadError::Parse(_) => None,
            },
            _ => None,
        }
    }
}

/// Result type alias for library operations
pub type LibraryResult<T> = Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_error_display() {
        let err = ResolutionError::not_found("patrol.tree");
        assert_eq!(err.to_string(), "no tree found for reference 'patrol.tree'");
    }

    #[test]
    fn load_error_conversions() {
        let err: LoadError = ResolutionError::not_found("x").into();
        assert!(matches!(err, LoadError::Resolution(_)));

        let err: LoadError = ParseError::other("x", "bad").into();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn library_error_accessors() {
        let err = LibraryError::load("x", Arc::new(ParseError::other("x", "bad").into()));
        assert!(err.as_parse_error().is_some());
        assert!(err.as_resolution_error().is_none());
        assert!(err.to_string().starts_with("failed to load 'x'"));

        let err = LibraryError::clone_failed("x", CloneError::not_cloneable("sensor"));
        assert!(err.as_parse_error().is_none());
        assert!(err.to_string().contains("sensor"));
    }
}
