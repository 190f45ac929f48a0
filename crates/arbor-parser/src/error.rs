//! Error types for archetype parsing

/// Errors raised while turning tree text into an archetype
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Input contains no tasks at all
    #[error("{reference}: empty tree description")]
    Empty {
        /// Reference of the content
        reference: String,
    },

    /// Token-level or grammar error
    #[error("{reference}:{line}:{column}: syntax error: {message}")]
    Syntax {
        /// Reference of the content
        reference: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// Description of the error
        message: String,
    },

    /// Well-formed text describing an invalid tree
    #[error("{reference}:{line}:{column}: invalid task: {message}")]
    InvalidTask {
        /// Reference of the content
        reference: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// Description of the error
        message: String,
    },

    /// Nesting exceeds the parser limit
    #[error("{reference}: tree nesting exceeds {limit} levels")]
    TooDeep {
        /// Reference of the content
        reference: String,
        /// Maximum nesting depth
        limit: usize,
    },

    /// Parser-specific error
    #[error("{reference}: {message}")]
    Other {
        /// Reference of the content
        reference: String,
        /// Description of the error
        message: String,
    },
}

impl ParseError {
    /// Create syntax error at position
    pub fn syntax(
        reference: impl Into<String>,
        (line, column): (usize, usize),
        message: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            reference: reference.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Create invalid task error at position
    pub fn invalid_task(
        reference: impl Into<String>,
        (line, column): (usize, usize),
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidTask {
            reference: reference.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Create parser-specific error
    pub fn other(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Other {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Reference of the content that failed
    #[must_use]
    pub fn reference(&self) -> &str {
        match self {
            Self::Empty { reference }
            | Self::Syntax { reference, .. }
            | Self::InvalidTask { reference, .. }
            | Self::TooDeep { reference, .. }
            | Self::Other { reference, .. } => reference,
        }
    }
}

/// Result type alias for parse operations
pub type ParseResult<T> = Result<T, ParseError>;
