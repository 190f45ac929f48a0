//! Arbor Parser
//!
//! Turns resolved tree text into [`Archetype`]s.
//!
//! # Architecture
//!
//! ```text
//! TreeContent → tokenize → recursive descent → Archetype
//! ```
//!
//! The [`ArchetypeParser`] trait is the seam the library calls through;
//! [`TextParser`] is the built-in bracket notation.
//!
//! # Example
//!
//! ```rust
//! use arbor_parser::{ArchetypeParser, TextParser, TreeContent};
//!
//! let content = TreeContent::new("patrol.tree", "ROOT->SEQUENCE[wait, moveTo, wait]");
//! let archetype = TextParser::new().parse(&content).unwrap();
//! assert_eq!(archetype.node_count(), 4);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod content;
pub mod error;
pub mod level;
mod lexer;
pub mod text;

pub use arbor_tree::Archetype;
pub use content::TreeContent;
pub use error::{ParseError, ParseResult};
pub use level::DebugLevel;
pub use text::{TextParser, MAX_DEPTH};

/// Parser trait for turning resolved content into archetypes
///
/// Implement this trait to support another tree description format.
pub trait ArchetypeParser: Send + Sync + 'static {
    /// Parse content into an archetype
    ///
    /// # Errors
    /// Returns [`ParseError`] if the content is not a well-formed tree.
    fn parse(&self, content: &TreeContent) -> ParseResult<Archetype>;

    /// Diagnostic verbosity
    fn debug_level(&self) -> DebugLevel {
        DebugLevel::NONE
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
