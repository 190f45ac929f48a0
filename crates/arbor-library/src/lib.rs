//! Arbor Library
//!
//! A repository of behavior tree archetypes. Archetypes are parsed once per
//! reference and cached for the library's lifetime; every request returns a
//! fresh, independent deep clone.
//!
//! # Architecture
//!
//! ```text
//! client → BehaviorTreeLibrary → ArchetypeRepository ──hit──→ Arc<Archetype>
//!                                        │ miss                     │
//!                                        ↓                          ↓ clone
//!                             TreeSource → ArchetypeParser    BehaviorTree<B>
//! ```
//!
//! # Example
//!
//! ```rust
//! use arbor_library::{BehaviorTreeLibrary, MemorySource};
//!
//! let source = MemorySource::new().with_tree("patrol.tree", "ROOT->SEQUENCE[wait, moveTo, wait]");
//! let library = BehaviorTreeLibrary::with_source(source);
//!
//! let guard = library.create_behavior_tree_with("patrol.tree", "guard-1").unwrap();
//! let scout = library.create_behavior_tree::<&str>("patrol.tree").unwrap();
//!
//! assert_eq!(guard.node_count(), 4);
//! assert_eq!(guard.blackboard(), Some(&"guard-1"));
//! assert!(scout.blackboard().is_none());
//! assert_eq!(library.archetype_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod library;
pub mod repository;
pub mod source;

// Re-exports for convenience
pub use arbor_parser::{ArchetypeParser, DebugLevel, ParseError, TextParser, TreeContent, MAX_DEPTH};
pub use arbor_tree::{Archetype, BehaviorTree, CloneError, Task};
pub use config::{ConfigError, LibraryConfig};
pub use error::{LibraryError, LibraryResult, LoadError, ResolutionError};
pub use library::BehaviorTreeLibrary;
pub use repository::ArchetypeRepository;
pub use source::{FileSource, MemorySource, TreeSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the library
    pub use crate::error::{LibraryError, LibraryResult};
    pub use crate::library::BehaviorTreeLibrary;
    pub use crate::source::{FileSource, MemorySource, TreeSource};
    pub use arbor_parser::{ArchetypeParser, DebugLevel, TextParser};
    pub use arbor_tree::{Action, Archetype, BehaviorTree, Composite, CompositeKind, Param, Status, Task};
}
