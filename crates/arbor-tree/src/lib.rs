//! Arbor Tree
//!
//! Task model for behavior trees: the [`Task`] capability trait, the
//! built-in [`Composite`] and [`Action`] tasks, parsed [`Archetype`]s and
//! runnable [`BehaviorTree`] instances.
//!
//! # Example
//!
//! ```rust
//! use arbor_tree::{Action, Archetype, Composite, CompositeKind, Task};
//!
//! let archetype = Archetype::new(
//!     "patrol.tree",
//!     vec![Box::new(Composite::new(
//!         CompositeKind::Sequence,
//!         vec![Box::new(Action::new("wait")), Box::new(Action::new("moveTo"))],
//!     ))],
//! );
//!
//! let tree = archetype.instantiate(Some("blackboard")).unwrap();
//! assert_eq!(tree.node_count(), 3);
//! assert_eq!(tree.blackboard(), Some(&"blackboard"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod action;
pub mod composite;
pub mod error;
pub mod task;
pub mod tree;

// Re-exports
pub use action::{Action, Param};
pub use composite::{Composite, CompositeKind};
pub use error::CloneError;
pub use task::{clone_children, Status, Task};
pub use tree::{Archetype, BehaviorTree};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
