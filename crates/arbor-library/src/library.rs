//! Behavior tree library - main entry point
//!
//! Archetypes never run. They are only cloned to create behavior tree
//! instances that can run.

use crate::config::LibraryConfig;
use crate::error::{LibraryError, LibraryResult};
use crate::repository::ArchetypeRepository;
use crate::source::{FileSource, TreeSource};
use arbor_parser::{ArchetypeParser, Archetype, DebugLevel, TextParser};
use arbor_tree::{BehaviorTree, Task};
use std::sync::Arc;

/// Repository of behavior tree archetypes and factory of their instances
///
/// Every `create_*` call returns a fresh deep clone; the caller owns it and
/// the library keeps no reference to it.
#[derive(Debug)]
pub struct BehaviorTreeLibrary {
    repository: ArchetypeRepository,
}

impl BehaviorTreeLibrary {
    /// Create library reading trees from the working directory, parser silent
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_debug_level(DebugLevel::NONE)
    }

    /// Create library reading trees from the working directory
    #[inline]
    #[must_use]
    pub fn with_debug_level(debug_level: DebugLevel) -> Self {
        Self::with_source_and_debug_level(FileSource::default(), debug_level)
    }

    /// Create library over a source, parser silent
    #[inline]
    #[must_use]
    pub fn with_source(source: impl TreeSource) -> Self {
        Self::with_source_and_debug_level(source, DebugLevel::NONE)
    }

    /// Create library over a source with parser verbosity
    #[inline]
    #[must_use]
    pub fn with_source_and_debug_level(source: impl TreeSource, debug_level: DebugLevel) -> Self {
        Self::from_parts(source, TextParser::with_debug_level(debug_level))
    }

    /// Create library from configuration
    #[must_use]
    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::with_source_and_debug_level(FileSource::new(&config.root_dir), config.debug_level)
    }

    /// Create library over any source and parser
    #[inline]
    #[must_use]
    pub fn from_parts(source: impl TreeSource, parser: impl ArchetypeParser) -> Self {
        Self {
            repository: ArchetypeRepository::new(source, parser),
        }
    }

    /// Create a clone of the archetype's first top-level task
    ///
    /// Useful when the archetype's root is only a grouping wrapper.
    ///
    /// # Errors
    /// - [`LibraryError::Load`] if the archetype cannot be loaded
    /// - [`LibraryError::EmptyArchetype`] if the archetype has no tasks
    /// - [`LibraryError::Instantiate`] if the subtree cannot be cloned
    pub fn create_root_node(&self, reference: &str) -> LibraryResult<Box<dyn Task>> {
        let archetype = self.repository.get_or_load(reference)?;
        archetype
            .fragment()
            .map_err(|e| LibraryError::clone_failed(reference, e))?
            .ok_or_else(|| LibraryError::EmptyArchetype(reference.to_string()))
    }

    /// Create behavior tree without blackboard
    ///
    /// # Errors
    /// - [`LibraryError::Load`] if the archetype cannot be loaded
    /// - [`LibraryError::Instantiate`] if the archetype cannot be cloned
    #[inline]
    pub fn create_behavior_tree<B>(&self, reference: &str) -> LibraryResult<BehaviorTree<B>> {
        self.instantiate(reference, None)
    }

    /// Create behavior tree bound to a blackboard
    ///
    /// # Errors
    /// - [`LibraryError::Load`] if the archetype cannot be loaded
    /// - [`LibraryError::Instantiate`] if the archetype cannot be cloned
    #[inline]
    pub fn create_behavior_tree_with<B>(
        &self,
        reference: &str,
        blackboard: B,
    ) -> LibraryResult<BehaviorTree<B>> {
        self.instantiate(reference, Some(blackboard))
    }

    fn instantiate<B>(&self, reference: &str, blackboard: Option<B>) -> LibraryResult<BehaviorTree<B>> {
        let archetype = self.repository.get_or_load(reference)?;
        let tree = archetype
            .instantiate(blackboard)
            .map_err(|e| LibraryError::clone_failed(reference, e))?;
        tracing::trace!(reference, tasks = tree.node_count(), "behavior tree instantiated");
        Ok(tree)
    }

    /// Shared archetype for reference, loading it on first request
    ///
    /// # Errors
    /// Returns [`LibraryError::Load`] if the source or the parser fails.
    #[inline]
    pub fn archetype(&self, reference: &str) -> LibraryResult<Arc<Archetype>> {
        self.repository.get_or_load(reference)
    }

    /// Whether reference is already loaded
    #[inline]
    #[must_use]
    pub fn contains(&self, reference: &str) -> bool {
        self.repository.contains(reference)
    }

    /// Register an archetype built outside the library
    ///
    /// Nesting is limited to [`MAX_DEPTH`](arbor_parser::MAX_DEPTH) levels, the
    /// same limit the text parser applies.
    ///
    /// # Errors
    /// - [`LibraryError::TooDeep`] if the archetype nests too deeply
    /// - [`LibraryError::AlreadyRegistered`] if the reference is taken
    #[inline]
    pub fn register_archetype(&self, reference: &str, archetype: Archetype) -> LibraryResult<()> {
        self.repository.register(reference, archetype).map(|_| ())
    }

    /// Number of loaded archetypes
    #[inline]
    #[must_use]
    pub fn archetype_count(&self) -> u64 {
        self.repository.len()
    }

    /// Underlying repository
    #[inline]
    #[must_use]
    pub fn repository(&self) -> &ArchetypeRepository {
        &self.repository
    }
}

impl Default for BehaviorTreeLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn library() -> BehaviorTreeLibrary {
        BehaviorTreeLibrary::with_source(
            MemorySource::new().with_tree("patrol.tree", "ROOT->SEQUENCE[wait, moveTo, wait]"),
        )
    }

    #[test]
    fn library_default() {
        let library = BehaviorTreeLibrary::default();
        assert_eq!(library.archetype_count(), 0);
        assert_eq!(library.repository().debug_level(), DebugLevel::NONE);
    }

    #[test]
    fn from_config_uses_debug_level() {
        let config = LibraryConfig::new().with_debug_level(DebugLevel::HIGH);
        let library = BehaviorTreeLibrary::from_config(&config);
        assert_eq!(library.repository().debug_level(), DebugLevel::HIGH);
    }

    #[test]
    fn create_behavior_tree_binds_nothing_by_default() {
        let tree = library().create_behavior_tree::<u32>("patrol.tree").unwrap();
        assert!(tree.blackboard().is_none());
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn create_behavior_tree_with_binds_blackboard() {
        let tree = library().create_behavior_tree_with("patrol.tree", 42u32).unwrap();
        assert_eq!(tree.blackboard(), Some(&42));
    }

    #[test]
    fn create_root_node_returns_first_task() {
        let node = library().create_root_node("patrol.tree").unwrap();
        assert_eq!(node.name(), "sequence");
        assert_eq!(node.child_count(), 3);
    }

    #[test]
    fn create_root_node_of_empty_archetype_fails() {
        let library = library();
        library
            .register_archetype("empty", Archetype::new("empty", Vec::new()))
            .unwrap();

        let err = library.create_root_node("empty").unwrap_err();
        assert!(matches!(err, LibraryError::EmptyArchetype(r) if r == "empty"));
        assert!(library.contains("empty"));
    }
}
