//! Archetypes and behavior tree instances
//!
//! An [`Archetype`] is the parsed, never-run template of a tree. Running
//! trees are [`BehaviorTree`] instances produced by deep-cloning it.

use crate::error::CloneError;
use crate::task::{clone_children, walk, walk_mut, Task};

/// Parsed template tree
///
/// The archetype itself is the root wrapper; its children are the top-level
/// tasks declared under `root`.
#[derive(Debug)]
pub struct Archetype {
    reference: String,
    children: Vec<Box<dyn Task>>,
}

impl Archetype {
    /// Create archetype for reference
    #[inline]
    #[must_use]
    pub fn new(reference: impl Into<String>, children: Vec<Box<dyn Task>>) -> Self {
        Self {
            reference: reference.into(),
            children,
        }
    }

    /// Reference this archetype was loaded from
    #[inline]
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Top-level tasks
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Box<dyn Task>] {
        &self.children
    }

    /// Task at child-index path
    #[inline]
    #[must_use]
    pub fn task_at(&self, path: &[usize]) -> Option<&dyn Task> {
        walk(&self.children, path)
    }

    /// Number of tasks, root wrapper excluded
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.children.iter().map(|c| c.node_count()).sum()
    }

    /// Deepest task nesting; top-level tasks sit at depth 1
    ///
    /// Walks the tree iteratively, so it is safe on archetypes too deep to
    /// clone.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&dyn Task, usize)> = self.children.iter().map(|c| (&**c, 1)).collect();
        while let Some((task, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(task.children().iter().map(|c| (&**c, depth + 1)));
        }
        deepest
    }

    /// Deep copy into a runnable instance
    ///
    /// # Errors
    /// Returns [`CloneError`] if any task refuses to be copied.
    pub fn instantiate<B>(&self, blackboard: Option<B>) -> Result<BehaviorTree<B>, CloneError> {
        Ok(BehaviorTree {
            reference: self.reference.clone(),
            children: clone_children(&self.children)?,
            blackboard,
        })
    }

    /// Deep copy of the first top-level task only
    ///
    /// Returns `Ok(None)` if the archetype has no children.
    ///
    /// # Errors
    /// Returns [`CloneError`] if the subtree refuses to be copied.
    pub fn fragment(&self) -> Result<Option<Box<dyn Task>>, CloneError> {
        self.children.first().map(|c| c.try_clone_task()).transpose()
    }
}

/// Runnable behavior tree instance
///
/// Fully independent of the archetype it was cloned from. The blackboard is
/// the caller's context object, moved in and never inspected.
#[derive(Debug)]
pub struct BehaviorTree<B> {
    reference: String,
    children: Vec<Box<dyn Task>>,
    blackboard: Option<B>,
}

impl<B> BehaviorTree<B> {
    /// Reference of the originating archetype
    #[inline]
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Top-level tasks
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Box<dyn Task>] {
        &self.children
    }

    /// Mutable top-level tasks
    #[inline]
    pub fn children_mut(&mut self) -> &mut [Box<dyn Task>] {
        &mut self.children
    }

    /// Task at child-index path, e.g. `&[0, 1]` for the second child of the first task
    #[inline]
    #[must_use]
    pub fn task_at(&self, path: &[usize]) -> Option<&dyn Task> {
        walk(&self.children, path)
    }

    /// Mutable task at child-index path
    #[inline]
    pub fn task_at_mut(&mut self, path: &[usize]) -> Option<&mut dyn Task> {
        walk_mut(&mut self.children, path)
    }

    /// Number of tasks, root wrapper excluded
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.children.iter().map(|c| c.node_count()).sum()
    }

    /// Bound blackboard
    #[inline]
    #[must_use]
    pub fn blackboard(&self) -> Option<&B> {
        self.blackboard.as_ref()
    }

    /// Mutable bound blackboard
    #[inline]
    pub fn blackboard_mut(&mut self) -> Option<&mut B> {
        self.blackboard.as_mut()
    }

    /// Bind blackboard, returning the previous one
    pub fn set_blackboard(&mut self, blackboard: B) -> Option<B> {
        self.blackboard.replace(blackboard)
    }

    /// Unbind and return the blackboard
    pub fn take_blackboard(&mut self) -> Option<B> {
        self.blackboard.take()
    }

    /// Reset every task to fresh
    pub fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }
}
