//! Task capability trait
//!
//! Every node of a behavior tree implements [`Task`]. The set of task kinds
//! is open: the library only relies on children access and deep cloning.

use crate::error::CloneError;
use std::any::Any;
use std::fmt::Debug;

/// Execution status carried by every task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Never run, or reset
    #[default]
    Fresh,
    /// Currently running
    Running,
    /// Finished successfully
    Succeeded,
    /// Finished unsuccessfully
    Failed,
    /// Terminated before completion
    Cancelled,
}

/// A behavior tree node
pub trait Task: Debug + Send + Sync + 'static {
    /// Task name as written in the source
    fn name(&self) -> &str;

    /// Child tasks in declaration order
    fn children(&self) -> &[Box<dyn Task>];

    /// Mutable child tasks
    fn children_mut(&mut self) -> &mut [Box<dyn Task>];

    /// Current execution status
    fn status(&self) -> Status;

    /// Overwrite execution status
    fn set_status(&mut self, status: Status);

    /// Deep copy of this task and its whole subtree
    ///
    /// # Errors
    /// Returns [`CloneError`] if this task or any descendant refuses to be copied.
    fn try_clone_task(&self) -> Result<Box<dyn Task>, CloneError>;

    /// Upcast for downcasting to the concrete task type
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete task type
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Child at index
    #[inline]
    fn child(&self, index: usize) -> Option<&dyn Task> {
        self.children().get(index).map(|c| &**c)
    }

    /// Number of direct children
    #[inline]
    fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Number of tasks in this subtree, self included
    fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Reset this subtree to [`Status::Fresh`]
    fn reset(&mut self) {
        self.set_status(Status::Fresh);
        for child in self.children_mut() {
            child.reset();
        }
    }
}

/// Deep-clone a list of children, failing on the first refusal
pub fn clone_children(children: &[Box<dyn Task>]) -> Result<Vec<Box<dyn Task>>, CloneError> {
    children.iter().map(|c| c.try_clone_task()).collect()
}

/// Follow a child-index path from a list of roots
pub(crate) fn walk<'a>(roots: &'a [Box<dyn Task>], path: &[usize]) -> Option<&'a dyn Task> {
    let (first, rest) = path.split_first()?;
    let mut current: &dyn Task = &**roots.get(*first)?;
    for &index in rest {
        current = current.child(index)?;
    }
    Some(current)
}

/// Mutable variant of [`walk`]
pub(crate) fn walk_mut<'a>(
    roots: &'a mut [Box<dyn Task>],
    path: &[usize],
) -> Option<&'a mut dyn Task> {
    let (first, rest) = path.split_first()?;
    let mut current: &mut dyn Task = &mut **roots.get_mut(*first)?;
    for &index in rest {
        current = &mut **current.children_mut().get_mut(index)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Composite, CompositeKind};

    fn sample() -> Vec<Box<dyn Task>> {
        vec![Box::new(Composite::new(
            CompositeKind::Sequence,
            vec![Box::new(Action::new("wait")), Box::new(Action::new("moveTo"))],
        ))]
    }

    #[test]
    fn status_defaults_to_fresh() {
        assert_eq!(Status::default(), Status::Fresh);
    }

    #[test]
    fn node_count_is_recursive() {
        let roots = sample();
        assert_eq!(roots[0].node_count(), 3);
        assert_eq!(roots[0].child_count(), 2);
    }

    #[test]
    fn walk_follows_paths() {
        let roots = sample();
        assert_eq!(walk(&roots, &[0, 1]).map(|t| t.name()), Some("moveTo"));
        assert!(walk(&roots, &[0, 5]).is_none());
        assert!(walk(&roots, &[]).is_none());
    }

    #[test]
    fn reset_clears_whole_subtree() {
        let mut roots = sample();
        let leaf = walk_mut(&mut roots, &[0, 0]).unwrap();
        leaf.set_status(Status::Running);
        roots[0].set_status(Status::Running);

        roots[0].reset();

        assert_eq!(roots[0].status(), Status::Fresh);
        assert_eq!(walk(&roots, &[0, 0]).unwrap().status(), Status::Fresh);
    }
}
