//! Composite tasks: tasks that own and order children

use crate::error::CloneError;
use crate::task::{clone_children, Status, Task};
use std::any::Any;
use std::fmt;
use std::str::FromStr;

/// Built-in composite kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    /// Runs children in order until one fails
    Sequence,
    /// Runs children in order until one succeeds
    Selector,
    /// Runs all children together
    Parallel,
}

impl CompositeKind {
    /// Canonical lower-case keyword
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::Selector => "selector",
            Self::Parallel => "parallel",
        }
    }
}

impl fmt::Display for CompositeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompositeKind {
    type Err = ();

    /// Case-insensitive keyword lookup
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("sequence") {
            Ok(Self::Sequence)
        } else if s.eq_ignore_ascii_case("selector") {
            Ok(Self::Selector)
        } else if s.eq_ignore_ascii_case("parallel") {
            Ok(Self::Parallel)
        } else {
            Err(())
        }
    }
}

/// Composite task node
#[derive(Debug)]
pub struct Composite {
    kind: CompositeKind,
    children: Vec<Box<dyn Task>>,
    status: Status,
}

impl Composite {
    /// Create composite with children
    #[inline]
    #[must_use]
    pub fn new(kind: CompositeKind, children: Vec<Box<dyn Task>>) -> Self {
        Self {
            kind,
            children,
            status: Status::Fresh,
        }
    }

    /// Composite kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    /// Append a child
    pub fn push(&mut self, child: Box<dyn Task>) {
        self.children.push(child);
    }
}

impl Task for Composite {
    fn name(&self) -> &str {
        self.kind.as_str()
    }

    fn children(&self) -> &[Box<dyn Task>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Task>] {
        &mut self.children
    }

    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    fn try_clone_task(&self) -> Result<Box<dyn Task>, CloneError> {
        Ok(Box::new(Self {
            kind: self.kind,
            children: clone_children(&self.children)?,
            status: self.status,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("SEQUENCE".parse(), Ok(CompositeKind::Sequence));
        assert_eq!("Selector".parse(), Ok(CompositeKind::Selector));
        assert_eq!("parallel".parse(), Ok(CompositeKind::Parallel));
        assert!("wait".parse::<CompositeKind>().is_err());
    }

    #[test]
    fn clone_is_deep() {
        let mut original = Composite::new(CompositeKind::Selector, vec![Box::new(Action::new("idle"))]);
        let mut copy = original.try_clone_task().unwrap();

        copy.children_mut()[0].set_status(Status::Succeeded);
        original.push(Box::new(Action::new("flee")));

        assert_eq!(original.children()[0].status(), Status::Fresh);
        assert_eq!(copy.child_count(), 1);
        assert_eq!(original.child_count(), 2);
    }
}
