//! Leaf action tasks with named parameters

use crate::error::CloneError;
use crate::task::{Status, Task};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// Parameter value attached to an action
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Float(f64),
    /// `true` / `false`
    Bool(bool),
    /// Quoted string or bare identifier
    Text(String),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Leaf task performing a named action
#[derive(Debug, Clone)]
pub struct Action {
    name: String,
    params: BTreeMap<String, Param>,
    status: Status,
}

impl Action {
    /// Create action without parameters
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
            status: Status::Fresh,
        }
    }

    /// With parameter
    #[inline]
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Param>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get parameter
    #[inline]
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&Param> {
        self.params.get(key)
    }

    /// Set parameter, returning the previous value
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<Param>) -> Option<Param> {
        self.params.insert(key.into(), value.into())
    }

    /// All parameters, sorted by name
    #[inline]
    #[must_use]
    pub fn params(&self) -> &BTreeMap<String, Param> {
        &self.params
    }
}

impl Task for Action {
    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &[Box<dyn Task>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Task>] {
        &mut []
    }

    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    fn try_clone_task(&self) -> Result<Box<dyn Task>, CloneError> {
        Ok(Box::new(self.clone()))
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

    #[test]
    fn params_roundtrip_through_builder() {
        let action = Action::new("wait").with_param("seconds", 2i64).with_param("loop", true);

        assert_eq!(action.param("seconds"), Some(&Param::Int(2)));
        assert_eq!(action.param("loop"), Some(&Param::Bool(true)));
        assert!(action.param("missing").is_none());
        assert!(action.children().is_empty());
    }

    #[test]
    fn set_param_returns_previous() {
        let mut action = Action::new("moveTo").with_param("target", "home");
        let previous = action.set_param("target", "gate");
        assert_eq!(previous, Some(Param::Text("home".to_string())));
    }

    #[test]
    fn param_display() {
        assert_eq!(Param::Int(3).to_string(), "3");
        assert_eq!(Param::Text("a b".into()).to_string(), "\"a b\"");
    }
}
