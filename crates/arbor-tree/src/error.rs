//! Error types for the task model

/// Errors raised while deep-copying a task tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloneError {
    /// Task kind declares itself non-cloneable
    #[error("task '{task}' cannot be cloned")]
    NotCloneable {
        /// Task name
        task: String,
    },

    /// Task-specific copy failure
    #[error("failed to clone task '{task}': {reason}")]
    Failed {
        /// Task name
        task: String,
        /// What went wrong
        reason: String,
    },
}

impl CloneError {
    /// Create not-cloneable error for task name
    pub fn not_cloneable(task: impl Into<String>) -> Self {
        Self::NotCloneable { task: task.into() }
    }

    /// Create copy failure for task name
    pub fn failed(task: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            task: task.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_error_display() {
        let err = CloneError::not_cloneable("sensor");
        assert_eq!(err.to_string(), "task 'sensor' cannot be cloned");

        let err = CloneError::failed("sensor", "handle closed");
        assert!(err.to_string().contains("handle closed"));
    }
}
