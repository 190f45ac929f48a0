//! Parser diagnostic verbosity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic verbosity: `0` is silent, higher values log more
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebugLevel(pub u8);

impl DebugLevel {
    /// No diagnostics
    pub const NONE: Self = Self(0);
    /// One summary event per parsed tree
    pub const LOW: Self = Self(1);
    /// Summary plus one event per task
    pub const HIGH: Self = Self(2);

    /// Whether any diagnostics are emitted
    #[inline]
    #[must_use]
    pub fn is_silent(self) -> bool {
        self == Self::NONE
    }
}

impl From<u8> for DebugLevel {
    fn from(level: u8) -> Self {
        Self(level)
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
