//! Resolved tree content handed from a source to a parser

/// Tree description text together with the reference it was resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeContent {
    reference: String,
    text: String,
}

impl TreeContent {
    /// Create content for reference
    #[inline]
    #[must_use]
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
        }
    }

    /// Reference the text was resolved from
    #[inline]
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Raw description text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
