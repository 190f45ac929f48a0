//! Tree sources: mapping references to content
//!
//! The repository never performs I/O itself; it asks a [`TreeSource`].

use crate::error::ResolutionError;
use arbor_parser::TreeContent;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Source trait for resolving references into tree content
///
/// Implement this trait to load trees from somewhere other than the
/// filesystem or memory.
pub trait TreeSource: Send + Sync + 'static {
    /// Resolve reference into content
    ///
    /// # Errors
    /// Returns [`ResolutionError`] if the reference does not correspond to
    /// retrievable content.
    fn resolve(&self, reference: &str) -> Result<TreeContent, ResolutionError>;
}

/// Resolves references as paths relative to a root directory
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Create source rooted at directory
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a reference to a path under the root
    ///
    /// References must be relative and must not climb out of the root.
    pub fn path_for(&self, reference: &str) -> Result<PathBuf, ResolutionError> {
        if reference.trim().is_empty() {
            return Err(ResolutionError::invalid_reference(reference, "empty reference"));
        }
        let relative = Path::new(reference);
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(ResolutionError::invalid_reference(
                        reference,
                        "parent directory components are not allowed",
                    ))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(ResolutionError::invalid_reference(
                        reference,
                        "absolute paths are not allowed",
                    ))
                }
            }
        }
        Ok(self.root.join(relative))
    }
}

impl Default for FileSource {
    /// Source rooted at the working directory
    fn default() -> Self {
        Self::new(".")
    }
}

impl TreeSource for FileSource {
    fn resolve(&self, reference: &str) -> Result<TreeContent, ResolutionError> {
        let path = self.path_for(reference)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(TreeContent::new(reference, text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ResolutionError::not_found(reference))
            }
            Err(e) => Err(ResolutionError::io_error(path, e)),
        }
    }
}

/// In-memory reference → text map
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    trees: HashMap<String, String>,
}

impl MemorySource {
    /// Create empty source
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With tree text under reference
    #[inline]
    #[must_use]
    pub fn with_tree(mut self, reference: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(reference, text);
        self
    }

    /// Insert or replace tree text
    pub fn insert(&mut self, reference: impl Into<String>, text: impl Into<String>) {
        self.trees.insert(reference.into(), text.into());
    }

    /// Number of stored trees
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether no trees are stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl TreeSource for MemorySource {
    fn resolve(&self, reference: &str) -> Result<TreeContent, ResolutionError> {
        self.trees
            .get(reference)
            .map(|text| TreeContent::new(reference, text.as_str()))
            .ok_or_else(|| ResolutionError::not_found(reference))
    }
}
