//! Archetype repository: reference-keyed, populate-once archetype cache
//!
//! Entries move from absent to populated exactly once and are never evicted.
//! Concurrent requests for the same absent reference share a single
//! resolve+parse attempt; a failed attempt inserts nothing, so the next
//! request retries from scratch.

use crate::error::{LibraryError, LibraryResult, LoadError};
use crate::source::TreeSource;
use arbor_parser::{ArchetypeParser, Archetype, DebugLevel, MAX_DEPTH};
use moka::sync::Cache;
use std::fmt;
use std::sync::Arc;

/// Reference-keyed archetype cache
///
/// Backed by an unbounded moka cache: lookups of populated references never
/// wait on the population of other references, and `try_get_with` keeps
/// population single-flight per key.
pub struct ArchetypeRepository {
    source: Box<dyn TreeSource>,
    parser: Box<dyn ArchetypeParser>,
    archetypes: Cache<String, Arc<Archetype>>,
}

impl ArchetypeRepository {
    /// Create repository over a source and a parser
    #[must_use]
    pub fn new(source: impl TreeSource, parser: impl ArchetypeParser) -> Self {
        Self {
            source: Box::new(source),
            parser: Box::new(parser),
            archetypes: Cache::builder().build(),
        }
    }

    /// Get cached archetype, loading it on first request
    ///
    /// # Errors
    /// Returns [`LibraryError::Load`] if the source or the parser fails.
    /// Callers that waited on the same attempt receive the same shared error.
    pub fn get_or_load(&self, reference: &str) -> LibraryResult<Arc<Archetype>> {
        if let Some(archetype) = self.archetypes.get(reference) {
            tracing::trace!(reference, "archetype cache hit");
            return Ok(archetype);
        }

        self.archetypes
            .try_get_with_by_ref(reference, || self.populate(reference))
            .map_err(|err| LibraryError::load(reference, err))
    }

    /// Runs once per attempt, however many callers wait on it
    fn populate(&self, reference: &str) -> Result<Arc<Archetype>, LoadError> {
        tracing::debug!(reference, "archetype cache miss, loading");
        match self.load(reference) {
            Ok(archetype) => {
                tracing::debug!(reference, tasks = archetype.node_count(), "archetype cached");
                Ok(Arc::new(archetype))
            }
            Err(err) => {
                tracing::warn!(reference, error = %err, "archetype load failed");
                Err(err)
            }
        }
    }

    fn load(&self, reference: &str) -> Result<Archetype, LoadError> {
        let content = self.source.resolve(reference)?;
        Ok(self.parser.parse(&content)?)
    }

    /// Cached archetype without loading
    #[inline]
    #[must_use]
    pub fn get(&self, reference: &str) -> Option<Arc<Archetype>> {
        self.archetypes.get(reference)
    }

    /// Whether reference is populated
    #[inline]
    #[must_use]
    pub fn contains(&self, reference: &str) -> bool {
        self.archetypes.contains_key(reference)
    }

    /// Populate reference with an already-built archetype
    ///
    /// Archetypes nesting deeper than [`MAX_DEPTH`] are refused, matching what
    /// the text parser accepts.
    ///
    /// # Errors
    /// - [`LibraryError::TooDeep`] if the archetype nests deeper than [`MAX_DEPTH`]
    /// - [`LibraryError::AlreadyRegistered`] if the reference is already
    ///   populated; archetypes are never replaced
    pub fn register(&self, reference: &str, archetype: Archetype) -> LibraryResult<Arc<Archetype>> {
        let depth = archetype.depth();
        if depth > MAX_DEPTH {
            return Err(LibraryError::TooDeep {
                reference: reference.to_string(),
                depth,
                limit: MAX_DEPTH,
            });
        }
        let entry = self
            .archetypes
            .entry_by_ref(reference)
            .or_insert_with(|| Arc::new(archetype));
        if entry.is_fresh() {
            tracing::debug!(reference, "archetype registered");
            Ok(entry.into_value())
        } else {
            Err(LibraryError::AlreadyRegistered(reference.to_string()))
        }
    }

    /// Number of populated references
    #[must_use]
    pub fn len(&self) -> u64 {
        self.archetypes.run_pending_tasks();
        self.archetypes.entry_count()
    }

    /// Whether no reference is populated
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parser diagnostic verbosity
    #[inline]
    #[must_use]
    pub fn debug_level(&self) -> DebugLevel {
        self.parser.debug_level()
    }
}

impl fmt::Debug for ArchetypeRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchetypeRepository")
            .field("archetypes", &self.archetypes.entry_count())
            .field("debug_level", &self.parser.debug_level())
            .finish_non_exhaustive()
    }
}
