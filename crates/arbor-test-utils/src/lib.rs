//! Testing utilities for Arbor workspace
//!
//! Call-counting and failure-injecting collaborators, plus shared fixtures.

#![allow(missing_docs)]

use arbor_library::{MemorySource, ResolutionError, TreeSource};
use arbor_parser::{ArchetypeParser, ParseError, ParseResult, TextParser, TreeContent};
use arbor_tree::{Action, Archetype, CloneError, Composite, CompositeKind, Status, Task};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub const PATROL_REF: &str = "patrol.tree";
pub const PATROL_TEXT: &str = "ROOT->SEQUENCE[wait(seconds=1), moveTo(target=\"gate\"), wait(seconds=1)]";

/// Per-reference call counter shared between a stub and the test
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<HashMap<String, usize>>>,
}

impl CallLog {
    pub fn record(&self, reference: &str) {
        *self.calls.lock().entry(reference.to_string()).or_default() += 1;
    }

    pub fn count(&self, reference: &str) -> usize {
        self.calls.lock().get(reference).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

/// Tracing layer counting events per level
///
/// Install with `tracing::dispatcher::set_default(&counter.dispatch())` on
/// every thread whose events should be counted.
#[derive(Debug, Clone, Default)]
pub struct EventCounter {
    counts: Arc<Mutex<HashMap<Level, usize>>>,
}

impl EventCounter {
    pub fn count(&self, level: Level) -> usize {
        self.counts.lock().get(&level).copied().unwrap_or(0)
    }

    /// Registry subscriber feeding this counter
    pub fn dispatch(&self) -> Dispatch {
        Dispatch::new(tracing_subscriber::registry().with(self.clone()))
    }
}

impl<S: Subscriber> Layer<S> for EventCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        *self.counts.lock().entry(*event.metadata().level()).or_default() += 1;
    }
}

/// Memory source that records every resolve call
#[derive(Debug, Clone)]
pub struct CountingSource {
    inner: MemorySource,
    log: CallLog,
    delay: Option<Duration>,
}

impl CountingSource {
    pub fn new(inner: MemorySource) -> Self {
        Self {
            inner,
            log: CallLog::default(),
            delay: None,
        }
    }

    /// Sleep inside every resolve, widening race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl TreeSource for CountingSource {
    fn resolve(&self, reference: &str) -> Result<TreeContent, ResolutionError> {
        self.log.record(reference);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.inner.resolve(reference)
    }
}

/// Text parser that records calls and can fail a set number of times
#[derive(Debug, Clone, Default)]
pub struct CountingParser {
    inner: TextParser,
    log: CallLog,
    failures_left: Arc<AtomicUsize>,
}

impl CountingParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` parse calls with [`ParseError::Other`]
    pub fn failing(n: usize) -> Self {
        let parser = Self::default();
        parser.failures_left.store(n, Ordering::SeqCst);
        parser
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl ArchetypeParser for CountingParser {
    fn parse(&self, content: &TreeContent) -> ParseResult<Archetype> {
        self.log.record(content.reference());
        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(ParseError::other(content.reference(), "injected failure"));
        }
        self.inner.parse(content)
    }
}

/// Task that refuses to be cloned
#[derive(Debug, Default)]
pub struct UncloneableTask {
    status: Status,
}

impl Task for UncloneableTask {
    fn name(&self) -> &str {
        "uncloneable"
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
        Err(CloneError::not_cloneable(self.name()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Memory source holding the patrol fixture
pub fn patrol_source() -> MemorySource {
    MemorySource::new().with_tree(PATROL_REF, PATROL_TEXT)
}

/// Archetype whose root holds `[A, B]` where A is a two-action sequence
pub fn two_branch_archetype(reference: &str) -> Archetype {
    Archetype::new(
        reference,
        vec![
            Box::new(Composite::new(
                CompositeKind::Sequence,
                vec![Box::new(Action::new("aim")), Box::new(Action::new("fire"))],
            )),
            Box::new(Action::new("reload")),
        ],
    )
}

/// Archetype with an uncloneable task nested under a selector
pub fn uncloneable_archetype(reference: &str) -> Archetype {
    Archetype::new(
        reference,
        vec![Box::new(Composite::new(
            CompositeKind::Selector,
            vec![Box::new(Action::new("idle")), Box::new(UncloneableTask::default())],
        ))],
    )
}
