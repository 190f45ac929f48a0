//! Concurrency Tests
//!
//! Single-flight population and independent instancing across threads.

use arbor_library::prelude::*;
use arbor_library::{LoadError, MemorySource, ResolutionError, TreeContent};
use arbor_test_utils::{patrol_source, CountingParser, CountingSource, EventCounter, PATROL_REF};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tracing::Level;

const THREADS: usize = 16;

#[test]
fn test_concurrent_requests_parse_once() {
    let source = CountingSource::new(patrol_source()).with_delay(Duration::from_millis(50));
    let parser = CountingParser::new();
    let library = BehaviorTreeLibrary::from_parts(source.clone(), parser.clone());
    let barrier = Barrier::new(THREADS);

    let mut trees = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let library = &library;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    library.create_behavior_tree_with(PATROL_REF, i).unwrap()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(source.log().count(PATROL_REF), 1);
    assert_eq!(parser.log().count(PATROL_REF), 1);
    assert_eq!(trees.len(), THREADS);

    let blackboards: HashSet<usize> = trees.iter().filter_map(|t| t.blackboard().copied()).collect();
    assert_eq!(blackboards.len(), THREADS);

    trees[0].task_at_mut(&[0, 1]).unwrap().set_status(Status::Running);
    for tree in &trees[1..] {
        assert_eq!(tree.task_at(&[0, 1]).unwrap().status(), Status::Fresh);
    }
}

#[test]
fn test_concurrent_failure_is_shared_then_retried() {
    let source = CountingSource::new(patrol_source()).with_delay(Duration::from_millis(200));
    let parser = CountingParser::failing(1);
    let library = BehaviorTreeLibrary::from_parts(source.clone(), parser.clone());
    let barrier = Barrier::new(THREADS);
    let events = EventCounter::default();
    let dispatch = events.dispatch();

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    let _guard = tracing::dispatcher::set_default(&dispatch);
                    barrier.wait();
                    library.create_behavior_tree::<()>(PATROL_REF).map(|t| t.node_count())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // One attempt ran; every caller waited on it
    assert_eq!(source.log().count(PATROL_REF), 1);
    assert_eq!(parser.log().count(PATROL_REF), 1);
    assert_eq!(events.count(Level::WARN), 1);

    let causes: Vec<Arc<LoadError>> = results
        .into_iter()
        .map(|result| match result {
            Err(LibraryError::Load { source, .. }) => source,
            other => panic!("expected shared load failure, got {other:?}"),
        })
        .collect();
    assert_eq!(causes.len(), THREADS);
    assert!(causes.iter().all(|cause| Arc::ptr_eq(cause, &causes[0])));
    assert!(matches!(&*causes[0], LoadError::Parse(_)));
    assert!(!library.contains(PATROL_REF));

    assert_eq!(library.create_behavior_tree::<()>(PATROL_REF).unwrap().node_count(), 4);
    assert_eq!(parser.log().count(PATROL_REF), 2);
    assert!(library.contains(PATROL_REF));
}

/// Source that holds `slow.tree` resolution until the test releases it
struct GatedSource {
    inner: MemorySource,
    gate: Arc<Barrier>,
}

impl TreeSource for GatedSource {
    fn resolve(&self, reference: &str) -> Result<TreeContent, ResolutionError> {
        if reference == "slow.tree" {
            self.gate.wait();
        }
        self.inner.resolve(reference)
    }
}

#[test]
fn test_populated_lookup_does_not_wait_on_other_population() {
    let gate = Arc::new(Barrier::new(2));
    let source = GatedSource {
        inner: patrol_source().with_tree("slow.tree", "root -> idle"),
        gate: Arc::clone(&gate),
    };
    let library = BehaviorTreeLibrary::with_source(source);
    library.create_behavior_tree::<()>(PATROL_REF).unwrap();

    thread::scope(|s| {
        let slow = s.spawn(|| library.create_behavior_tree::<()>("slow.tree"));

        // Would deadlock if cached lookups waited on the gated population
        for _ in 0..100 {
            library.create_behavior_tree::<()>(PATROL_REF).unwrap();
        }

        gate.wait();
        assert_eq!(slow.join().unwrap().unwrap().node_count(), 1);
    });

    assert_eq!(library.archetype_count(), 2);
}

proptest! {
    #[test]
    fn prop_each_reference_parses_once(requests in prop::collection::vec(0usize..4, 1..40)) {
        let references = ["a.tree", "b.tree", "c.tree", "d.tree"];
        let mut memory = MemorySource::new();
        for reference in references {
            memory.insert(reference, "root -> sequence [ wait, moveTo ]");
        }
        let parser = CountingParser::new();
        let library = BehaviorTreeLibrary::from_parts(memory, parser.clone());

        for &index in &requests {
            let tree = library.create_behavior_tree::<()>(references[index]).unwrap();
            prop_assert_eq!(tree.node_count(), 3);
        }

        let distinct: HashSet<usize> = requests.iter().copied().collect();
        for (index, reference) in references.iter().enumerate() {
            let expected = usize::from(distinct.contains(&index));
            prop_assert_eq!(parser.log().count(reference), expected);
        }
        prop_assert_eq!(library.archetype_count(), distinct.len() as u64);
    }
}
