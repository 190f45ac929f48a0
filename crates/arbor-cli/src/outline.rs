//! Indented text rendering of task trees

use arbor_tree::{Action, Archetype, Task};
use std::fmt::Write;

/// Render an archetype as an indented outline, one task per line
pub(crate) fn render(archetype: &Archetype) -> String {
    let mut out = format!("{} ({} tasks)\n", archetype.reference(), archetype.node_count());
    for child in archetype.children() {
        render_task(&mut out, &**child, 1);
    }
    out
}

fn render_task(out: &mut String, task: &dyn Task, depth: usize) {
    let _ = write!(out, "{:indent$}{}", "", task.name(), indent = depth * 2);
    if let Some(action) = task.as_any().downcast_ref::<Action>() {
        let params: Vec<_> = action
            .params()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        if !params.is_empty() {
            let _ = write!(out, "({})", params.join(", "));
        }
    }
    out.push('\n');
    for child in task.children() {
        render_task(out, &**child, depth + 1);
    }
}
