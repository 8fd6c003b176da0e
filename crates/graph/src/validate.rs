//! Independent check that a schedule linearizes every dependency path.
//!
//! Paths are enumerated breadth-first: each path starts at a module and is
//! extended by prepending a dependency of its head that it does not already
//! contain. Every path must appear in the schedule as a subsequence, with
//! repeated schedule entries consumed one at a time.

use crate::{Error, ModuleGraph, Result, Schedule};
use std::collections::VecDeque;
use tracing::debug;

/// Verify that `schedule` satisfies every dependency path of `graph`.
///
/// # Errors
///
/// Returns [`Error::ScheduleInvalid`] naming the first path, dependencies
/// first, that the schedule cannot satisfy.
pub fn validate_schedule(graph: &ModuleGraph, schedule: &Schedule) -> Result<()> {
    let order: Vec<&str> = schedule
        .entries()
        .iter()
        .map(|e| e.module.as_str())
        .collect();

    let mut queue: VecDeque<Vec<&str>> = graph.nodes().map(|n| vec![n.name.as_str()]).collect();
    let mut checked = 0usize;

    while let Some(path) = queue.pop_front() {
        if !is_subsequence(&order, &path) {
            return Err(Error::schedule_invalid(
                path.iter().map(ToString::to_string).collect(),
            ));
        }
        checked += 1;

        let Some(head) = path.first().and_then(|name| graph.node(name)) else {
            continue;
        };
        for dep in &head.deps {
            if !path.contains(&dep.as_str()) {
                let mut extended = Vec::with_capacity(path.len() + 1);
                extended.push(dep.as_str());
                extended.extend_from_slice(&path);
                queue.push_back(extended);
            }
        }
    }

    debug!(paths = checked, "Schedule satisfies every dependency path");
    Ok(())
}

fn is_subsequence(order: &[&str], path: &[&str]) -> bool {
    let mut cursor = 0;
    for module in path {
        match order[cursor..].iter().position(|m| m == module) {
            Some(offset) => cursor += offset + 1,
            None => return false,
        }
    }
    true
}
