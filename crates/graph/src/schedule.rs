//! Tidy scheduling: flattening components into a linear processing order.

use crate::graph::ModuleRef;
use crate::scc::{Decomposition, decompose};
use crate::validate::validate_schedule;
use crate::{Error, ModuleGraph, Result};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// A safe processing order over module directories.
///
/// A component of `k` members is written `k - 1` times in full followed by
/// its first member once more, which lets a single linear pass satisfy every
/// ordering requirement inside a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<ModuleRef>,
}

impl Schedule {
    /// Expand the components of `decomposition` in emission order.
    #[must_use]
    pub fn from_decomposition(decomposition: &Decomposition) -> Self {
        let mut entries = Vec::new();
        for component in &decomposition.components {
            for _ in 1..component.len() {
                entries.extend(component.members.iter().cloned());
            }
            if let Some(first) = component.members.first() {
                entries.push(first.clone());
            }
        }
        Self { entries }
    }

    /// Scheduled entries in order.
    #[must_use]
    pub fn entries(&self) -> &[ModuleRef] {
        &self.entries
    }

    /// Number of entries, counting repeats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Module directories in schedule order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    /// The newline-joined module directories handed to the schedule sink.
    #[must_use]
    pub fn render(&self) -> String {
        self.paths().collect::<Vec<_>>().join("\n")
    }
}

/// Check that the modules found in cycles are exactly the allowed ones.
///
/// # Errors
///
/// Returns [`Error::AllowlistMismatch`] listing every undeclared cycle member
/// and every stale allowlist entry.
pub fn reconcile_allowlist(circular: &BTreeSet<String>, allowed: &BTreeSet<String>) -> Result<()> {
    let undeclared: Vec<String> = circular.difference(allowed).cloned().collect();
    let stale: Vec<String> = allowed.difference(circular).cloned().collect();

    if undeclared.is_empty() && stale.is_empty() {
        return Ok(());
    }
    Err(Error::AllowlistMismatch { undeclared, stale })
}

/// Compute the tidy schedule for `graph`.
///
/// Decomposes the graph, reconciles the discovered cycles with `allowed`,
/// expands the components and, when `verify` is set, checks the result
/// against every dependency path.
///
/// # Errors
///
/// Returns [`Error::AllowlistMismatch`] or, with `verify`,
/// [`Error::ScheduleInvalid`].
pub fn plan_tidy(graph: &ModuleGraph, allowed: &BTreeSet<String>, verify: bool) -> Result<Schedule> {
    let decomposition = decompose(graph);
    reconcile_allowlist(&decomposition.circular, allowed)?;

    let schedule = Schedule::from_decomposition(&decomposition);
    debug!(entries = schedule.len(), "Expanded tidy schedule");

    if verify {
        validate_schedule(graph, &schedule)?;
    }

    info!(
        modules = graph.len(),
        entries = schedule.len(),
        circular = decomposition.circular.len(),
        "Computed tidy schedule"
    );
    Ok(schedule)
}
