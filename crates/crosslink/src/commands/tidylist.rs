use super::load_repository;
use crate::cli::CliError;
use crosslink_gomod::read_list;
use crosslink_graph::{GraphConfig, NamespacePolicy, SkipList, plan_tidy};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for a rendered tidy schedule.
pub trait ScheduleSink {
    /// Persist the rendered schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule cannot be stored.
    fn write_schedule(&mut self, rendered: &str) -> Result<(), CliError>;
}

/// Writes the schedule to a file, replacing any previous content.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScheduleSink for FileSink {
    fn write_schedule(&mut self, rendered: &str) -> Result<(), CliError> {
        fs::write(&self.path, rendered).map_err(|e| {
            CliError::io_with_help(
                format!("Failed to write {}: {e}", self.path.display()),
                "Check that the output directory exists and is writable",
            )
        })
    }
}

impl ScheduleSink for Vec<String> {
    fn write_schedule(&mut self, rendered: &str) -> Result<(), CliError> {
        self.push(rendered.to_string());
        Ok(())
    }
}

/// Resolved `tidylist` inputs.
#[derive(Debug, Clone, Default)]
pub struct TidylistArgs {
    /// Circular-dependency allowlist; no file means no cycles are allowed.
    pub allow_circular: Option<PathBuf>,
    /// Skip-list of module directories.
    pub skip: Option<PathBuf>,
    /// Validate the schedule before handing it to the sink.
    pub verify: bool,
    pub namespace_policy: NamespacePolicy,
}

fn read_optional_list(path: Option<&Path>) -> Result<BTreeSet<String>, CliError> {
    match path {
        Some(path) => read_list(path).map_err(|e| {
            CliError::from(e).with_help(format!("Create {} or drop the flag", path.display()))
        }),
        None => Ok(BTreeSet::new()),
    }
}

/// Compute the tidy schedule for the repository at `root` and hand it to `sink`.
///
/// # Errors
///
/// Returns an error if a list file cannot be read, the graph cannot be built,
/// the allowlist disagrees with the discovered cycles, or the sink fails.
pub fn execute_tidylist(
    root: &Path,
    args: &TidylistArgs,
    sink: &mut impl ScheduleSink,
) -> Result<(), CliError> {
    let allowed = read_optional_list(args.allow_circular.as_deref())?;
    let skip: SkipList = read_optional_list(args.skip.as_deref())?
        .into_iter()
        .collect();

    let config = GraphConfig::default()
        .with_namespace_policy(args.namespace_policy)
        .with_skip(skip);
    let repo = load_repository(root, &config)?;

    let schedule = plan_tidy(&repo.graph, &allowed, args.verify)?;
    sink.write_schedule(&schedule.render())?;
    info!(
        modules = repo.graph.len(),
        entries = schedule.len(),
        "Wrote tidy schedule"
    );
    Ok(())
}
