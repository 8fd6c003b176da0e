//! Subcommand implementations.

mod graph;
mod replace;
mod tidylist;
mod work;

pub use graph::execute_graph;
pub use replace::{execute_insert, execute_prune};
pub use tidylist::{FileSink, ScheduleSink, TidylistArgs, execute_tidylist};
pub use work::execute_work;

use crate::cli::{Cli, CliError, Commands};
use crate::config::FileConfig;
use crate::tracing::correlation_id;
use crosslink_gomod::discover;
use crosslink_graph::{GraphConfig, ModuleGraph};
use std::io;
use std::path::Path;

/// A discovered repository and its module graph.
#[derive(Debug)]
pub struct Repository {
    /// `go` directive of the root manifest.
    pub go_version: Option<String>,
    /// The module graph.
    pub graph: ModuleGraph,
}

/// Discover every manifest under `root` and build the module graph.
///
/// # Errors
///
/// Returns an error if discovery fails or the graph cannot be built.
pub fn load_repository(root: &Path, config: &GraphConfig) -> Result<Repository, CliError> {
    let discovery = discover(root)?;
    let graph = ModuleGraph::build(&discovery.root_module, discovery.records, config)?;
    Ok(Repository {
        go_version: discovery.go_version,
        graph,
    })
}

/// Run the parsed command line.
///
/// # Errors
///
/// Returns the first error raised by configuration loading or the command.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let span = tracing::info_span!(
        "command",
        command = %cli.command.name(),
        correlation_id = %correlation_id(),
    );
    let _guard = span.enter();

    let config = FileConfig::load(&cli.root, cli.config.as_deref())?;

    match &cli.command {
        Commands::Tidylist {
            output,
            allow_circular,
            skip,
            verify,
        } => {
            let args = TidylistArgs {
                allow_circular: config.allow_circular_path(&cli.root, allow_circular.as_deref()),
                skip: config.skip_path(&cli.root, skip.as_deref()),
                verify: *verify || config.verify,
                namespace_policy: config.namespace_policy,
            };
            execute_tidylist(&cli.root, &args, &mut FileSink::new(output))
        }
        Commands::Insert { overwrite, exclude } => execute_insert(
            &cli.root,
            *overwrite,
            &config.exclusions(exclude),
            config.namespace_policy,
        ),
        Commands::Prune { exclude } => execute_prune(
            &cli.root,
            &config.exclusions(exclude),
            config.namespace_policy,
        ),
        Commands::Work { go_version } => {
            execute_work(&cli.root, go_version.as_deref(), config.namespace_policy).map(|_| ())
        }
        Commands::Graph => {
            execute_graph(&cli.root, config.namespace_policy, &mut io::stdout().lock())
        }
    }
}
