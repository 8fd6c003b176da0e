//! Go module manifest support for crosslink.
//!
//! This crate is the filesystem side of crosslink: it finds every `go.mod`
//! in a repository and turns it into a [`ManifestRecord`](crosslink_graph::ManifestRecord),
//! reads the allowlist and skip-list files, edits `replace` directives and
//! writes `go.work` files. The graph algorithms live in `crosslink-graph`.
//!
//! # Example
//!
//! ```rust,no_run
//! use crosslink_gomod::{discover, ReplaceOptions, insert_replaces};
//! use crosslink_graph::{GraphConfig, ModuleGraph};
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let discovery = discover(root)?;
//! let graph = ModuleGraph::build(&discovery.root_module, discovery.records, &GraphConfig::default())?;
//! let _changes = insert_replaces(root, &graph, &ReplaceOptions::default())?;
//! # Ok::<(), crosslink_gomod::Error>(())
//! ```

pub mod discovery;
pub mod error;
pub mod lists;
pub mod modfile;
pub mod replace;
pub mod work;

pub use discovery::{Discovery, MANIFEST_FILE, discover, manifest_path};
pub use error::{Error, Result};
pub use lists::{parse_list, read_list};
pub use modfile::{GoMod, Replace, ReplaceOutcome, Require};
pub use replace::{
    ManifestChange, ReplaceOptions, insert_replaces, prune_replaces, relative_module_path,
};
pub use work::{WORK_FILE, render_go_work, write_go_work};
