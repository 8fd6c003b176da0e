//! Intra-repository module dependency graph and tidy scheduling.
//!
//! This crate turns the manifests of a multi-module repository into a
//! dependency graph restricted to the repository's own modules, partitions it
//! into strongly connected components with Tarjan's algorithm, and flattens
//! those components into a schedule: an order in which the modules can be
//! tidied so that every module sees the effects of its dependencies, even
//! across circular dependencies.
//!
//! # Key Types
//!
//! - [`ModuleGraph`]: the graph built from [`ManifestRecord`]s
//! - [`Decomposition`]: components in emission order plus the modules in cycles
//! - [`Schedule`]: the flattened processing order
//!
//! # Example
//!
//! ```
//! use crosslink_graph::{GraphConfig, ManifestRecord, ModuleGraph, plan_tidy};
//! use std::collections::BTreeSet;
//!
//! let records = vec![
//!     ManifestRecord::new(".", "example.com/repo", Vec::<String>::new()),
//!     ManifestRecord::new("./a", "example.com/repo/a", ["example.com/repo/b"]),
//!     ManifestRecord::new("./b", "example.com/repo/b", Vec::<String>::new()),
//! ];
//! let graph = ModuleGraph::build("example.com/repo", records, &GraphConfig::default())?;
//! let schedule = plan_tidy(&graph, &BTreeSet::new(), true)?;
//! assert_eq!(schedule.render(), ".\n./b\n./a");
//! # Ok::<(), crosslink_graph::Error>(())
//! ```

mod config;
mod error;
mod graph;
mod scc;
mod schedule;
mod validate;

pub use config::{GraphConfig, NamespacePolicy, SkipList, normalize_module_path};
pub use error::{Error, Result};
pub use graph::{GraphNode, ManifestRecord, ModuleGraph, ModuleRef};
pub use scc::{Component, Decomposition, decompose};
pub use schedule::{Schedule, plan_tidy, reconcile_allowlist};
pub use validate::validate_schedule;
