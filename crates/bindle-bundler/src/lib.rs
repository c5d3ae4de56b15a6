//! Processing units and the bundler boundary for the bindle extension build.
//!
//! This crate supplies everything that flows through the labeled staged
//! pipeline from `bindle-pipeline`:
//!
//! - [`Chunk`] / [`Record`] - the stream item model: raw bundle bytes, and
//!   addressable file-like records once the `vinyl` stage has run.
//! - [`units`] - the concrete processing units: vinyl conversion, env
//!   substitution, file inlining, minification, source-map init/write,
//!   rename, destination writing, and the dependency-graph dump.
//! - [`Bundler`] - the source-reading collaborator interface, with
//!   [`ConcatBundler`] as the deliberately simple in-tree implementation
//!   (module resolution semantics of real bundlers are out of scope).
//!
//! The pipeline treats every unit uniformly as an ordered transform; which
//! stage a unit belongs to is a convention wired up by the CLI.

pub mod bundler;
pub mod error;
pub mod graph;
pub mod record;
pub mod units;

pub use bundler::{BundleOutput, Bundler, ConcatBundler};
pub use error::{BundlerError, Result};
pub use graph::{ModuleGraph, ModuleInfo};
pub use record::{file_chunk, Chunk, Record};
