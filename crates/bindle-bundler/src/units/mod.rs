//! Processing units for the build pipeline.
//!
//! Every unit here implements `bindle_pipeline::Unit<Chunk>` and is opaque
//! to the pipeline itself; which stage each one belongs to is convention,
//! wired up by the CLI's configurators:
//!
//! | stage             | units                                  |
//! |-------------------|----------------------------------------|
//! | `bundler`         | [`EnvSubstitute`], [`InlineFileRead`]  |
//! | `vinyl`           | [`VinylSource`] or [`Rename`]          |
//! | `sourcemaps:init` | [`SourceMapInit`]                      |
//! | `minify`          | [`Minify`]                             |
//! | `sourcemaps:write`| [`SourceMapWrite`]                     |
//! | `dest`            | [`Dest`], [`DepsDump`]                 |

mod deps_dump;
mod dest;
mod env;
mod inline;
mod minify;
mod rename;
mod sourcemaps;
mod vinyl;

pub use deps_dump::DepsDump;
pub use dest::Dest;
pub use env::EnvSubstitute;
pub use inline::InlineFileRead;
pub use minify::{Minify, MinifyLevel};
pub use rename::Rename;
pub use sourcemaps::{SourceMapInit, SourceMapWrite};
pub use vinyl::VinylSource;
