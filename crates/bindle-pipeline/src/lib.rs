//! Labeled staged pipeline for stream processing.
//!
//! A pipeline is an ordered sequence of named *stages*, each holding an
//! ordered, append-only list of processing *units*. The stage labels act as
//! stable extension points: independent configuration code can inject units
//! into the correct conceptual phase (say `minify` or `dest`) without
//! coordinating with other injectors beyond stage membership.
//!
//! # Architecture
//!
//! - [`PipelineBuilder`] declares the stage skeleton up front and hands out
//!   append-only [`Stage`] handles. Looking up an undeclared label is a
//!   configuration error, surfaced immediately.
//! - [`Pipeline`] is the frozen result of [`PipelineBuilder::build`]. Its
//!   [`Pipeline::run`] drives an input stream through the concatenation of
//!   all stage unit lists, in stage-declaration order, then flushes each
//!   unit in order so buffering units can emit their tails.
//! - [`Unit`] is the opaque transform interface: one item in, zero or more
//!   items out, plus an end-of-input flush.
//!
//! Configuration happens through explicit [`PipelineBuilder::configure`]
//! calls in a fixed order, rather than through an event emitter. Generic
//! setup code and specialized setup code (for example "development builds
//! add inline source maps", "production builds add minification") each get
//! the builder in turn and append to the stages they care about.
//!
//! # Example
//!
//! ```
//! use bindle_pipeline::{PipelineBuilder, unit_fn};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), bindle_pipeline::PipelineError> {
//! let mut pipeline = PipelineBuilder::new(["transform", "sink"])?
//!     .configure(|b| {
//!         b.stage("transform")?
//!             .push(unit_fn("upper", |s: String| Ok(vec![s.to_uppercase()])));
//!         Ok(())
//!     })?
//!     .build();
//!
//! let out = pipeline.run_iter(vec!["hi".to_string()]).await?;
//! assert_eq!(out, vec!["HI".to_string()]);
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod pipeline;
mod stage;
mod unit;

pub use builder::PipelineBuilder;
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use stage::Stage;
pub use unit::{unit_fn, FnUnit, Unit};

/// Result type alias using [`PipelineError`].
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
