//! Error types for pipeline construction and execution.

use thiserror::Error;

/// Errors raised while declaring or driving a pipeline.
///
/// Construction problems (`UnknownStage`, `DuplicateStage`) are configuration
/// errors and surface immediately at setup time, before any data flows.
/// `Unit` wraps the first failure raised by a processing unit during a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A configurator looked up a stage label that was never declared.
    #[error("unknown stage label '{label}' (declared stages: {declared:?})")]
    UnknownStage {
        /// The label that was requested.
        label: String,
        /// The labels declared at construction, in order.
        declared: Vec<String>,
    },

    /// The same label appeared twice in the stage declaration.
    #[error("duplicate stage label '{0}' in pipeline declaration")]
    DuplicateStage(String),

    /// A processing unit failed during a run.
    ///
    /// Carries enough position information to identify the failing unit:
    /// the stage label and the unit's append index within that stage.
    #[error("unit '{unit}' (stage '{stage}', position {index}) failed")]
    Unit {
        /// Label of the stage the unit belongs to.
        stage: String,
        /// Name the unit reported via [`crate::Unit::name`].
        unit: String,
        /// Append position of the unit within its stage.
        index: usize,
        /// The original error raised by the unit.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PipelineError {
    pub(crate) fn unit(stage: &str, unit: &str, index: usize, source: anyhow::Error) -> Self {
        PipelineError::Unit {
            stage: stage.to_string(),
            unit: unit.to_string(),
            index,
            source: source.into(),
        }
    }
}
