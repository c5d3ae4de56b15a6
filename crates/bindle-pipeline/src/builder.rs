//! Stage skeleton construction and explicit configuration passes.

use std::collections::HashMap;

use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use crate::stage::Stage;

/// Builder declaring the stage skeleton of a pipeline.
///
/// The ordered label list is fixed at construction; each label owns an
/// append-only [`Stage`]. Configuration code asks for stages by label via
/// [`PipelineBuilder::stage`] and appends units; asking for an undeclared
/// label is a configuration error.
///
/// The builder replaces the implicit "emit an event, hope every subscriber
/// registered in time" coordination with explicit composition: call
/// [`PipelineBuilder::configure`] once per independent configurator, in a
/// fixed order, then [`PipelineBuilder::build`]. Each configurator only
/// needs to know which stage its units belong to, not whether or when the
/// other configurators ran.
pub struct PipelineBuilder<T> {
    stages: Vec<Stage<T>>,
    index: HashMap<String, usize>,
}

impl<T: Send + 'static> PipelineBuilder<T> {
    /// Declare a pipeline skeleton from an ordered list of stage labels.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DuplicateStage`] if the same label appears
    /// twice; labels must be unique within a pipeline.
    pub fn new<I, S>(labels: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stages = Vec::new();
        let mut index = HashMap::new();
        for label in labels {
            let label = label.into();
            if index.contains_key(&label) {
                return Err(PipelineError::DuplicateStage(label));
            }
            index.insert(label.clone(), stages.len());
            stages.push(Stage::new(label));
        }
        Ok(Self { stages, index })
    }

    /// Look up a declared stage by label.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownStage`] for a label not declared at
    /// construction. This is fatal at setup time by design: a typoed label
    /// would otherwise silently drop the units appended to it.
    pub fn stage(&mut self, label: &str) -> Result<&mut Stage<T>, PipelineError> {
        match self.index.get(label) {
            Some(&i) => Ok(&mut self.stages[i]),
            None => Err(PipelineError::UnknownStage {
                label: label.to_string(),
                declared: self.labels().map(str::to_string).collect(),
            }),
        }
    }

    /// Apply one configurator and return the builder for chaining.
    ///
    /// Configurators run synchronously, in the order `configure` is called,
    /// before any data flows. Calling `configure` any number of times is
    /// safe: stages only ever grow (append, never replace).
    pub fn configure<F>(mut self, f: F) -> Result<Self, PipelineError>
    where
        F: FnOnce(&mut Self) -> Result<(), PipelineError>,
    {
        f(&mut self)?;
        Ok(self)
    }

    /// Declared stage labels, in pipeline order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.label())
    }

    /// Freeze the skeleton into a runnable [`Pipeline`].
    ///
    /// Consumes the builder, so no structural mutation is possible once the
    /// first item flows through.
    pub fn build(self) -> Pipeline<T> {
        Pipeline::from_stages(self.stages)
    }
}
