//! A named, append-only slot of processing units.

use crate::unit::Unit;

/// A named slot in the pipeline holding an ordered sequence of units.
///
/// Stages are created by [`crate::PipelineBuilder`] from the declared label
/// list; configuration code only ever appends to them. Relative order of
/// stages, and of units within a stage, is fixed once the pipeline is built.
pub struct Stage<T> {
    label: String,
    units: Vec<Box<dyn Unit<T>>>,
}

impl<T: Send + 'static> Stage<T> {
    pub(crate) fn new(label: String) -> Self {
        Self {
            label,
            units: Vec::new(),
        }
    }

    /// The label this stage was declared under.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Append a unit to the end of this stage.
    ///
    /// Returns `&mut self` so several units can be pushed in one expression.
    /// Append is the only mutation a stage supports; units are never
    /// reordered, replaced, or removed.
    pub fn push(&mut self, unit: impl Unit<T> + 'static) -> &mut Self {
        self.units.push(Box::new(unit));
        self
    }

    /// Number of units appended so far.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True if no units have been appended.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub(crate) fn into_units(self) -> Vec<Box<dyn Unit<T>>> {
        self.units
    }
}
