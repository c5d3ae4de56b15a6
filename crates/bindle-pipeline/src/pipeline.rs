//! The frozen, runnable pipeline.

use futures::{Stream, StreamExt};

use crate::error::PipelineError;
use crate::stage::Stage;
use crate::unit::Unit;

/// One unit plus the position information needed for error reports.
struct Slot<T> {
    stage: String,
    index: usize,
    unit: Box<dyn Unit<T>>,
}

/// A frozen sequence of processing units, runnable any number of times.
///
/// Built by [`crate::PipelineBuilder::build`]. The global unit order is the
/// concatenation of each stage's unit list, in stage-declaration order; that
/// order never changes after construction.
///
/// [`Pipeline::run`] takes `&mut self`, so the same pipeline object can be
/// re-driven against a fresh input snapshot on every watch-mode update. The
/// unit set persists across runs; units are expected to drain their buffers
/// on flush so each run starts clean.
pub struct Pipeline<T> {
    slots: Vec<Slot<T>>,
}

impl<T: Send + 'static> Pipeline<T> {
    pub(crate) fn from_stages(stages: Vec<Stage<T>>) -> Self {
        let mut slots = Vec::new();
        for stage in stages {
            let label = stage.label().to_string();
            for (index, unit) in stage.into_units().into_iter().enumerate() {
                slots.push(Slot {
                    stage: label.clone(),
                    index,
                    unit,
                });
            }
        }
        Self { slots }
    }

    /// Total number of units across all stages.
    pub fn unit_count(&self) -> usize {
        self.slots.len()
    }

    /// Drive an input stream through every unit, end to end.
    ///
    /// Each input item passes through the units in global order; whatever
    /// exits the final unit is collected and returned. After the input is
    /// exhausted, each unit is flushed in order and its tail output cascades
    /// through the units downstream of it.
    ///
    /// # Errors
    ///
    /// The first unit failure aborts the run and is returned as
    /// [`PipelineError::Unit`], carrying the failing unit's stage label and
    /// position. Units downstream of the failure receive no further input.
    /// Partially produced output is not rolled back; re-running the
    /// pipeline is the recovery path.
    pub async fn run<S>(&mut self, mut input: S) -> Result<Vec<T>, PipelineError>
    where
        S: Stream<Item = T> + Send + Unpin,
    {
        let mut out = Vec::new();

        while let Some(item) = input.next().await {
            let survivors = advance(&mut self.slots, 0, vec![item]).await?;
            out.extend(survivors);
        }

        // End-of-input cascade: flush each unit in order, pushing its tail
        // through everything downstream before the next unit flushes.
        for i in 0..self.slots.len() {
            let flushed = {
                let slot = &mut self.slots[i];
                slot.unit
                    .flush()
                    .await
                    .map_err(|e| PipelineError::unit(&slot.stage, slot.unit.name(), slot.index, e))?
            };
            if flushed.is_empty() {
                continue;
            }
            let survivors = advance(&mut self.slots, i + 1, flushed).await?;
            out.extend(survivors);
        }

        tracing::debug!(units = self.slots.len(), emitted = out.len(), "run complete");
        Ok(out)
    }

    /// Convenience wrapper over [`Pipeline::run`] for in-memory snapshots.
    pub async fn run_iter<I>(&mut self, items: I) -> Result<Vec<T>, PipelineError>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send,
    {
        self.run(futures::stream::iter(items)).await
    }
}

/// Push a batch of items through the units starting at `start`.
async fn advance<T: Send + 'static>(
    slots: &mut [Slot<T>],
    start: usize,
    mut batch: Vec<T>,
) -> Result<Vec<T>, PipelineError> {
    for slot in slots.iter_mut().skip(start) {
        if batch.is_empty() {
            break;
        }
        let mut next = Vec::with_capacity(batch.len());
        for item in batch {
            let produced = slot
                .unit
                .process(item)
                .await
                .map_err(|e| PipelineError::unit(&slot.stage, slot.unit.name(), slot.index, e))?;
            next.extend(produced);
        }
        batch = next;
    }
    Ok(batch)
}
