//! Named task composition.
//!
//! A [`Task`] is a named unit of build work. Tasks compose in series (each
//! waits for the previous) or in parallel (each on its own tokio worker, so
//! one slow bundle never blocks another). The standard build is
//! `parallel(factored-scripts, series(inpage, contentscript))`.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info};

use crate::error::{CliError, Result};

type TaskFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// A named unit of build work.
pub struct Task {
    name: String,
    fut: TaskFuture,
}

impl Task {
    /// Wrap a future under a task name.
    pub fn new(name: impl Into<String>, fut: impl Future<Output = Result<()>> + Send + 'static) -> Self {
        Self {
            name: name.into(),
            fut: Box::pin(fut),
        }
    }

    /// The task's name, used in logs and error reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the task to completion.
    pub async fn run(self) -> Result<()> {
        debug!(task = %self.name, "task starting");
        let result = self.fut.await;
        match &result {
            Ok(()) => debug!(task = %self.name, "task finished"),
            Err(e) => debug!(task = %self.name, error = %e, "task failed"),
        }
        result
    }
}

/// Run tasks one after another, stopping at the first failure.
pub async fn compose_series(tasks: Vec<Task>) -> Result<()> {
    for task in tasks {
        task.run().await?;
    }
    Ok(())
}

/// Run tasks concurrently, each on its own tokio worker.
///
/// All tasks are spawned before any is awaited. The first failure is
/// returned after every spawned task has settled; later tasks are not
/// cancelled mid-write.
pub async fn compose_parallel(tasks: Vec<Task>) -> Result<()> {
    let mut handles = Vec::with_capacity(tasks.len());
    for task in tasks {
        let name = task.name().to_string();
        info!(task = %name, "spawning");
        handles.push((name, tokio::spawn(task.run())));
    }

    let mut first_error = None;
    for (name, handle) in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Err(join_err) => {
                if first_error.is_none() {
                    first_error = Some(CliError::Task {
                        name,
                        message: join_err.to_string(),
                    });
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
