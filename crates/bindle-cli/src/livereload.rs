//! Delayed output-directory watching for live reload.
//!
//! Watch mode has no completion signal from the first build, so the reload
//! watcher starts after a configured delay and then reports every change
//! under the dist directory to a [`LiveReload`] listener. The delay is a
//! heuristic for "the initial build has settled", nothing stronger.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::watcher::FileWatcher;

/// A listener notified when built output changes.
pub trait LiveReload: Send + Sync {
    /// Called once per changed output path.
    fn changed(&self, path: &Path);
}

/// Default listener: logs the changed path at info level.
pub struct LogReload;

impl LiveReload for LogReload {
    fn changed(&self, path: &Path) {
        info!(path = %path.display(), "output changed, reload");
    }
}

/// Start watching `dist_dir` after `delay`, notifying `listener` on changes.
///
/// Runs until the returned handle is aborted or the watcher channel closes.
/// Watcher setup failures are logged, not propagated; live reload is a
/// convenience and must never take down watch mode.
pub fn spawn(
    dist_dir: PathBuf,
    delay: Duration,
    listener: Arc<dyn LiveReload>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let (watcher, mut rx) = match FileWatcher::new(dist_dir.clone(), 200) {
            Ok(pair) => pair,
            Err(e) => {
                warn!(dir = %dist_dir.display(), error = %e, "live reload disabled");
                return;
            }
        };
        info!(dir = %watcher.root().display(), "live reload watching output");

        while let Some(change) = rx.recv().await {
            listener.changed(change.path());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingListener {
        seen: Mutex<Vec<PathBuf>>,
    }

    impl LiveReload for RecordingListener {
        fn changed(&self, path: &Path) {
            self.seen.lock().unwrap().push(path.to_path_buf());
        }
    }

    #[tokio::test]
    async fn notifies_listener_after_the_delay() {
        let dist = tempfile::tempdir().unwrap();
        let listener = Arc::new(RecordingListener {
            seen: Mutex::new(Vec::new()),
        });

        let handle = spawn(
            dist.path().to_path_buf(),
            Duration::from_millis(50),
            listener.clone(),
        );

        // Give the delayed watcher time to attach before changing output.
        tokio::time::sleep(Duration::from_millis(300)).await;
        std::fs::write(dist.path().join("ui.js"), "var a = 1;").unwrap();

        let mut notified = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if !listener.seen.lock().unwrap().is_empty() {
                notified = true;
                break;
            }
        }
        handle.abort();
        assert!(notified, "listener never notified of output change");
    }

    #[tokio::test]
    async fn missing_dist_dir_does_not_panic() {
        let handle = spawn(
            PathBuf::from("/nonexistent/dist"),
            Duration::from_millis(1),
            Arc::new(LogReload),
        );
        // The task logs and exits cleanly.
        handle.await.unwrap();
    }
}
