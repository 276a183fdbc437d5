//! Tokio Runtime Bridge
//!
//! The workspace is driven synchronously by its embedder, while data source calls
//! are async. Fetches are spawned onto one shared multi-thread runtime and report
//! back over a channel.
//!
//! ## Pattern
//!
//! ```text
//! Workspace (caller thread)
//!       │
//!       ▼
//! spawn_named_in_tokio("fetch-fleet", async { ... tx.send(event) })
//!       │
//!       ▼
//! tokio::Runtime::spawn()
//!       │
//!       ▼
//! ServiceEvent drained by Workspace::pump()
//! ```

use crate::error::{Error, Result};
use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::{Builder, Runtime};

/// Global tokio runtime instance; holds the build error if creation failed
static TOKIO_RUNTIME: OnceLock<std::result::Result<Runtime, String>> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> Result<&'static Runtime> {
    TOKIO_RUNTIME
        .get_or_init(|| {
            Builder::new_multi_thread()
                .worker_threads(2)
                .thread_name("fleet-console-io")
                .enable_all()
                .build()
                .map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|message| Error::Runtime {
            message: message.clone(),
        })
}

/// Spawn a detached task with a name (for debugging)
pub fn spawn_named_in_tokio<F>(name: &'static str, future: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::trace!("Spawning tokio task: {}", name);
    get_runtime()?.spawn(async move {
        future.await;
        tracing::trace!("Tokio task completed: {}", name);
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_spawned_task_runs_off_caller_thread() {
        let flag = Arc::new(AtomicBool::new(false));
        let flag_clone = flag.clone();
        let (tx, rx) = crossbeam_channel::bounded(1);
        let caller = std::thread::current().id();

        spawn_named_in_tokio("test-task", async move {
            flag_clone.store(true, Ordering::SeqCst);
            let _ = tx.send(std::thread::current().id());
        })
        .expect("runtime available");

        let worker = rx
            .recv_timeout(std::time::Duration::from_secs(2))
            .expect("task ran");
        assert!(flag.load(Ordering::SeqCst));
        assert_ne!(worker, caller);
    }

    #[test]
    fn test_runtime_is_shared() {
        let first = get_runtime().expect("runtime available") as *const Runtime;
        let second = get_runtime().expect("runtime available") as *const Runtime;
        assert_eq!(first, second);
    }
}
