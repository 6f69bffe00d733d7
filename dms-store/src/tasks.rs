//! Task manager for async flows
//!
//! Every async flow the runtime starts is a keyed tokio task:
//! - Spawning with a key that is already running aborts the old flow
//! - Debounced flows wait before starting and restart the wait on each call
//! - Flows can be cancelled one by one or all at once (session teardown)
//!
//! Flows report through their [`Dispatcher`](crate::Dispatcher), so a task
//! here produces no output of its own. An aborted flow is dropped at its
//! current await point, which runs its drop guards (see
//! [`Dispatcher::bracket`](crate::Dispatcher::bracket)).
//!
//! # Example
//!
//! ```ignore
//! use dms_store::{TaskKey, TaskManager};
//! use std::time::Duration;
//!
//! let mut tasks = TaskManager::new();
//!
//! // Any previous "users" flow is aborted
//! tasks.spawn("users", flows::get_users(ctx.clone(), 0));
//!
//! // Only the last keystroke within 300ms reaches the server
//! tasks.debounce("search", Duration::from_millis(300), flows::search_users(ctx, query));
//!
//! tasks.cancel(&TaskKey::new("users"));
//! tasks.cancel_all();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;

/// Name a flow runs under; at most one flow per key is alive
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TaskKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Running flows by key. Dropping the manager aborts them all.
#[derive(Debug, Default)]
pub struct TaskManager {
    tasks: HashMap<TaskKey, AbortHandle>,
    // Aborted flows still unwinding; their drop guards may yet dispatch
    aborting: Vec<AbortHandle>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn start<F>(&mut self, key: TaskKey, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel(&key);
        tracing::trace!(task = %key, "Starting flow");
        let handle = tokio::spawn(future).abort_handle();
        self.tasks.insert(key, handle);
    }

    /// Run `future` under `key`, replacing whatever ran there.
    /// Needs a tokio runtime.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> &mut Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.start(key.into(), future);
        self
    }

    /// Like [`spawn`](Self::spawn), but the flow only starts after `quiet`
    /// has passed without another call for the same key.
    pub fn debounce<F>(&mut self, key: impl Into<TaskKey>, quiet: Duration, future: F) -> &mut Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.start(key.into(), async move {
            tokio::time::sleep(quiet).await;
            future.await;
        });
        self
    }

    /// Abort the flow under `key`, if any
    pub fn cancel(&mut self, key: &TaskKey) {
        let Some(handle) = self.tasks.remove(key) else {
            return;
        };
        if !handle.is_finished() {
            tracing::debug!(task = %key, "Cancelling flow");
            handle.abort();
            self.aborting.push(handle);
        }
    }

    pub fn cancel_all(&mut self) {
        let keys: Vec<TaskKey> = self.tasks.keys().cloned().collect();
        for key in keys {
            self.cancel(&key);
        }
    }

    /// Drop bookkeeping for flows that have completed
    pub fn prune(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
        self.aborting.retain(|handle| !handle.is_finished());
    }

    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.tasks.get(key).is_some_and(|handle| !handle.is_finished())
    }

    /// No flow is running. Aborted flows count until they have actually
    /// been dropped.
    pub fn is_idle(&self) -> bool {
        self.tasks
            .values()
            .chain(self.aborting.iter())
            .all(AbortHandle::is_finished)
    }

    /// Tracked keys, finished flows included until [`prune`](Self::prune)
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn running_keys(&self) -> impl Iterator<Item = &TaskKey> {
        self.tasks.keys()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[test]
    fn test_task_key() {
        let k1 = TaskKey::new("users");
        let k2 = TaskKey::from("users");
        let k3: TaskKey = String::from("users").into();

        assert_eq!(k1, k2);
        assert_eq!(k2, k3);
        assert_eq!(k1.name(), "users");
        assert_eq!(k1.to_string(), "users");
    }

    #[tokio::test]
    async fn test_spawn_runs_flow() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new();

        tasks.spawn("roles", async move {
            let _ = tx.send(42);
        });

        let value = tokio::time::timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_spawn_cancels_previous() {
        let mut tasks = TaskManager::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let c1 = counter.clone();
        tasks.spawn("users", async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            c1.fetch_add(1, Ordering::SeqCst);
        });

        let c2 = counter.clone();
        tasks.spawn("users", async move {
            c2.fetch_add(10, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_debounce_resets() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new();

        let first = tx.clone();
        tasks.debounce("search", Duration::from_millis(50), async move {
            let _ = first.send("ann");
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        tasks.debounce("search", Duration::from_millis(50), async move {
            let _ = tx.send("anna");
        });

        let value = tokio::time::timeout(Duration::from_millis(200), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");
        assert_eq!(value, "anna");

        let rest = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(matches!(rest, Ok(None)) || rest.is_err());
    }

    #[tokio::test]
    async fn test_cancel() {
        let mut tasks = TaskManager::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        tasks.spawn("documents", async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(tasks.is_running(&TaskKey::new("documents")));
        tasks.cancel(&TaskKey::new("documents"));
        assert!(!tasks.is_running(&TaskKey::new("documents")));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_idle_and_prune() {
        let mut tasks = TaskManager::new();
        tasks.spawn("quick", async {});

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(tasks.is_idle());
        assert_eq!(tasks.len(), 1);

        tasks.prune();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let mut tasks = TaskManager::new();

        tasks.spawn("a", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        tasks.spawn("b", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        assert_eq!(tasks.len(), 2);
        assert!(!tasks.is_idle());
        let mut keys: Vec<&str> = tasks.running_keys().map(TaskKey::name).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);

        tasks.cancel_all();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_flow_counts_until_dropped() {
        let mut tasks = TaskManager::new();
        tasks.spawn("login", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        tokio::task::yield_now().await;

        tasks.cancel(&TaskKey::new("login"));
        assert!(tasks.is_empty());
        assert!(!tasks.is_idle());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(tasks.is_idle());
        tasks.prune();
        assert!(tasks.is_idle());
    }
}
