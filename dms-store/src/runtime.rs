//! Headless runtime: store, action channel and flow tasks in one place
//!
//! The runtime is the single authoritative owner of application state for a
//! session. Views call [`Runtime::dispatch`] for synchronous changes and
//! [`Runtime::spawn`] for async flows; flows send their actions back through
//! a [`Dispatcher`], and [`Runtime::run_until_idle`] applies them one at a
//! time in arrival order. Subscribers are called after every action that
//! replaced state, which is where a view re-renders.
//!
//! Dropping the runtime (or calling [`Runtime::shutdown`]) aborts every
//! in-flight flow.

use std::marker::PhantomData;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::dispatch::Dispatcher;
use crate::store::{DispatchStore, Reducer, Store};
use crate::tasks::{TaskKey, TaskManager};
use crate::Action;

/// How often `run_until_idle` re-checks flow completion while no action arrives
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(10);

type Subscriber<S> = Box<dyn FnMut(&S)>;

enum Wake<A> {
    Action(Option<A>),
    Poll,
    Shutdown,
}

/// Owner of the store for one session
pub struct Runtime<S, A: Action, St: DispatchStore<S, A> = Store<S, A>> {
    store: St,
    dispatcher: Dispatcher<A>,
    action_rx: mpsc::UnboundedReceiver<A>,
    tasks: TaskManager,
    subscribers: Vec<Subscriber<S>>,
    shutdown: CancellationToken,
    _marker: PhantomData<S>,
}

impl<S, A: Action> Runtime<S, A, Store<S, A>> {
    /// Create a runtime around a plain store
    pub fn new(state: S, reducer: Reducer<S, A>) -> Self {
        Self::from_store(Store::new(state, reducer))
    }
}

impl<S, A: Action, St: DispatchStore<S, A>> Runtime<S, A, St> {
    /// Create a runtime around any store (e.g. one with middleware)
    pub fn from_store(store: St) -> Self {
        let (dispatcher, action_rx) = Dispatcher::channel();
        Self {
            store,
            dispatcher,
            action_rx,
            tasks: TaskManager::new(),
            subscribers: Vec::new(),
            shutdown: CancellationToken::new(),
            _marker: PhantomData,
        }
    }

    /// A dispatcher for async flows
    pub fn dispatcher(&self) -> Dispatcher<A> {
        self.dispatcher.clone()
    }

    /// Current state
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Access the underlying store
    pub fn store(&self) -> &St {
        &self.store
    }

    /// Register a callback run after every state change
    pub fn subscribe(&mut self, subscriber: impl FnMut(&S) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Apply an action synchronously
    ///
    /// Returns `true` if state changed; subscribers have already run by then.
    pub fn dispatch(&mut self, action: A) -> bool {
        let changed = self.store.dispatch(action);
        if changed {
            let state = self.store.state();
            for subscriber in &mut self.subscribers {
                subscriber(state);
            }
        }
        changed
    }

    /// Queue an action to be applied by the next processing pass
    pub fn enqueue(&self, action: A) {
        self.dispatcher.dispatch(action);
    }

    /// Start an async flow under `key`, aborting a running flow with that key
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(key, future);
    }

    /// Start an async flow after `duration` of quiet on `key`
    pub fn debounce<F>(&mut self, key: impl Into<TaskKey>, duration: Duration, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.debounce(key, duration, future);
    }

    /// Abort the flow running under `key`
    pub fn cancel(&mut self, key: &TaskKey) {
        self.tasks.cancel(key);
    }

    /// Access the task manager
    pub fn tasks(&mut self) -> &mut TaskManager {
        &mut self.tasks
    }

    /// Apply every action currently queued
    ///
    /// Returns how many actions were applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action);
            applied += 1;
        }
        applied
    }

    /// Apply actions until every flow has finished and the queue is empty
    ///
    /// Once the shutdown token is cancelled, running flows are aborted and
    /// this returns as soon as they have unwound.
    pub async fn run_until_idle(&mut self) {
        loop {
            self.process_pending();
            if self.tasks.is_idle() {
                // Flows send before they finish, so one more pass catches
                // anything sent between the drain and the idle check.
                self.process_pending();
                self.tasks.prune();
                return;
            }

            let wake = tokio::select! {
                _ = self.shutdown.cancelled() => Wake::Shutdown,
                action = self.action_rx.recv() => Wake::Action(action),
                _ = tokio::time::sleep(IDLE_POLL_INTERVAL) => Wake::Poll,
            };

            match wake {
                Wake::Action(Some(action)) => {
                    self.dispatch(action);
                }
                Wake::Action(None) | Wake::Poll => {}
                Wake::Shutdown => {
                    self.tasks.cancel_all();
                    self.drain_aborted().await;
                    return;
                }
            }
        }
    }

    // Aborted flows send their bracket ends while being dropped, which
    // happens on a later scheduler tick than the abort itself.
    async fn drain_aborted(&mut self) {
        loop {
            self.process_pending();
            if self.tasks.is_idle() {
                self.process_pending();
                self.tasks.prune();
                return;
            }
            tokio::select! {
                Some(action) = self.action_rx.recv() => {
                    self.dispatch(action);
                }
                _ = tokio::time::sleep(IDLE_POLL_INTERVAL) => {}
            }
        }
    }

    /// Token that stops `run_until_idle` and aborts all flows when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Abort every flow and apply whatever they already sent
    ///
    /// Bracket ends of flows that are still unwinding arrive afterwards;
    /// the next [`run_until_idle`](Self::run_until_idle) applies them.
    pub fn shutdown(&mut self) {
        tracing::debug!(flows = self.tasks.len(), "Runtime shutting down");
        self.shutdown.cancel();
        self.tasks.cancel_all();
        self.process_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reduce_slice, Slice};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct TestState {
        busy: Slice<bool>,
        log: Slice<Vec<u32>>,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Start,
        End,
        Record(u32),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Start => "Start",
                TestAction::End => "End",
                TestAction::Record(_) => "Record",
            }
        }
    }

    fn busy(state: Slice<bool>, action: &TestAction) -> Slice<bool> {
        match action {
            TestAction::Start => Slice::new(true),
            TestAction::End => Slice::new(false),
            TestAction::Record(_) => state,
        }
    }

    fn log(state: Slice<Vec<u32>>, action: &TestAction) -> Slice<Vec<u32>> {
        match action {
            TestAction::Record(n) => {
                let mut next = state.to_inner();
                next.push(*n);
                Slice::new(next)
            }
            _ => state,
        }
    }

    fn reducer(state: &mut TestState, action: TestAction) -> bool {
        let a = reduce_slice(&mut state.busy, &action, busy);
        let b = reduce_slice(&mut state.log, &action, log);
        a || b
    }

    #[tokio::test]
    async fn test_flow_actions_applied_in_order() {
        let mut runtime = Runtime::new(TestState::default(), reducer);
        let dispatch = runtime.dispatcher();

        runtime.spawn("flow", async move {
            let _busy = dispatch.bracket(TestAction::Start, TestAction::End);
            tokio::time::sleep(Duration::from_millis(5)).await;
            dispatch.dispatch(TestAction::Record(1));
            dispatch.dispatch(TestAction::Record(2));
        });

        runtime.run_until_idle().await;

        assert_eq!(runtime.state().log.get(), &vec![1, 2]);
        assert!(!*runtime.state().busy);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes_only() {
        let mut runtime = Runtime::new(TestState::default(), reducer);
        let renders = Rc::new(Cell::new(0));
        let seen = renders.clone();
        runtime.subscribe(move |_state| seen.set(seen.get() + 1));

        runtime.dispatch(TestAction::Record(5));
        runtime.enqueue(TestAction::Record(6));
        runtime.process_pending();

        assert_eq!(renders.get(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_aborts_flow_and_closes_bracket() {
        let mut runtime = Runtime::new(TestState::default(), reducer);
        let dispatch = runtime.dispatcher();

        runtime.spawn("slow", async move {
            let _busy = dispatch.bracket(TestAction::Start, TestAction::End);
            tokio::time::sleep(Duration::from_secs(10)).await;
            dispatch.dispatch(TestAction::Record(99));
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        runtime.shutdown();
        // Abort is observed on the next scheduler tick
        tokio::time::sleep(Duration::from_millis(20)).await;
        runtime.process_pending();

        assert!(runtime.state().log.is_empty());
        assert!(!*runtime.state().busy);
    }

    #[tokio::test]
    async fn test_settle_after_shutdown_closes_bracket() {
        let mut runtime = Runtime::new(TestState::default(), reducer);
        let dispatch = runtime.dispatcher();

        runtime.spawn("slow", async move {
            let _busy = dispatch.bracket(TestAction::Start, TestAction::End);
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        runtime.process_pending();
        assert!(*runtime.state().busy);

        runtime.shutdown();
        runtime.run_until_idle().await;

        assert!(!*runtime.state().busy);
        assert!(runtime.tasks().is_idle());
    }

    #[tokio::test]
    async fn test_shutdown_token_stops_run_until_idle() {
        let mut runtime = Runtime::new(TestState::default(), reducer);
        let dispatch = runtime.dispatcher();
        let token = runtime.shutdown_token();

        runtime.spawn("slow", async move {
            let _busy = dispatch.bracket(TestAction::Start, TestAction::End);
            tokio::time::sleep(Duration::from_secs(30)).await;
            dispatch.dispatch(TestAction::Record(1));
        });
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        tokio::time::timeout(Duration::from_secs(5), runtime.run_until_idle())
            .await
            .expect("shutdown did not stop the runtime");

        assert!(runtime.state().log.is_empty());
        assert!(!*runtime.state().busy);
    }

    #[tokio::test]
    async fn test_run_until_idle_with_no_flows_returns() {
        let mut runtime = Runtime::new(TestState::default(), reducer);
        runtime.enqueue(TestAction::Record(3));
        runtime.run_until_idle().await;
        assert_eq!(runtime.state().log.get(), &vec![3]);
    }
}
