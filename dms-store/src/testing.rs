//! Helpers for testing flows and reducers
//!
//! A [`TestHarness`] stands in for the runtime: it hands out a
//! [`Dispatcher`], collects everything a flow sends, and can fold the
//! collected actions into its own copy of the state.
//!
//! ```ignore
//! let mut harness = TestHarness::<AppState, Action>::default();
//! flows::get_roles(fakes.context(harness.dispatcher())).await;
//!
//! let actions = harness.apply_emitted(reducer);
//! assert_emitted!(actions, Action::RolesLoad(_));
//! assert_eq!(harness.state.role.len(), 2);
//! ```

use std::collections::VecDeque;

use tokio::sync::mpsc;

use crate::dispatch::Dispatcher;
use crate::store::Reducer;
use crate::{Action, ActionCategory};

pub struct TestHarness<S, A: Action> {
    pub state: S,
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
    /// Received but not yet handed out, oldest first
    held: VecDeque<A>,
}

impl<S, A: Action> TestHarness<S, A> {
    pub fn new(state: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            tx,
            rx,
            held: VecDeque::new(),
        }
    }

    /// Actions sent through this dispatcher are collected by the harness
    pub fn dispatcher(&self) -> Dispatcher<A> {
        Dispatcher::new(self.tx.clone())
    }

    /// Queue an action as if a flow had sent it
    pub fn emit(&self, action: A) {
        let _ = self.tx.send(action);
    }

    fn collect(&mut self) {
        while let Ok(action) = self.rx.try_recv() {
            self.held.push_back(action);
        }
    }

    /// Everything sent so far, in order; the queue is left empty
    pub fn drain_emitted(&mut self) -> Vec<A> {
        self.collect();
        self.held.drain(..).collect()
    }

    /// Drain and run each action through `reducer`, returning them in order
    pub fn apply_emitted(&mut self, reducer: Reducer<S, A>) -> Vec<A> {
        let actions = self.drain_emitted();
        for action in &actions {
            reducer(&mut self.state, action.clone());
        }
        actions
    }
}

impl<S: Default, A: Action> Default for TestHarness<S, A> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S, A: ActionCategory> TestHarness<S, A> {
    /// Take only the actions of `category`; the others stay queued in order
    pub fn drain_category(&mut self, category: &str) -> Vec<A> {
        self.collect();
        let (taken, kept): (VecDeque<A>, VecDeque<A>) = self
            .held
            .drain(..)
            .partition(|action| action.category() == Some(category));
        self.held = kept;
        taken.into()
    }
}

/// Assert that some action matches the pattern (an `if` guard is allowed)
///
/// ```ignore
/// assert_emitted!(actions, Action::AjaxCallEnd);
/// assert_emitted!(actions, Action::AuthAuthenticate { token } if token == "abc");
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $crate::count_emitted!($actions, $pattern $(if $guard)?) > 0,
            "no action matched `{}`; emitted: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that no action matches the pattern
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $crate::count_emitted!($actions, $pattern $(if $guard)?) == 0,
            "`{}` was emitted: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// First action matching the pattern, if any
#[macro_export]
macro_rules! find_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}

#[macro_export]
macro_rules! count_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}

/// Assert that some action belongs to `category`
#[macro_export]
macro_rules! assert_category_emitted {
    ($actions:expr, $category:expr) => {
        assert!(
            $actions
                .iter()
                .any(|a| $crate::ActionCategory::category(a) == Some($category)),
            "no `{}` action; emitted: {:?}",
            $category,
            $actions
        );
    };
}
