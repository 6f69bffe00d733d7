//! The state container and its dispatch entry point
//!
//! A [`Store`] owns the session state and one root reducer. Every change goes
//! through [`Store::dispatch`], which reports whether any slice was replaced
//! so the caller knows when views must re-read the state.
//!
//! ```ignore
//! fn busy(_state: Slice<bool>, action: &AppAction) -> Slice<bool> {
//!     match action {
//!         AppAction::AjaxCallStart => Slice::new(true),
//!         AppAction::AjaxCallEnd => Slice::new(false),
//!     }
//! }
//!
//! fn reducer(state: &mut AppState, action: AppAction) -> bool {
//!     reduce_slice(&mut state.busy, &action, busy)
//! }
//!
//! let mut store = Store::new(AppState::default(), reducer);
//! assert!(store.dispatch(AppAction::AjaxCallStart));
//! ```

use crate::Action;
use std::marker::PhantomData;

/// Root reducer: apply one action to the whole state, `true` if a slice was
/// replaced. Usually a chain of [`reduce_slice`](crate::reduce_slice) calls.
pub type Reducer<S, A> = fn(&mut S, A) -> bool;

pub struct Store<S, A: Action> {
    state: S,
    reducer: Reducer<S, A>,
    _action: PhantomData<A>,
}

impl<S, A: Action> Store<S, A> {
    pub fn new(state: S, reducer: Reducer<S, A>) -> Self {
        Self {
            state,
            reducer,
            _action: PhantomData,
        }
    }

    /// Run the reducer; `true` if the state changed
    pub fn dispatch(&mut self, action: A) -> bool {
        (self.reducer)(&mut self.state, action)
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

/// Observes every action around the reducer call
///
/// Both hooks default to doing nothing, and `()` is the empty middleware.
pub trait Middleware<A: Action> {
    fn before(&mut self, _action: &A) {}

    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

impl<A: Action> Middleware<A> for () {}

/// A [`Store`] whose dispatches pass through a [`Middleware`]
pub struct StoreWithMiddleware<S, A: Action, M: Middleware<A>> {
    inner: Store<S, A>,
    middleware: M,
}

impl<S, A: Action, M: Middleware<A>> StoreWithMiddleware<S, A, M> {
    pub fn new(state: S, reducer: Reducer<S, A>, middleware: M) -> Self {
        Self {
            inner: Store::new(state, reducer),
            middleware,
        }
    }

    pub fn dispatch(&mut self, action: A) -> bool {
        self.middleware.before(&action);
        let changed = self.inner.dispatch(action.clone());
        self.middleware.after(&action, changed);
        changed
    }

    pub fn state(&self) -> &S {
        self.inner.state()
    }

    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }
}

/// What the [`Runtime`](crate::Runtime) needs from a store
pub trait DispatchStore<S, A: Action> {
    fn dispatch(&mut self, action: A) -> bool;

    fn state(&self) -> &S;
}

impl<S, A: Action> DispatchStore<S, A> for Store<S, A> {
    fn dispatch(&mut self, action: A) -> bool {
        Store::dispatch(self, action)
    }

    fn state(&self) -> &S {
        Store::state(self)
    }
}

impl<S, A: Action, M: Middleware<A>> DispatchStore<S, A> for StoreWithMiddleware<S, A, M> {
    fn dispatch(&mut self, action: A) -> bool {
        StoreWithMiddleware::dispatch(self, action)
    }

    fn state(&self) -> &S {
        StoreWithMiddleware::state(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reduce_slice, Slice};

    #[derive(Default)]
    struct Session {
        busy: Slice<bool>,
        titles: Slice<Vec<String>>,
    }

    #[derive(Clone, Debug)]
    enum Act {
        Start,
        End,
        AddTitle(String),
        Unknown,
    }

    impl Action for Act {
        fn name(&self) -> &'static str {
            match self {
                Act::Start => "Start",
                Act::End => "End",
                Act::AddTitle(_) => "AddTitle",
                Act::Unknown => "Unknown",
            }
        }
    }

    fn busy(state: Slice<bool>, action: &Act) -> Slice<bool> {
        match action {
            Act::Start => Slice::new(true),
            Act::End => Slice::new(false),
            _ => state,
        }
    }

    fn titles(state: Slice<Vec<String>>, action: &Act) -> Slice<Vec<String>> {
        match action {
            Act::AddTitle(title) => {
                let mut next = state.to_inner();
                next.push(title.clone());
                Slice::new(next)
            }
            _ => state,
        }
    }

    fn reducer(state: &mut Session, action: Act) -> bool {
        let busy_changed = reduce_slice(&mut state.busy, &action, busy);
        let titles_changed = reduce_slice(&mut state.titles, &action, titles);
        busy_changed || titles_changed
    }

    #[test]
    fn test_dispatch_reports_changes() {
        let mut store = Store::new(Session::default(), reducer);

        assert!(store.dispatch(Act::Start));
        assert!(*store.state().busy);
        assert!(store.dispatch(Act::AddTitle("Minutes".into())));
        assert_eq!(store.state().titles.len(), 1);
        assert!(store.dispatch(Act::End));
        assert!(!*store.state().busy);
    }

    #[test]
    fn test_unknown_action_keeps_every_slice() {
        let mut store = Store::new(Session::default(), reducer);
        let busy_before = store.state().busy.clone();
        let titles_before = store.state().titles.clone();

        assert!(!store.dispatch(Act::Unknown));
        assert!(store.state().busy.same(&busy_before));
        assert!(store.state().titles.same(&titles_before));
    }

    #[test]
    fn test_only_touched_slice_is_replaced() {
        let mut store = Store::new(Session::default(), reducer);
        let busy_before = store.state().busy.clone();

        store.dispatch(Act::AddTitle("Agenda".into()));
        assert!(store.state().busy.same(&busy_before));
    }

    #[derive(Default)]
    struct Tally {
        seen: Vec<&'static str>,
        changed: usize,
    }

    impl Middleware<Act> for Tally {
        fn before(&mut self, action: &Act) {
            self.seen.push(action.name());
        }

        fn after(&mut self, _action: &Act, state_changed: bool) {
            if state_changed {
                self.changed += 1;
            }
        }
    }

    #[test]
    fn test_middleware_sees_every_action() {
        let mut store = StoreWithMiddleware::new(Session::default(), reducer, Tally::default());

        store.dispatch(Act::Start);
        store.dispatch(Act::Unknown);

        assert_eq!(store.middleware().seen, vec!["Start", "Unknown"]);
        assert_eq!(store.middleware().changed, 1);
        assert!(*store.state().busy);
    }

    #[test]
    fn test_unit_middleware() {
        let mut store = StoreWithMiddleware::new(Session::default(), reducer, ());
        assert!(store.dispatch(Act::Start));
    }
}
