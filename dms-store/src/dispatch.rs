//! Dispatch handle for async flows
//!
//! Async flows run on their own tasks and never borrow the store. They hold a
//! [`Dispatcher`] instead, which forwards actions over an unbounded channel
//! to whoever owns the store (normally a [`Runtime`](crate::Runtime)).
//! Actions sent from one flow arrive in the order they were sent.

use tokio::sync::mpsc;

use crate::Action;

/// Cloneable sender side of the action channel
pub struct Dispatcher<A> {
    tx: mpsc::UnboundedSender<A>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<A> std::fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<A: Action> Dispatcher<A> {
    /// Wrap an existing channel sender
    pub fn new(tx: mpsc::UnboundedSender<A>) -> Self {
        Self { tx }
    }

    /// Create a dispatcher together with the receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<A>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Send an action to the store
    ///
    /// If the store is gone (session torn down) the action is dropped.
    pub fn dispatch(&self, action: A) {
        let name = action.name();
        if self.tx.send(action).is_err() {
            tracing::debug!(action = %name, "Store closed, action dropped");
        }
    }

    /// Dispatch `start` now and `end` when the returned guard is dropped
    ///
    /// The guard fires on every exit path of the owning scope: normal return,
    /// early return, unwinding, and task cancellation.
    #[must_use = "the end action is dispatched when the guard is dropped"]
    pub fn bracket(&self, start: A, end: A) -> BracketGuard<A> {
        self.dispatch(start);
        BracketGuard {
            dispatcher: self.clone(),
            end: Some(end),
        }
    }

    /// Whether the receiving side has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Guard returned by [`Dispatcher::bracket`]
#[derive(Debug)]
pub struct BracketGuard<A: Action> {
    dispatcher: Dispatcher<A>,
    end: Option<A>,
}

impl<A: Action> BracketGuard<A> {
    /// Dispatch the end action now instead of at drop
    pub fn finish(mut self) {
        if let Some(end) = self.end.take() {
            self.dispatcher.dispatch(end);
        }
    }
}

impl<A: Action> Drop for BracketGuard<A> {
    fn drop(&mut self) {
        if let Some(end) = self.end.take() {
            self.dispatcher.dispatch(end);
        }
    }
}
