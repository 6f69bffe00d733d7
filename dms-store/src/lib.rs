//! Core state management for the document management client
//!
//! This crate provides the Redux-style plumbing the client is built on:
//! a closed set of actions, reducers over independently owned state slices,
//! a single dispatch entry point, and a runtime that runs async flows as
//! cancellable tasks feeding actions back into the store.
//!
//! # Core Concepts
//!
//! - **Action**: Closed enum describing a state change
//! - **Slice**: Shared immutable snapshot of one section of the state
//! - **Store**: Centralized state container with reducer pattern
//! - **Dispatcher**: Cloneable handle async flows use to send actions
//! - **Runtime**: Store + action channel + task manager
//!
//! # Basic Example
//!
//! ```ignore
//! use dms_store::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(infer_categories)]
//! enum AppAction {
//!     TitlesLoad(Vec<String>),
//!     TitlesClear,
//! }
//!
//! #[derive(Default)]
//! struct AppState {
//!     titles: Slice<Vec<String>>,
//! }
//!
//! fn titles(state: Slice<Vec<String>>, action: &AppAction) -> Slice<Vec<String>> {
//!     match action {
//!         AppAction::TitlesLoad(titles) => Slice::new(titles.clone()),
//!         AppAction::TitlesClear => Slice::new(Vec::new()),
//!     }
//! }
//!
//! fn reducer(state: &mut AppState, action: AppAction) -> bool {
//!     reduce_slice(&mut state.titles, &action, titles)
//! }
//!
//! let mut store = Store::new(AppState::default(), reducer);
//! store.dispatch(AppAction::TitlesLoad(vec!["Draft".into()]));
//! ```
//!
//! # Async Flow Pattern
//!
//! Async work never touches the store directly. A flow receives a
//! [`Dispatcher`], performs its requests, and dispatches plain actions as
//! results arrive. The [`Runtime`] applies them in arrival order:
//!
//! ```ignore
//! let mut runtime = Runtime::new(AppState::default(), reducer);
//! let dispatch = runtime.dispatcher();
//!
//! runtime.spawn("titles", async move {
//!     let _busy = dispatch.bracket(AppAction::BusyStart, AppAction::BusyEnd);
//!     match fetch_titles().await {
//!         Ok(titles) => dispatch.dispatch(AppAction::TitlesLoad(titles)),
//!         Err(e) => tracing::warn!(error = %e, "fetch failed"),
//!     }
//! });
//!
//! runtime.run_until_idle().await;
//! ```

pub mod action;
pub mod dispatch;
pub mod logger;
pub mod runtime;
pub mod slice;
pub mod store;
pub mod tasks;
pub mod testing;

// Core trait exports
pub use action::{Action, ActionCategory, ActionSummary};

// Derive macro (lives in the macro namespace next to the trait)
pub use dms_store_macros::Action;

// Slice exports
pub use slice::{reduce_slice, Slice, SliceReducer};

// Store exports
pub use store::{DispatchStore, Middleware, Reducer, Store, StoreWithMiddleware};

// Dispatch and runtime exports
pub use dispatch::{BracketGuard, Dispatcher};
pub use runtime::Runtime;
pub use tasks::{TaskKey, TaskManager};

// Logging exports
pub use logger::{ActionFilter, ActionLog, ActionLogConfig, ActionLoggerMiddleware};

// Testing exports
pub use testing::TestHarness;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionCategory, ActionSummary};
    pub use crate::dispatch::{BracketGuard, Dispatcher};
    pub use crate::runtime::Runtime;
    pub use crate::slice::{reduce_slice, Slice, SliceReducer};
    pub use crate::store::{DispatchStore, Middleware, Reducer, Store, StoreWithMiddleware};
    pub use crate::tasks::{TaskKey, TaskManager};
    pub use dms_store_macros::Action;
}
