//! Action traits for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions describe state changes. They should be:
/// - Clone: Actions may be logged, replayed, or sent to every slice reducer
/// - Debug: For debugging and logging
/// - Send + 'static: Async flows send them across tasks
///
/// Use `#[derive(Action)]` from `dms-store-macros` to auto-implement this trait.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Category grouping for actions
///
/// Generated by `#[action(infer_categories)]`. Categories come from the
/// variant name prefix (`RolesAdd` and `RolesLoad` share `"roles"`) or from
/// an explicit `#[action(category = "...")]`.
pub trait ActionCategory: Action {
    /// Generated enum listing every category of the action type
    type Category: Copy + Eq + Debug;

    /// Category name, `None` for uncategorized actions
    fn category(&self) -> Option<&'static str>;

    /// Category as an enum value
    fn category_enum(&self) -> Self::Category;
}

/// Short human-readable rendering of an action for logs
///
/// The default falls back to `Debug`. Override it for actions that carry
/// large payloads (document bodies, user lists).
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}
