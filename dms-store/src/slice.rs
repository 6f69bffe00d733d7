//! Independently owned sections of the store state
//!
//! A [`Slice`] is a shared, immutable snapshot. Reducers never edit a
//! published snapshot: an action the reducer ignores hands back the very same
//! snapshot, and an action it handles produces a new one built from the old
//! value plus the overridden fields. Change detection is pointer identity via
//! [`Slice::same`], so it costs the same for an empty list as for ten
//! thousand documents.
//!
//! # Example
//!
//! ```
//! use dms_store::{reduce_slice, Slice};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Titles {
//!     items: Vec<String>,
//!     total: usize,
//! }
//!
//! enum Msg {
//!     Prepend(String),
//!     Ping,
//! }
//!
//! fn titles(state: Slice<Titles>, msg: &Msg) -> Slice<Titles> {
//!     match msg {
//!         Msg::Prepend(title) => {
//!             let mut items = Vec::with_capacity(state.items.len() + 1);
//!             items.push(title.clone());
//!             items.extend(state.items.iter().cloned());
//!             Slice::new(Titles {
//!                 total: items.len(),
//!                 items,
//!             })
//!         }
//!         _ => state,
//!     }
//! }
//!
//! let mut slot = Slice::new(Titles::default());
//! assert!(!reduce_slice(&mut slot, &Msg::Ping, titles));
//! assert!(reduce_slice(&mut slot, &Msg::Prepend("Minutes".into()), titles));
//! assert_eq!(slot.total, 1);
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// A reducer for one slice
///
/// Returns the input untouched when the action is not handled, otherwise a
/// newly allocated snapshot.
pub type SliceReducer<T, A> = fn(Slice<T>, &A) -> Slice<T>;

/// Shared immutable snapshot of one state slice
pub struct Slice<T>(Arc<T>);

impl<T> Slice<T> {
    /// Publish a new snapshot
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Whether both handles point at the same snapshot
    #[inline]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Borrow the snapshot value
    #[inline]
    pub fn get(&self) -> &T {
        &self.0
    }
}

impl<T: Clone> Slice<T> {
    /// Copy the snapshot value out
    pub fn to_inner(&self) -> T {
        T::clone(&self.0)
    }
}

impl<T> Clone for Slice<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Slice<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Default> Default for Slice<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: PartialEq> PartialEq for Slice<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other) || *self.0 == *other.0
    }
}

impl<T: Eq> Eq for Slice<T> {}

impl<T: fmt::Debug> fmt::Debug for Slice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        T::fmt(&self.0, f)
    }
}

impl<T: Serialize> Serialize for Slice<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        T::serialize(&self.0, serializer)
    }
}

impl<T> From<T> for Slice<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// Run `reducer` over one slice slot and store the result
///
/// Returns `true` if the slot now holds a different snapshot.
pub fn reduce_slice<T, A>(slot: &mut Slice<T>, action: &A, reducer: SliceReducer<T, A>) -> bool {
    let next = reducer(slot.clone(), action);
    let changed = !next.same(slot);
    *slot = next;
    changed
}
