//! Reducers: one pure function per slice, combined into the store reducer
//!
//! Every slice reducer sees every action. A reducer that does not handle the
//! action hands its input back untouched; one that does builds a new
//! snapshot, even when the new value equals the old one. The store reducer
//! reports a change when any slot was replaced.

mod all;
mod documents;
mod role;
mod status;
mod user;

pub use all::all;
pub use documents::documents;
pub use role::role;
pub use status::{ajax_status, auth, error_message};
pub use user::user;

use dms_store::reduce_slice;

use crate::action::Action;
use crate::state::AppState;

/// Store reducer: runs every slice reducer over `action`
pub fn reducer(state: &mut AppState, action: Action) -> bool {
    let mut changed = false;
    changed |= reduce_slice(&mut state.all, &action, all);
    changed |= reduce_slice(&mut state.documents, &action, documents);
    changed |= reduce_slice(&mut state.user, &action, user);
    changed |= reduce_slice(&mut state.role, &action, role);
    changed |= reduce_slice(&mut state.ajax_status, &action, ajax_status);
    changed |= reduce_slice(&mut state.auth, &action, auth);
    changed |= reduce_slice(&mut state.error_message, &action, error_message);
    changed
}

/// Copy of `list` with `item` replacing the entry that has the same id
pub(crate) fn replace_by_id<T: Clone>(list: &[T], item: &T, id: impl Fn(&T) -> i64) -> Vec<T> {
    let target = id(item);
    list.iter()
        .map(|existing| {
            if id(existing) == target {
                item.clone()
            } else {
                existing.clone()
            }
        })
        .collect()
}

/// `item` followed by `list`
pub(crate) fn prepend<T: Clone>(item: &T, list: &[T]) -> Vec<T> {
    let mut next = Vec::with_capacity(list.len() + 1);
    next.push(item.clone());
    next.extend(list.iter().cloned());
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, User};
    use dms_store::Slice;

    fn user(id: i64) -> User {
        User {
            id,
            name: format!("user{}", id),
            email: format!("user{}@example.com", id),
            role_id: 2,
            token: None,
        }
    }

    #[test]
    fn test_unhandled_slices_keep_their_snapshot() {
        let mut state = AppState::default();
        let before = state.clone();

        assert!(reducer(&mut state, Action::UsersLoad(vec![user(1)])));

        assert!(!state.all.same(&before.all));
        assert!(state.documents.same(&before.documents));
        assert!(state.user.same(&before.user));
        assert!(state.role.same(&before.role));
        assert!(state.ajax_status.same(&before.ajax_status));
        assert!(state.auth.same(&before.auth));
        assert!(state.error_message.same(&before.error_message));
    }

    #[test]
    fn test_roles_reach_both_role_lists() {
        let mut state = AppState::default();
        let roles = vec![Role {
            id: 1,
            title: "admin".into(),
        }];

        reducer(&mut state, Action::RolesLoad(roles.clone()));

        assert_eq!(state.all.roles, roles);
        assert_eq!(*state.role, roles);
    }

    #[test]
    fn test_logout_then_deauthenticate() {
        let mut state = AppState {
            user: Slice::new(crate::state::UserState {
                profile: Some(user(1)),
                documents: Vec::new(),
            }),
            auth: Slice::new(true),
            ..AppState::default()
        };

        reducer(&mut state, Action::CurrentUserLogout);
        reducer(&mut state, Action::AuthDeauthenticate);

        assert!(state.current_user().is_none());
        assert!(!state.is_authenticated());
    }
}
