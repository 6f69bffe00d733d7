use dms_store::Slice;

use crate::action::Action;
use crate::model::Document;
use crate::reducer::{prepend, replace_by_id};
use crate::state::UserState;

/// Reducer for the `user` slice (signed-in user and their documents)
///
/// Document add/update/delete are shared with the `documents` slice; here
/// they only replace the snapshot when they touch the user's own list.
pub fn user(state: Slice<UserState>, action: &Action) -> Slice<UserState> {
    match action {
        Action::CurrentUserSet(profile) => Slice::new(UserState {
            profile: Some(profile.clone()),
            ..state.to_inner()
        }),
        Action::CurrentUserLogout => Slice::new(UserState::default()),
        Action::UserDocumentsLoad(docs) => Slice::new(UserState {
            documents: docs.clone(),
            ..state.to_inner()
        }),
        Action::DocumentsAdd(doc) if owns(&state, doc) => Slice::new(UserState {
            documents: prepend(doc, &state.documents),
            ..state.to_inner()
        }),
        Action::DocumentsUpdate(doc) if state.documents.iter().any(|d| d.id == doc.id) => {
            Slice::new(UserState {
                documents: replace_by_id(&state.documents, doc, |d| d.id),
                ..state.to_inner()
            })
        }
        Action::DocumentsDelete { id } if state.documents.iter().any(|d| id.matches(d.id)) => {
            Slice::new(UserState {
                documents: state
                    .documents
                    .iter()
                    .filter(|d| !id.matches(d.id))
                    .cloned()
                    .collect(),
                ..state.to_inner()
            })
        }
        _ => state,
    }
}

fn owns(state: &UserState, doc: &Document) -> bool {
    state
        .profile
        .as_ref()
        .is_some_and(|profile| profile.id == doc.user_id)
}
