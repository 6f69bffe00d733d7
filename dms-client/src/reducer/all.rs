use dms_store::Slice;

use crate::action::Action;
use crate::model::SearchResults;
use crate::reducer::prepend;
use crate::state::AllState;

/// Reducer for the `all` slice (user administration listings)
pub fn all(state: Slice<AllState>, action: &Action) -> Slice<AllState> {
    match action {
        Action::UsersLoad(users) => Slice::new(AllState {
            users: users.clone(),
            ..state.to_inner()
        }),
        Action::RolesLoad(roles) => Slice::new(AllState {
            roles: roles.clone(),
            ..state.to_inner()
        }),
        Action::UsersDelete { id } => Slice::new(AllState {
            users: state
                .users
                .iter()
                .filter(|user| !id.matches(user.id))
                .cloned()
                .collect(),
            ..state.to_inner()
        }),
        Action::SearchDocumentsLoad(documents) => Slice::new(AllState {
            search: SearchResults::Documents(documents.clone()),
            ..state.to_inner()
        }),
        Action::SearchUsersLoad(users) => Slice::new(AllState {
            search: SearchResults::Users(users.clone()),
            ..state.to_inner()
        }),
        Action::PaginationSet(pagination) => Slice::new(AllState {
            pagination: pagination.clone(),
            ..state.to_inner()
        }),
        Action::RolesAdd(role) => Slice::new(AllState {
            roles: prepend(role, &state.roles),
            ..state.to_inner()
        }),
        Action::RolesDelete { id } => Slice::new(AllState {
            roles: state
                .roles
                .iter()
                .filter(|role| !id.matches(role.id))
                .cloned()
                .collect(),
            ..state.to_inner()
        }),
        _ => state,
    }
}
