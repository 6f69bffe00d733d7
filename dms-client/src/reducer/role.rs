use dms_store::Slice;

use crate::action::Action;
use crate::model::Role;
use crate::reducer::prepend;

/// Reducer for the `role` slice
pub fn role(state: Slice<Vec<Role>>, action: &Action) -> Slice<Vec<Role>> {
    match action {
        Action::RolesLoad(roles) => Slice::new(roles.clone()),
        Action::RolesAdd(role) => Slice::new(prepend(role, &state)),
        Action::RolesDelete { id } => Slice::new(
            state
                .iter()
                .filter(|role| !id.matches(role.id))
                .cloned()
                .collect(),
        ),
        _ => state,
    }
}
