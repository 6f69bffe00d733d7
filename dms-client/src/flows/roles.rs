use serde::Serialize;

use crate::action::Action;
use crate::flows::Context;
use crate::model::{IdRef, Role};

#[derive(Serialize)]
struct NewRole<'a> {
    title: &'a str,
}

/// `GET /roles`
pub async fn get_roles(ctx: Context) {
    let outcome = ctx.get("/roles").await;
    if let Some(roles) = ctx.settle::<Vec<Role>>(outcome) {
        ctx.dispatch(Action::RolesLoad(roles));
    }
}

/// `POST /roles`
pub async fn create_role(ctx: Context, title: String) {
    let outcome = ctx.post("/roles", &NewRole { title: &title }).await;
    if let Some(role) = ctx.settle::<Role>(outcome) {
        ctx.dispatch(Action::RolesAdd(role));
    }
}

/// `DELETE /roles/{id}`
pub async fn delete_role(ctx: Context, id: IdRef) {
    let outcome = ctx.delete(format!("/roles/{}", id)).await;
    if ctx.settle::<serde::de::IgnoredAny>(outcome).is_some() {
        ctx.dispatch(Action::RolesDelete { id });
    }
}
