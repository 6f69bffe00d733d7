use crate::action::Action;
use crate::flows::{Context, Page};
use crate::model::{IdRef, ProfileChanges, User};
use crate::notify::Notice;

/// `GET /users/?limit=&offset=`
pub async fn get_users(ctx: Context, offset: u32) {
    let path = format!("/users/?limit={}&offset={}", ctx.limits.users, offset);
    let outcome = ctx.get(path).await;
    if let Some(page) = ctx.settle::<Page<User>>(outcome) {
        ctx.dispatch(Action::UsersLoad(page.data));
        ctx.dispatch(Action::PaginationSet(page.pagination));
    }
}

/// `DELETE /users/{id}`
pub async fn delete_user(ctx: Context, id: IdRef) {
    let outcome = ctx.delete(format!("/users/{}", id)).await;
    if ctx.settle::<serde::de::IgnoredAny>(outcome).is_some() {
        ctx.dispatch(Action::UsersDelete { id });
        ctx.notify(Notice::Success("User deleted".into()));
    }
}

/// `PUT /users/{id}`; the server answers with the updated user
pub async fn update_profile(ctx: Context, id: i64, changes: ProfileChanges) {
    let outcome = ctx.put(format!("/users/{}", id), &changes).await;
    if let Some(user) = ctx.settle::<User>(outcome) {
        ctx.dispatch(Action::CurrentUserSet(user));
        ctx.notify(Notice::Success("Profile updated".into()));
    }
}
