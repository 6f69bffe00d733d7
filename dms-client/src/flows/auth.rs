use serde::de::IgnoredAny;

use crate::action::Action;
use crate::error::ApiError;
use crate::flows::Context;
use crate::model::{Credentials, SignupDetails, User};
use crate::navigate::Route;
use crate::notify::{Notice, Report};

pub const SIGNED_OUT: &str = "You have successfully signed out";
pub const ACCOUNT_CREATED: &str = "Your Account has been successfully created";

/// Persist `token` and mark the session authenticated
pub fn authenticate_user(ctx: &Context, token: &str) {
    if let Err(e) = ctx.services.tokens.save(token) {
        tracing::warn!(error = %e, "Could not persist token");
    }
    ctx.dispatch(Action::AuthAuthenticate {
        token: token.to_string(),
    });
}

/// Forget the stored token and mark the session unauthenticated
pub fn deauthenticate_user(ctx: &Context) {
    if let Err(e) = ctx.services.tokens.clear() {
        tracing::warn!(error = %e, "Could not clear stored token");
    }
    ctx.dispatch(Action::AuthDeauthenticate);
}

fn sign_in(ctx: &Context, user: User, token: String) {
    tracing::info!(user_id = user.id, "Signed in");
    ctx.dispatch(Action::CurrentUserSet(user));
    authenticate_user(ctx, &token);
    ctx.navigate(Route::Dashboard);
}

/// `POST /users/login`
pub async fn login(ctx: Context, credentials: Credentials) {
    let _busy = ctx.busy();

    let outcome = ctx.post("/users/login", &credentials).await;
    let Some(user) = ctx.settle::<User>(outcome) else {
        return;
    };
    match user.token.clone() {
        Some(token) => sign_in(&ctx, user, token),
        None => ctx.notify(Notice::Error(Report::Error(
            "login response carried no token".into(),
        ))),
    }
}

/// `GET /users/login/token`: resume the session from the stored token.
///
/// A rejected token (any non-200 answer) signs the user out without a
/// notice. Only an unreachable server is reported.
pub async fn login_by_token(ctx: Context) {
    match ctx.get("/users/login/token").await {
        Ok(response) if response.is_success() => match response.decode::<User>() {
            Ok(user) => {
                let token = user.token.clone().or_else(|| stored_token(&ctx));
                match token {
                    Some(token) => sign_in(&ctx, user, token),
                    None => deauthenticate_user(&ctx),
                }
            }
            Err(e) => {
                deauthenticate_user(&ctx);
                ctx.notify(Notice::Error(Report::Error(e.to_string())));
            }
        },
        Ok(response) | Err(ApiError::Status(response)) => {
            tracing::debug!(status = response.status, "Stored token rejected");
            deauthenticate_user(&ctx);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Token login failed");
            deauthenticate_user(&ctx);
            ctx.notify(Notice::Error(Report::Error(e.to_string())));
        }
    }
}

fn stored_token(ctx: &Context) -> Option<String> {
    ctx.services.tokens.load().ok().flatten()
}

/// `GET /users/logout`: any resolved response ends the session
pub async fn logout(ctx: Context) {
    match ctx.get("/users/logout").await {
        Ok(_) => {
            ctx.dispatch(Action::CurrentUserLogout);
            deauthenticate_user(&ctx);
            ctx.navigate(Route::Home);
            ctx.notify(Notice::Info(SIGNED_OUT.into()));
        }
        Err(e) => {
            tracing::warn!(error = %e, "Logout failed");
            ctx.notify(Notice::Error(Report::Error(e.to_string())));
        }
    }
}

/// `POST /users`, then sign in with the same credentials
pub async fn signup(ctx: Context, details: SignupDetails) {
    let _busy = ctx.busy();

    let outcome = ctx.post("/users", &details).await;
    if ctx.settle::<IgnoredAny>(outcome).is_some() {
        login(ctx.clone(), details.credentials()).await;
        ctx.notify(Notice::Success(ACCOUNT_CREATED.into()));
    }
}
