//! Async action creators
//!
//! Each flow is an `async fn` that takes a [`Context`] by value, performs its
//! request and dispatches plain actions through the context's dispatcher. A
//! flow never fails: every error branch ends in exactly one notice, and the
//! flow returns `()`. Flows that drive the busy indicator hold a bracket
//! guard, so "ajax end" goes out on every exit path, including cancellation.

mod auth;
mod documents;
mod roles;
mod search;
mod users;

pub use auth::{
    authenticate_user, deauthenticate_user, login, login_by_token, logout, signup, ACCOUNT_CREATED,
    SIGNED_OUT,
};
pub use documents::{
    create_document, delete_document, get_document, get_documents, get_user_documents,
    update_document, MIN_CONTENT_LENGTH,
};
pub use roles::{create_role, delete_role, get_roles};
pub use search::{search_documents, search_users};
pub use users::{delete_user, get_users, update_profile};

use std::sync::Arc;

use dms_store::{BracketGuard, Dispatcher};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::action::Action;
use crate::api::{Api, ApiRequest, ApiResponse};
use crate::config::PageLimits;
use crate::error::ApiError;
use crate::navigate::{Navigator, Route};
use crate::notify::{Notice, Notifier, Report};
use crate::token::TokenStore;

/// The collaborators flows talk to
#[derive(Clone)]
pub struct Services {
    pub api: Arc<dyn Api>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub tokens: Arc<dyn TokenStore>,
}

/// Everything a flow needs: where to dispatch, whom to call, page sizes
#[derive(Clone)]
pub struct Context {
    pub dispatch: Dispatcher<Action>,
    pub services: Services,
    pub limits: PageLimits,
}

impl Context {
    pub fn new(dispatch: Dispatcher<Action>, services: Services, limits: PageLimits) -> Self {
        Self {
            dispatch,
            services,
            limits,
        }
    }

    pub fn dispatch(&self, action: Action) {
        self.dispatch.dispatch(action);
    }

    /// Dispatch "ajax start" now and "ajax end" when the guard drops
    pub(crate) fn busy(&self) -> BracketGuard<Action> {
        self.dispatch.bracket(Action::AjaxCallStart, Action::AjaxCallEnd)
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.services.notifier.notify(notice);
    }

    pub(crate) fn navigate(&self, route: Route) {
        self.services.navigator.push(route);
    }

    pub(crate) async fn get(&self, path: impl Into<String>) -> Result<ApiResponse, ApiError> {
        self.services.api.send(ApiRequest::get(path)).await
    }

    pub(crate) async fn delete(&self, path: impl Into<String>) -> Result<ApiResponse, ApiError> {
        self.services.api.send(ApiRequest::delete(path)).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::post(path, body)?;
        self.services.api.send(request).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::put(path, body)?;
        self.services.api.send(request).await
    }

    /// Turn an API outcome into the decoded `200` payload.
    ///
    /// Any other outcome is reported once and yields `None`.
    pub(crate) fn settle<T: DeserializeOwned>(
        &self,
        outcome: Result<ApiResponse, ApiError>,
    ) -> Option<T> {
        match outcome {
            Ok(response) if response.is_success() => match response.decode() {
                Ok(payload) => Some(payload),
                Err(e) => {
                    self.report_failure(e);
                    None
                }
            },
            Ok(response) => {
                self.report_rejected(&response);
                None
            }
            Err(e) => {
                self.report_failure(e);
                None
            }
        }
    }

    /// A resolved response that is not a `200`: surface the server's `msg`
    pub(crate) fn report_rejected(&self, response: &ApiResponse) {
        tracing::debug!(status = response.status, "Request rejected by server");
        self.notify(Notice::Error(Report::Message(response.message())));
    }

    /// A failed request: the attached response if there is one, else the error
    pub(crate) fn report_failure(&self, error: ApiError) {
        tracing::warn!(error = %error, "Request failed");
        let report = match error {
            ApiError::Status(response) => Report::Response(response),
            other => Report::Error(other.to_string()),
        };
        self.notify(Notice::Error(report));
    }
}

/// Page envelope used by the listing endpoints
#[derive(serde::Deserialize)]
pub(crate) struct Page<T> {
    pub data: Vec<T>,
    pub pagination: crate::model::Pagination,
}
