//! The view-facing entry point: one store, one runtime, keyed flows
//!
//! A view holds a [`Session`], reads [`Session::state`], dispatches plain
//! actions directly and starts async flows through the named methods. Each
//! flow runs under a task key, so starting a flow again aborts the previous
//! run with the same key (its busy bracket still closes).

use std::time::Duration;

use dms_store::{
    ActionLog, ActionLogConfig, ActionLoggerMiddleware, Runtime, StoreWithMiddleware, TaskKey,
};

use crate::action::Action;
use crate::config::ClientConfig;
use crate::flows::{self, Context, Services};
use crate::model::{
    Credentials, DocumentChanges, DocumentDraft, IdRef, ProfileChanges, SignupDetails,
};
use crate::reducer::reducer;
use crate::state::AppState;

/// Task keys flows run under
pub mod keys {
    pub const AUTH: &str = "auth";
    pub const USERS: &str = "users";
    pub const ROLES: &str = "roles";
    pub const DOCUMENTS: &str = "documents";
    pub const DOCUMENT: &str = "document";
    pub const USER_DOCUMENTS: &str = "user-documents";
    pub const PROFILE: &str = "profile";
    pub const SEARCH: &str = "search";
}

pub type SessionStore = StoreWithMiddleware<AppState, Action, ActionLoggerMiddleware>;

pub struct Session {
    runtime: Runtime<AppState, Action, SessionStore>,
    ctx: Context,
    search_debounce: Duration,
}

impl Session {
    /// A session with the default action logger (history enabled)
    pub fn new(services: Services, config: &ClientConfig) -> Self {
        Self::with_logger(
            services,
            config,
            ActionLoggerMiddleware::with_log(ActionLogConfig::default()),
        )
    }

    pub fn with_logger(
        services: Services,
        config: &ClientConfig,
        logger: ActionLoggerMiddleware,
    ) -> Self {
        let store = StoreWithMiddleware::new(AppState::default(), reducer, logger);
        let runtime = Runtime::from_store(store);
        let ctx = Context::new(runtime.dispatcher(), services, config.limits);
        Self {
            runtime,
            ctx,
            search_debounce: config.search_debounce,
        }
    }

    pub fn state(&self) -> &AppState {
        self.runtime.state()
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Actions applied so far, if the logger keeps a history
    pub fn action_log(&self) -> Option<&ActionLog> {
        self.runtime.store().middleware().log()
    }

    /// Called after every action that replaced part of the state
    pub fn subscribe(&mut self, subscriber: impl FnMut(&AppState) + 'static) {
        self.runtime.subscribe(subscriber);
    }

    /// Apply a plain action now
    pub fn dispatch(&mut self, action: Action) -> bool {
        self.runtime.dispatch(action)
    }

    /// Whether no flow is running
    pub fn is_idle(&mut self) -> bool {
        self.runtime.tasks().is_idle()
    }

    /// Abort the flow running under `key`
    pub fn cancel(&mut self, key: impl Into<TaskKey>) {
        self.runtime.cancel(&key.into());
    }

    /// Apply actions until every running flow has finished
    pub async fn settle(&mut self) {
        self.runtime.run_until_idle().await;
    }

    /// Abort every flow; whatever they already sent is applied, and the
    /// next [`settle`](Self::settle) applies what they send while unwinding
    pub fn shutdown(&mut self) {
        self.runtime.shutdown();
    }

    fn spawn<F>(&mut self, key: impl Into<TaskKey>, flow: impl FnOnce(Context) -> F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let future = flow(self.ctx.clone());
        self.runtime.spawn(key, future);
    }

    // ===== Authentication =====

    pub fn login(&mut self, credentials: Credentials) {
        self.spawn(keys::AUTH, |ctx| flows::login(ctx, credentials));
    }

    pub fn login_by_token(&mut self) {
        self.spawn(keys::AUTH, flows::login_by_token);
    }

    pub fn logout(&mut self) {
        self.spawn(keys::AUTH, flows::logout);
    }

    pub fn signup(&mut self, details: SignupDetails) {
        self.spawn(keys::AUTH, |ctx| flows::signup(ctx, details));
    }

    // ===== Users =====

    pub fn get_users(&mut self, offset: u32) {
        self.spawn(keys::USERS, |ctx| flows::get_users(ctx, offset));
    }

    pub fn delete_user(&mut self, id: impl Into<IdRef>) {
        let id = id.into();
        self.spawn(format!("user:{}", id), |ctx| flows::delete_user(ctx, id));
    }

    pub fn update_profile(&mut self, id: i64, changes: ProfileChanges) {
        self.spawn(keys::PROFILE, |ctx| flows::update_profile(ctx, id, changes));
    }

    // ===== Roles =====

    pub fn get_roles(&mut self) {
        self.spawn(keys::ROLES, flows::get_roles);
    }

    pub fn create_role(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.spawn(format!("role:new:{}", title), |ctx| flows::create_role(ctx, title));
    }

    pub fn delete_role(&mut self, id: impl Into<IdRef>) {
        let id = id.into();
        self.spawn(format!("role:{}", id), |ctx| flows::delete_role(ctx, id));
    }

    // ===== Documents =====

    pub fn get_documents(&mut self, offset: u32) {
        self.spawn(keys::DOCUMENTS, |ctx| flows::get_documents(ctx, offset));
    }

    pub fn get_document(&mut self, id: impl Into<IdRef>) {
        let id = id.into();
        self.spawn(keys::DOCUMENT, |ctx| flows::get_document(ctx, id));
    }

    pub fn get_user_documents(&mut self, user_id: i64) {
        self.spawn(keys::USER_DOCUMENTS, |ctx| {
            flows::get_user_documents(ctx, user_id)
        });
    }

    pub fn create_document(&mut self, draft: DocumentDraft) {
        self.spawn("document:new", |ctx| flows::create_document(ctx, draft));
    }

    pub fn update_document(&mut self, id: impl Into<IdRef>, changes: DocumentChanges) {
        let id = id.into();
        self.spawn(format!("document:{}", id), |ctx| {
            flows::update_document(ctx, id, changes)
        });
    }

    pub fn delete_document(&mut self, id: impl Into<IdRef>) {
        let id = id.into();
        self.spawn(format!("document:{}", id), |ctx| {
            flows::delete_document(ctx, id)
        });
    }

    // ===== Search =====

    /// Debounced: only the last query typed within the quiet period is sent
    pub fn search_users(&mut self, query: impl Into<String>) {
        let future = flows::search_users(self.ctx.clone(), query.into());
        self.runtime.debounce(keys::SEARCH, self.search_debounce, future);
    }

    /// Debounced, sharing the key with user search
    pub fn search_documents(&mut self, query: impl Into<String>) {
        let future = flows::search_documents(self.ctx.clone(), query.into());
        self.runtime.debounce(keys::SEARCH, self.search_debounce, future);
    }
}
