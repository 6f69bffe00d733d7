//! Fakes for exercising flows without a server
//!
//! ```ignore
//! let fakes = Fakes::new(
//!     MockApi::new().on(Method::Get, "/roles", Ok(ApiResponse::ok(json!([])))),
//! );
//! let mut harness = TestHarness::<AppState, Action>::default();
//! let ctx = fakes.context(harness.dispatcher());
//!
//! flows::get_roles(ctx).await;
//! assert_emitted!(harness.drain_emitted(), Action::RolesLoad(_));
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dms_store::Dispatcher;
use serde_json::json;

use crate::action::Action;
use crate::api::{Api, ApiRequest, ApiResponse, Method};
use crate::config::PageLimits;
use crate::error::ApiError;
use crate::flows::{Context, Services};
use crate::navigate::RecordingNavigator;
use crate::notify::RecordingNotifier;
use crate::token::MemoryTokenStore;

pub type Reply = Result<ApiResponse, ApiError>;

/// Scripted [`Api`]: replies are queued per method and path.
///
/// The last queued reply for a route repeats. Unscripted routes answer 404.
#[derive(Debug, Default)]
pub struct MockApi {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: Method, path: impl Into<String>, reply: Reply) -> Self {
        lock(&self.routes)
            .entry((method, path.into()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Wait this long before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    fn reply(&self, request: &ApiRequest) -> Reply {
        let mut routes = lock(&self.routes);
        let key = (request.method, request.path.clone());
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("empty reply queue".into()))),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(ApiError::Transport("empty reply queue".into()))),
            None => Err(ApiError::Status(ApiResponse::new(
                404,
                json!({ "msg": format!("no route for {} {}", request.method, request.path) }),
            ))),
        }
    }
}

#[async_trait]
impl Api for MockApi {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        lock(&self.requests).push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply(&request)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// One set of fakes, kept concrete so tests can inspect them
#[derive(Clone)]
pub struct Fakes {
    pub api: Arc<MockApi>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub tokens: Arc<MemoryTokenStore>,
}

impl Fakes {
    pub fn new(api: MockApi) -> Self {
        Self {
            api: Arc::new(api),
            notifier: Arc::new(RecordingNotifier::new()),
            navigator: Arc::new(RecordingNavigator::new()),
            tokens: Arc::new(MemoryTokenStore::new()),
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.tokens = Arc::new(MemoryTokenStore::with_token(token));
        self
    }

    pub fn services(&self) -> Services {
        Services {
            api: self.api.clone(),
            notifier: self.notifier.clone(),
            navigator: self.navigator.clone(),
            tokens: self.tokens.clone(),
        }
    }

    /// A flow context dispatching into `dispatch`, with default page sizes
    pub fn context(&self, dispatch: Dispatcher<Action>) -> Context {
        Context::new(dispatch, self.services(), PageLimits::default())
    }
}
