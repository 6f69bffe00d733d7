//! Document management client
//!
//! Client-side state for a document management system: users, roles and
//! documents fetched over REST, with token authentication and per-document
//! access levels (private, public, or restricted to one role).
//!
//! The pieces, leaf first:
//!
//! - [`model`]: entities as the server sends them
//! - [`action`]: the closed set of state changes
//! - [`reducer`]: one pure reducer per slice of [`state::AppState`]
//! - [`api`]: the REST seam ([`api::Api`]) and its reqwest implementation
//! - [`flows`]: async action creators that call the API and dispatch results
//! - [`session`]: store, runtime and flows wired together for a view
//!
//! ```ignore
//! let tokens = Arc::new(FileTokenStore::new(ClientConfig::default_token_file()?));
//! let services = Services {
//!     api: Arc::new(HttpApi::new(&config.base_url, tokens.clone())),
//!     notifier: Arc::new(TracingNotifier),
//!     navigator: Arc::new(RecordingNavigator::new()),
//!     tokens,
//! };
//! let mut session = Session::new(services, &config);
//! session.login(credentials);
//! session.settle().await;
//! assert!(session.state().is_authenticated());
//! ```

pub mod action;
pub mod api;
pub mod config;
pub mod error;
pub mod flows;
pub mod model;
pub mod navigate;
pub mod notify;
pub mod reducer;
pub mod session;
pub mod state;
pub mod testing;
pub mod token;

pub use action::Action;
pub use api::{Api, ApiRequest, ApiResponse, HttpApi, Method};
pub use config::{ClientConfig, PageLimits};
pub use error::{ApiError, ConfigError, TokenStoreError};
pub use flows::{Context, Services};
pub use model::{
    Access, Credentials, Document, DocumentChanges, DocumentDraft, IdRef, Pagination,
    ProfileChanges, Role, SearchResults, SignupDetails, User,
};
pub use navigate::{Navigator, RecordingNavigator, Route};
pub use notify::{Notice, Notifier, RecordingNotifier, Report, TracingNotifier};
pub use reducer::reducer;
pub use session::Session;
pub use state::AppState;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
