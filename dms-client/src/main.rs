//! dms - command-line front end for the document management client
//!
//! Each invocation is one session: the chosen flow runs to completion
//! against the server, notices go to stderr, and the resulting store state
//! is printed to stdout as JSON.
//!
//! # Usage
//!
//! ```sh
//! dms login --email ada@example.com --password secret
//! dms documents --offset 9
//! dms create-document --title Minutes --content "<p>Agenda</p>" --access public
//! RUST_LOG=dms_store=debug dms --history roles
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use dms_client::config::{DEFAULT_BASE_URL, DOCUMENTS_PAGE_SIZE, SEARCH_DEBOUNCE, USERS_PAGE_SIZE};
use dms_client::{
    Access, ClientConfig, Credentials, DocumentChanges, DocumentDraft, FileTokenStore, HttpApi,
    Notice, Notifier, PageLimits, ProfileChanges, RecordingNavigator, Services, Session,
    SignupDetails, TokenStore,
};
use dms_store::{ActionFilter, ActionLogConfig, ActionLoggerMiddleware};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Document management client
#[derive(Parser, Debug)]
#[command(name = "dms")]
#[command(about = "Manage users, roles and documents on a DMS server")]
struct Args {
    /// Server base URL
    #[arg(long, env = "DMS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Where the session token is kept (default: <config dir>/dms/token.json)
    #[arg(long, env = "DMS_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Users per page
    #[arg(long, env = "DMS_USERS_PAGE_SIZE", default_value_t = USERS_PAGE_SIZE)]
    users_page_size: u32,

    /// Documents per page
    #[arg(long, env = "DMS_DOCUMENTS_PAGE_SIZE", default_value_t = DOCUMENTS_PAGE_SIZE)]
    documents_page_size: u32,

    /// Only trace actions matching these glob patterns (comma-separated)
    #[arg(long)]
    log_actions: Option<String>,

    /// Never trace actions matching these glob patterns (comma-separated)
    #[arg(long)]
    log_exclude: Option<String>,

    /// Print the applied actions to stderr when done
    #[arg(long)]
    history: bool,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DMS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "DMS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Resume the session from the stored token
    Whoami,
    /// End the session and forget the token
    Logout,
    /// List users
    Users {
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Delete a user
    DeleteUser { id: String },
    /// Update a user's profile
    UpdateProfile {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// List roles
    Roles,
    /// Create a role
    CreateRole { title: String },
    /// Delete a role
    DeleteRole { id: String },
    /// List documents
    Documents {
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show one document
    Document { id: String },
    /// List the documents a user owns
    UserDocuments { user_id: i64 },
    /// Create a document
    CreateDocument {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// private, public, role:<id> or a raw access value
        #[arg(long, default_value = "private")]
        access: Access,
    },
    /// Change a document
    UpdateDocument {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        access: Option<Access>,
    },
    /// Delete a document
    DeleteDocument { id: String },
    /// Search users
    SearchUsers { query: String },
    /// Search documents
    SearchDocuments { query: String },
}

/// Writes notices to stderr and remembers whether any was an error
#[derive(Default)]
struct ConsoleNotifier {
    failed: AtomicBool,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Error(report) => {
                self.failed.store(true, Ordering::SeqCst);
                tracing::debug!(?report, "Error notice");
                eprintln!("error: {}", report);
            }
            Notice::Success(msg) => eprintln!("{}", msg),
            Notice::Info(msg) => eprintln!("{}", msg),
        }
    }
}

impl Args {
    fn config(&self) -> anyhow::Result<ClientConfig> {
        let token_file = match &self.token_file {
            Some(path) => path.clone(),
            None => ClientConfig::default_token_file()?,
        };
        let config = ClientConfig {
            base_url: self.base_url.clone(),
            limits: PageLimits {
                users: self.users_page_size,
                documents: self.documents_page_size,
            },
            token_file: Some(token_file),
            search_debounce: SEARCH_DEBOUNCE,
        };
        config.validate()?;
        Ok(config)
    }

    fn logger(&self) -> ActionLoggerMiddleware {
        let filter = ActionFilter::parse(self.log_actions.as_deref(), self.log_exclude.as_deref());
        ActionLoggerMiddleware::with_log(ActionLogConfig::new(200, filter))
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "dms=debug,dms_client=debug,dms_store=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn start(session: &mut Session, command: Command) {
    match command {
        Command::Login { email, password } => session.login(Credentials { email, password }),
        Command::Signup {
            name,
            email,
            password,
        } => session.signup(SignupDetails {
            name,
            email,
            password,
        }),
        Command::Whoami => session.login_by_token(),
        Command::Logout => session.logout(),
        Command::Users { offset } => session.get_users(offset),
        Command::DeleteUser { id } => session.delete_user(id),
        Command::UpdateProfile {
            id,
            name,
            email,
            password,
        } => session.update_profile(
            id,
            ProfileChanges {
                name,
                email,
                password,
            },
        ),
        Command::Roles => session.get_roles(),
        Command::CreateRole { title } => session.create_role(title),
        Command::DeleteRole { id } => session.delete_role(id),
        Command::Documents { offset } => session.get_documents(offset),
        Command::Document { id } => session.get_document(id),
        Command::UserDocuments { user_id } => session.get_user_documents(user_id),
        Command::CreateDocument {
            title,
            content,
            access,
        } => session.create_document(DocumentDraft {
            title,
            content,
            access,
        }),
        Command::UpdateDocument {
            id,
            title,
            content,
            access,
        } => session.update_document(
            id,
            DocumentChanges {
                title,
                content,
                access,
            },
        ),
        Command::DeleteDocument { id } => session.delete_document(id),
        Command::SearchUsers { query } => session.search_users(query),
        Command::SearchDocuments { query } => session.search_documents(query),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.config()?;
    let token_path = config
        .token_file
        .clone()
        .context("token file not configured")?;
    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(token_path));
    let notifier = Arc::new(ConsoleNotifier::default());
    let navigator = Arc::new(RecordingNavigator::new());

    let services = Services {
        api: Arc::new(HttpApi::new(&config.base_url, tokens.clone())),
        notifier: notifier.clone(),
        navigator: navigator.clone(),
        tokens,
    };

    tracing::debug!(base_url = %config.base_url, "Starting session");
    let mut session = Session::with_logger(services, &config, args.logger());
    let show_history = args.history;
    start(&mut session, args.command);
    session.settle().await;

    let state = serde_json::to_string_pretty(session.state()).context("serializing state")?;
    println!("{}", state);

    if let Some(route) = navigator.current() {
        eprintln!("-> {}", route);
    }
    if show_history {
        if let Some(log) = session.action_log() {
            for entry in log.entries() {
                eprintln!("#{:<4} {}", entry.sequence, entry.summary);
            }
        }
    }

    if notifier.failed.load(Ordering::SeqCst) {
        std::process::exit(1);
    }
    Ok(())
}
