//! Snaplist Rust Client Library
//!
//! A Rust client for the Snaplist personal task manager API: signup and login
//! with JWT-backed sessions, session restore across restarts, automatic
//! logout at token expiry, and a request-state store over the paginated
//! Tasks resource.
//!
//! ```no_run
//! use snaplist_client::Snaplist;
//!
//! # async fn run() -> Result<(), snaplist_client::error::Error> {
//! let snaplist = Snaplist::new("https://snaplist.example.com/api");
//! snaplist.auth().login("alice", "secret").await?;
//!
//! let tasks = snaplist.tasks_store();
//! tasks.fetch(&Default::default(), 0, 20).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod store;
pub mod tasks;
pub mod token;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::SessionManager;
use crate::config::ClientOptions;
use crate::dashboard::DashboardClient;
use crate::tasks::{TasksClient, TasksStore};
use crate::token::{MemoryStorage, TokenStore, TokenStorage};

/// The main entry point for the Snaplist client
pub struct Snaplist {
    /// The base URL for the Snaplist API, without a trailing slash
    pub url: String,

    /// HTTP client shared by all sub-clients
    pub http_client: Client,

    /// Client options
    pub options: ClientOptions,

    /// Session manager for login, restore, and expiry-driven logout
    auth: SessionManager,

    /// Token slot shared by the session manager and the resource clients
    token_store: Arc<TokenStore>,
}

impl Snaplist {
    /// Create a new Snaplist client with default options and an in-memory
    /// token slot (sessions do not survive the process)
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the Snaplist API, e.g. `https://host/api`
    pub fn new(url: &str) -> Self {
        Self::new_with_options(url, ClientOptions::default(), Box::<MemoryStorage>::default())
    }

    /// Create a new Snaplist client with custom options and token storage
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the Snaplist API
    /// * `options` - Custom client options
    /// * `storage` - Persistence boundary for the session token; use
    ///   [`token::FileStorage`] to restore sessions across restarts
    pub fn new_with_options(
        url: &str,
        options: ClientOptions,
        storage: Box<dyn TokenStorage>,
    ) -> Self {
        let url = url.trim_end_matches('/').to_string();
        let http_client = Client::new();
        let token_store = Arc::new(TokenStore::new(storage));

        let auth = SessionManager::new(
            &url,
            http_client.clone(),
            options.request_timeout,
            Arc::clone(&token_store),
        );

        Self {
            url,
            http_client,
            options,
            auth,
            token_store,
        }
    }

    /// The session manager
    pub fn auth(&self) -> &SessionManager {
        &self.auth
    }

    /// A raw client for the `/tasks` endpoints
    pub fn tasks(&self) -> TasksClient {
        TasksClient::new(
            &self.url,
            self.http_client.clone(),
            self.options.request_timeout,
            Arc::clone(&self.token_store),
        )
    }

    /// A request-state store over the Tasks resource
    pub fn tasks_store(&self) -> TasksStore {
        TasksStore::new(self.tasks())
    }

    /// A client for the dashboard counts summary
    pub fn dashboard(&self) -> DashboardClient {
        DashboardClient::new(
            &self.url,
            self.http_client.clone(),
            self.options.request_timeout,
            Arc::clone(&self.token_store),
        )
    }

    /// The shared token store
    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::tasks::{TaskFilter, TaskPriority, TaskRequest, TaskStatus};
    pub use crate::Snaplist;
}
