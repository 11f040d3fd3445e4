//! Cross-resource dashboard counts

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::Fetch;
use crate::store::Page;
use crate::token::TokenStore;

/// Item counts across the three Snaplist collections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCounts {
    pub tasks: u64,
    pub notes: u64,
    pub bookmarks: u64,
}

/// Client for the dashboard summary
pub struct DashboardClient {
    /// The base URL for the Snaplist API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Per-request timeout
    timeout: Duration,

    /// Token slot shared with the session manager
    token_store: Arc<TokenStore>,
}

impl DashboardClient {
    /// Create a new dashboard client
    pub(crate) fn new(
        url: &str,
        client: Client,
        timeout: Duration,
        token_store: Arc<TokenStore>,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            timeout,
            token_store,
        }
    }

    /// Count the items in each collection with three concurrent `size=1`
    /// list calls; only `totalElements` is read from each page.
    pub async fn resource_counts(&self) -> Result<ResourceCounts, Error> {
        let (tasks, notes, bookmarks) = tokio::try_join!(
            self.total("/tasks"),
            self.total("/notes"),
            self.total("/bookmarks"),
        )?;

        Ok(ResourceCounts {
            tasks,
            notes,
            bookmarks,
        })
    }

    async fn total(&self, path: &str) -> Result<u64, Error> {
        let mut params = HashMap::new();
        params.insert("page".to_string(), "0".to_string());
        params.insert("size".to_string(), "1".to_string());

        let page: Page<serde_json::Value> =
            Fetch::get(&self.client, &format!("{}{}", self.url, path))
                .token_store(&self.token_store)
                .timeout(self.timeout)
                .query(params)
                .execute()
                .await?;

        Ok(page.total_elements)
    }
}
