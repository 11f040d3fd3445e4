//! Tasks resource: raw endpoint client and the request-state store over it

mod types;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::store::{Page, ResourceEvent, ResourceState};
use crate::token::TokenStore;

pub use types::{Task, TaskFilter, TaskPriority, TaskRequest, TaskStatus, MAX_TEXT_LEN};

/// Client for the `/tasks` endpoints.
///
/// Every call carries the current bearer token; an anonymous token store
/// simply produces unauthenticated requests, which the server rejects.
pub struct TasksClient {
    /// The base URL for the Snaplist API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Per-request timeout
    timeout: Duration,

    /// Token slot shared with the session manager
    token_store: Arc<TokenStore>,
}

impl TasksClient {
    /// Create a new tasks client
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

    fn tasks_url(&self, path: &str) -> String {
        format!("{}/tasks{}", self.url, path)
    }

    /// List tasks matching the filter, one page at a time
    pub async fn list(
        &self,
        filter: &TaskFilter,
        page: u32,
        size: u32,
    ) -> Result<Page<Task>, Error> {
        Fetch::get(&self.client, &self.tasks_url(""))
            .token_store(&self.token_store)
            .timeout(self.timeout)
            .query(filter.to_params(page, size))
            .execute()
            .await
    }

    /// Fetch a single task by id
    pub async fn get(&self, id: i64) -> Result<Task, Error> {
        Fetch::get(&self.client, &self.tasks_url(&format!("/{}", id)))
            .token_store(&self.token_store)
            .timeout(self.timeout)
            .execute()
            .await
    }

    /// Create a task
    pub async fn create(&self, request: &TaskRequest) -> Result<Task, Error> {
        request.validate()?;

        Fetch::post(&self.client, &self.tasks_url(""))
            .token_store(&self.token_store)
            .timeout(self.timeout)
            .json(request)?
            .execute()
            .await
    }

    /// Replace a task
    pub async fn update(&self, id: i64, request: &TaskRequest) -> Result<Task, Error> {
        request.validate()?;

        Fetch::put(&self.client, &self.tasks_url(&format!("/{}", id)))
            .token_store(&self.token_store)
            .timeout(self.timeout)
            .json(request)?
            .execute()
            .await
    }

    /// Delete a task; the server answers 204
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        Fetch::delete(&self.client, &self.tasks_url(&format!("/{}", id)))
            .token_store(&self.token_store)
            .timeout(self.timeout)
            .execute_empty()
            .await
    }

    /// Mark a task done through the dedicated endpoint
    pub async fn complete(&self, id: i64) -> Result<Task, Error> {
        Fetch::post(&self.client, &self.tasks_url(&format!("/{}/complete", id)))
            .token_store(&self.token_store)
            .timeout(self.timeout)
            .execute()
            .await
    }
}

/// Request-lifecycle store for the Tasks resource.
///
/// Wraps a [`TasksClient`] and folds every outcome into a
/// [`ResourceState<Task>`] through the pure reducer, so a view layer can
/// render `{status, page, error}` without tracking requests itself.
/// Mutations reconcile optimistically; a follow-up [`fetch`](Self::fetch) is
/// the authoritative refresh.
pub struct TasksStore {
    client: TasksClient,
    state: RwLock<ResourceState<Task>>,
}

impl TasksStore {
    /// Create a store over the given client
    pub fn new(client: TasksClient) -> Self {
        Self {
            client,
            state: RwLock::new(ResourceState::default()),
        }
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> ResourceState<Task> {
        self.state.read().await.clone()
    }

    async fn apply(&self, event: ResourceEvent<Task>) {
        self.state.write().await.apply(event);
    }

    /// Issue a list query and replace the stored page wholesale on success.
    /// On failure the previous page is retained and the error payload stored.
    ///
    /// Overlapping fetches are not fenced by sequence numbers: whichever
    /// resolves last wins, even if it was issued first.
    pub async fn fetch(
        &self,
        filter: &TaskFilter,
        page: u32,
        size: u32,
    ) -> Result<Page<Task>, Error> {
        self.apply(ResourceEvent::FetchStarted).await;

        match self.client.list(filter, page, size).await {
            Ok(result) => {
                debug!(
                    "fetched page {} ({} of {} tasks)",
                    result.number,
                    result.content.len(),
                    result.total_elements
                );
                self.apply(ResourceEvent::FetchSucceeded(result.clone())).await;
                Ok(result)
            }
            Err(err) => {
                self.apply(ResourceEvent::FetchFailed(err.payload())).await;
                Err(err)
            }
        }
    }

    /// Create a task; on success it is prepended to the cached page and the
    /// total incremented, without a refetch
    pub async fn create(&self, request: &TaskRequest) -> Result<Task, Error> {
        match self.client.create(request).await {
            Ok(task) => {
                self.apply(ResourceEvent::CreateSucceeded(task.clone())).await;
                Ok(task)
            }
            Err(err) => {
                self.apply(ResourceEvent::MutationFailed(err.payload())).await;
                Err(err)
            }
        }
    }

    /// Replace a task; on success the server's representation replaces the
    /// cached item by id
    pub async fn update(&self, id: i64, request: &TaskRequest) -> Result<Task, Error> {
        match self.client.update(id, request).await {
            Ok(task) => {
                self.apply(ResourceEvent::UpdateSucceeded(task.clone())).await;
                Ok(task)
            }
            Err(err) => {
                self.apply(ResourceEvent::MutationFailed(err.payload())).await;
                Err(err)
            }
        }
    }

    /// Delete a task; on success it is filtered out of the cached page.
    /// Removing an id that is not cached is not an error.
    pub async fn remove(&self, id: i64) -> Result<i64, Error> {
        match self.client.delete(id).await {
            Ok(()) => {
                self.apply(ResourceEvent::RemoveSucceeded(id)).await;
                Ok(id)
            }
            Err(err) => {
                self.apply(ResourceEvent::MutationFailed(err.payload())).await;
                Err(err)
            }
        }
    }

    /// Set a task's completion state.
    ///
    /// Single entry point for both directions: `Done` routes to the dedicated
    /// complete endpoint, `Pending` re-submits the cached task with the
    /// status flipped. Both converge on the same replace-by-id reconciliation.
    pub async fn set_status(&self, id: i64, status: TaskStatus) -> Result<Task, Error> {
        let result = match status {
            TaskStatus::Done => self.client.complete(id).await,
            TaskStatus::Pending => {
                let current = {
                    let state = self.state.read().await;
                    state.page.content.iter().find(|t| t.id == id).cloned()
                };

                match current {
                    Some(task) => {
                        let request = TaskRequest {
                            text: task.text,
                            status: Some(TaskStatus::Pending),
                            priority: Some(task.priority),
                            due_date: task.due_date,
                        };
                        self.client.update(id, &request).await
                    }
                    None => Err(Error::validation(format!(
                        "task {} is not in the current page",
                        id
                    ))),
                }
            }
        };

        match result {
            Ok(task) => {
                self.apply(ResourceEvent::UpdateSucceeded(task.clone())).await;
                Ok(task)
            }
            Err(err) => {
                self.apply(ResourceEvent::MutationFailed(err.payload())).await;
                Err(err)
            }
        }
    }
}
