//! Generic request-lifecycle state container
//!
//! A resource screen is a `ResourceState<T>` folded over tagged
//! [`ResourceEvent`]s by a pure reducer. The network layer produces events;
//! the reducer is deterministic and testable without a server.

use serde::{Deserialize, Serialize};

/// A bounded, offset-addressed slice of a server-side collection, with
/// total-count metadata. Field names follow the Spring page JSON the API
/// serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in server-provided order
    pub content: Vec<T>,

    /// Total matching count across all pages
    pub total_elements: u64,

    /// Number of pages
    pub total_pages: u32,

    /// Current zero-based page index
    pub number: u32,

    /// Page capacity
    pub size: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            number: 0,
            size: 20,
        }
    }
}

/// Item addressable by a stable identifier
pub trait Identifiable {
    /// Identifier type
    type Id: PartialEq + Clone + std::fmt::Debug;

    /// The item's identifier
    fn id(&self) -> Self::Id;
}

/// Lifecycle of the current fetch from the view's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    /// No fetch issued yet
    #[default]
    Idle,

    /// A fetch is in flight
    Loading,

    /// The last fetch resolved successfully
    Succeeded,

    /// The last fetch failed; the previous page is retained
    Failed,
}

/// Tagged request-lifecycle events
#[derive(Debug, Clone)]
pub enum ResourceEvent<T: Identifiable> {
    /// A list query was issued
    FetchStarted,

    /// A list query resolved; the page replaces the stored one wholesale
    FetchSucceeded(Page<T>),

    /// A list query failed; carries the error payload to render
    FetchFailed(String),

    /// A create resolved; the item is prepended optimistically
    CreateSucceeded(T),

    /// An update resolved; the server's representation replaces the matching
    /// item in place
    UpdateSucceeded(T),

    /// A delete resolved for this id
    RemoveSucceeded(T::Id),

    /// A mutation failed; state is left untouched apart from the payload
    MutationFailed(String),
}

/// State projected to the view layer: `{status, page, error}`
#[derive(Debug, Clone)]
pub struct ResourceState<T: Identifiable> {
    /// Status of the current fetch
    pub status: RequestStatus,

    /// The cached page
    pub page: Page<T>,

    /// Last error payload, if any
    pub error: Option<String>,
}

impl<T: Identifiable> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            status: RequestStatus::default(),
            page: Page::default(),
            error: None,
        }
    }
}

impl<T: Identifiable> ResourceState<T> {
    /// Fold one event into the state.
    ///
    /// Mutation failures never leave partial optimistic state, and a failed
    /// fetch keeps the stale-but-valid page rather than blanking the screen.
    pub fn apply(&mut self, event: ResourceEvent<T>) {
        match event {
            ResourceEvent::FetchStarted => {
                self.status = RequestStatus::Loading;
                self.error = None;
            }
            ResourceEvent::FetchSucceeded(page) => {
                self.status = RequestStatus::Succeeded;
                self.page = page;
            }
            ResourceEvent::FetchFailed(payload) => {
                self.status = RequestStatus::Failed;
                self.error = Some(payload);
            }
            ResourceEvent::CreateSucceeded(item) => {
                // Optimistic insert: the list and the true server order can
                // diverge until the next fetch.
                self.page.content.insert(0, item);
                self.page.total_elements += 1;
            }
            ResourceEvent::UpdateSucceeded(item) => {
                let id = item.id();
                if let Some(slot) = self.page.content.iter_mut().find(|t| t.id() == id) {
                    *slot = item;
                }
            }
            ResourceEvent::RemoveSucceeded(id) => {
                let before = self.page.content.len();
                self.page.content.retain(|t| t.id() != id);
                // Only count items that were actually present; removing an
                // unknown id is a no-op.
                if self.page.content.len() < before {
                    self.page.total_elements = self.page.total_elements.saturating_sub(1);
                }
            }
            ResourceEvent::MutationFailed(payload) => {
                self.error = Some(payload);
            }
        }
    }
}
