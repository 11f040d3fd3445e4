//! Types for the Tasks resource

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::store::Identifiable;

/// Maximum task text length accepted by the API
pub const MAX_TEXT_LEN: usize = 300;

/// Completion state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Pending,
    Done,
}

impl TaskStatus {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Done => "DONE",
        }
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// A task as the server represents it. The client only caches copies; dates
/// and timestamps are opaque ISO strings, never computed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,

    /// Optional calendar date, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Creation instant, RFC 3339
    pub created_at: String,

    /// Last-update instant, RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Identifiable for Task {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Payload for creating or replacing a task
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl TaskRequest {
    /// Create a request with the given text and server-side defaults for the
    /// rest
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the due date (`YYYY-MM-DD`)
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Client-side validation, applied before any request is sent
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.text.trim().is_empty() {
            return Err(Error::validation("task text cannot be empty"));
        }
        if self.text.chars().count() > MAX_TEXT_LEN {
            return Err(Error::validation(format!(
                "task text cannot exceed {} characters",
                MAX_TEXT_LEN
            )));
        }
        Ok(())
    }
}

/// Server-side list filters; `None` fields are omitted from the query string
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Free-text search
    pub q: Option<String>,

    /// Filter by completion state
    pub status: Option<TaskStatus>,

    /// Filter by priority
    pub priority: Option<TaskPriority>,

    /// Only tasks due on or before this date (`YYYY-MM-DD`)
    pub due_before: Option<String>,

    /// Only tasks due on or after this date (`YYYY-MM-DD`)
    pub due_after: Option<String>,
}

impl TaskFilter {
    /// Set the free-text search term
    pub fn with_q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    /// Set the status filter
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority filter
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the upper due-date bound
    pub fn with_due_before(mut self, date: impl Into<String>) -> Self {
        self.due_before = Some(date.into());
        self
    }

    /// Set the lower due-date bound
    pub fn with_due_after(mut self, date: impl Into<String>) -> Self {
        self.due_after = Some(date.into());
        self
    }

    pub(crate) fn to_params(&self, page: u32, size: u32) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("page".to_string(), page.to_string());
        params.insert("size".to_string(), size.to_string());

        if let Some(q) = &self.q {
            params.insert("q".to_string(), q.clone());
        }
        if let Some(status) = &self.status {
            params.insert("status".to_string(), status.as_str().to_string());
        }
        if let Some(priority) = &self.priority {
            params.insert("priority".to_string(), priority.as_str().to_string());
        }
        if let Some(due_before) = &self.due_before {
            params.insert("dueBefore".to_string(), due_before.clone());
        }
        if let Some(due_after) = &self.due_after {
            params.insert("dueAfter".to_string(), due_after.clone());
        }

        params
    }
}
