//! Request entity - one HR service ticket moving through the workflow

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::core::category::Category;

/// Prefix carried by every request id
pub const ID_PREFIX: &str = "REQ";

/// Unique request identifier: `REQ-<ULID>`
///
/// Immutable once assigned. The ULID payload keeps ids sortable by
/// creation time and safe to generate without coordination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh id
    pub fn new() -> Self {
        Self(format!("{}-{}", ID_PREFIX, Ulid::new()))
    }

    /// Wrap an already-validated id string (e.g. read back from the store)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request lifecycle status
///
/// The four states form a fixed lifecycle; `Completed` is terminal.
/// Legal edges live in [`crate::core::workflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Status {
    #[default]
    Submitted,
    UnderReview,
    Processing,
    Completed,
}

impl Status {
    /// All statuses, in lifecycle order
    pub const ALL: [Status; 4] = [
        Status::Submitted,
        Status::UnderReview,
        Status::Processing,
        Status::Completed,
    ];

    /// Whether this status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Completed)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Submitted => write!(f, "submitted"),
            Status::UnderReview => write!(f, "under_review"),
            Status::Processing => write!(f, "processing"),
            Status::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "submitted" => Ok(Status::Submitted),
            "under_review" | "under-review" => Ok(Status::UnderReview),
            "processing" => Ok(Status::Processing),
            "completed" => Ok(Status::Completed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// What an audit entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// A status change along a workflow edge
    Transition,
    /// Owner change; status and due date untouched
    Reassign,
    /// Category change; due date recomputed
    Recategorize,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Transition => write!(f, "transition"),
            AuditAction::Reassign => write!(f, "reassign"),
            AuditAction::Recategorize => write!(f, "recategorize"),
        }
    }
}

impl std::str::FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transition" => Ok(AuditAction::Transition),
            "reassign" => Ok(AuditAction::Reassign),
            "recategorize" => Ok(AuditAction::Recategorize),
            _ => Err(format!("Unknown audit action: {}", s)),
        }
    }
}

/// One immutable record in a request's history
///
/// The audit log is append-only: entries are never updated or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub at: DateTime<Utc>,
    pub actor: String,
    pub action: AuditAction,
    pub old_status: Status,
    pub new_status: Status,
    /// Free-form detail, e.g. "it-support -> benefits-team" for a reassign
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// An uploaded file attached to a request
///
/// Attachments hold opaque blob references; the bytes live in the blob
/// store and are owned by the request (removed with it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Content-addressed blob reference
    pub blob_ref: String,
    /// Original filename as supplied by the submitter
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Unique identifier
    pub id: RequestId,

    /// Closed classification driving routing and SLA
    pub category: Category,

    /// Current lifecycle status
    #[serde(default)]
    pub status: Status,

    /// Staff member or team currently responsible
    pub assignee: String,

    /// Short title
    pub summary: String,

    /// Full request text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,

    /// Submitter's employee id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub employee_id: String,

    /// Submitter's name
    pub employee_name: String,

    /// Submitter's department
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub department: String,

    /// Creation timestamp, immutable
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,

    /// SLA deadline: created_at + category SLA, recomputed on recategorize
    pub due_at: DateTime<Utc>,

    /// Set once when the request reaches Completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Ordered attachment references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    /// Optimistic-concurrency counter, bumped on every persisted mutation
    #[serde(default = "default_revision")]
    pub revision: u32,
}

fn default_revision() -> u32 {
    1
}

impl Request {
    /// Whether the request is overdue as of the given instant
    pub fn is_overdue(&self, as_of: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && self.due_at < as_of
    }
}

/// Intake payload for a new request, before routing and persistence
#[derive(Debug, Clone, Default)]
pub struct RequestDraft {
    pub category: Category,
    pub summary: String,
    pub details: String,
    pub employee_id: String,
    pub employee_name: String,
    pub department: String,
}

/// Millisecond unix timestamps are what the store persists; keep the
/// conversions in one place so every table agrees.
pub fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub fn from_millis(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}
