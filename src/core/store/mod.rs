//! Request store - durable CRUD plus the append-only audit trail
//!
//! One SQLite database holds three tables: `requests`, `audit_log`, and
//! `attachments`. Every mutation of a request row goes through a
//! compare-and-swap on its `revision` column inside a single transaction,
//! so concurrent writers to the same id serialize and the workflow
//! precondition check is race-free. The swap is retried a bounded number
//! of times before surfacing a conflict.

mod serialize;
#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::core::category::{Category, CategoryRegistry, UnknownCategory};
use crate::core::request::{
    from_millis, to_millis, Attachment, AuditAction, AuditEntry, Request, RequestDraft, RequestId,
    Status,
};
use crate::core::routing::Router;
use crate::core::workflow::{WorkflowEngine, WorkflowError};

/// Attempts for the revision compare-and-swap before giving up
const MAX_UPDATE_ATTEMPTS: u32 = 3;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS requests (
    id            TEXT PRIMARY KEY,
    category      TEXT NOT NULL,
    status        TEXT NOT NULL,
    assignee      TEXT NOT NULL,
    summary       TEXT NOT NULL,
    details       TEXT NOT NULL DEFAULT '',
    employee_id   TEXT NOT NULL DEFAULT '',
    employee_name TEXT NOT NULL,
    department    TEXT NOT NULL DEFAULT '',
    created_at    INTEGER NOT NULL,
    updated_at    INTEGER NOT NULL,
    due_at        INTEGER NOT NULL,
    completed_at  INTEGER,
    revision      INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_requests_status ON requests(status);
CREATE INDEX IF NOT EXISTS idx_requests_due_at ON requests(due_at);

CREATE TABLE IF NOT EXISTS audit_log (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id TEXT NOT NULL REFERENCES requests(id) ON DELETE CASCADE,
    at         INTEGER NOT NULL,
    actor      TEXT NOT NULL,
    action     TEXT NOT NULL,
    old_status TEXT NOT NULL,
    new_status TEXT NOT NULL,
    note       TEXT
);

CREATE INDEX IF NOT EXISTS idx_audit_request ON audit_log(request_id);

CREATE TABLE IF NOT EXISTS attachments (
    request_id  TEXT NOT NULL REFERENCES requests(id) ON DELETE CASCADE,
    position    INTEGER NOT NULL,
    blob_ref    TEXT NOT NULL,
    filename    TEXT NOT NULL,
    uploaded_at INTEGER NOT NULL,
    PRIMARY KEY (request_id, position)
);
";

/// Errors that can occur during store operations
///
/// Each variant is a distinct caller-visible condition; none are folded
/// into a generic failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Request not found: {id}")]
    NotFound { id: String },

    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    #[error(transparent)]
    Transition(#[from] WorkflowError),

    #[error("Concurrent update lost the race on {id} after {attempts} attempts")]
    Conflict { id: String, attempts: u32 },

    #[error("Storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation {
            message: message.into(),
        }
    }
}

/// Filter for request listings
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub assignee: Option<String>,
    /// Only requests past their due date (evaluated at `as_of`)
    pub overdue_only: bool,
    /// Evaluation instant for `overdue_only`; defaults to now
    pub as_of: Option<DateTime<Utc>>,
}

/// Durable request store over a single SQLite database
pub struct RequestStore {
    conn: Mutex<Connection>,
    router: Router,
    engine: WorkflowEngine,
}

impl RequestStore {
    /// Open (creating if needed) the store at the given path
    pub fn open(path: &Path, registry: Arc<CategoryRegistry>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn, registry)
    }

    /// In-memory store, used by tests
    pub fn open_in_memory(registry: Arc<CategoryRegistry>) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, registry)
    }

    fn from_connection(
        conn: Connection,
        registry: Arc<CategoryRegistry>,
    ) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            router: Router::new(registry),
            engine: WorkflowEngine::new(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("store lock poisoned")
    }

    /// Create a new request: validates the draft, routes it, persists it
    pub fn create(&self, draft: RequestDraft) -> Result<Request, StoreError> {
        self.create_at(draft, Utc::now())
    }

    /// Create with an explicit creation instant (imports, tests)
    pub fn create_at(
        &self,
        draft: RequestDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Request, StoreError> {
        if draft.summary.trim().is_empty() {
            return Err(StoreError::validation("summary must not be empty"));
        }
        if draft.employee_name.trim().is_empty() {
            return Err(StoreError::validation("employee name must not be empty"));
        }

        let routed = self.router.route(draft.category, created_at)?;

        let request = Request {
            id: RequestId::new(),
            category: draft.category,
            status: Status::Submitted,
            assignee: routed.assignee,
            summary: draft.summary,
            details: draft.details,
            employee_id: draft.employee_id,
            employee_name: draft.employee_name,
            department: draft.department,
            created_at,
            updated_at: created_at,
            due_at: routed.due_at,
            completed_at: None,
            attachments: Vec::new(),
            revision: 1,
        };

        let conn = self.lock();
        conn.execute(
            "INSERT INTO requests
               (id, category, status, assignee, summary, details,
                employee_id, employee_name, department,
                created_at, updated_at, due_at, completed_at, revision)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, NULL, 1)",
            params![
                request.id.as_str(),
                request.category,
                request.status,
                request.assignee,
                request.summary,
                request.details,
                request.employee_id,
                request.employee_name,
                request.department,
                to_millis(request.created_at),
                to_millis(request.updated_at),
                to_millis(request.due_at),
            ],
        )?;

        Ok(request)
    }

    /// Fetch a request with its attachments
    pub fn get(&self, id: &RequestId) -> Result<Request, StoreError> {
        let conn = self.lock();
        let mut request = conn
            .query_row(
                "SELECT id, category, status, assignee, summary, details,
                        employee_id, employee_name, department,
                        created_at, updated_at, due_at, completed_at, revision
                 FROM requests WHERE id = ?1",
                params![id.as_str()],
                row_to_request,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound {
                id: id.to_string(),
            })?;

        request.attachments = load_attachments(&conn, id)?;
        Ok(request)
    }

    /// Resolve a full id or a unique id prefix to a request id
    pub fn resolve_ref(&self, reference: &str) -> Result<RequestId, StoreError> {
        let reference = reference.trim().to_uppercase();
        let conn = self.lock();

        let exact: Option<String> = conn
            .query_row(
                "SELECT id FROM requests WHERE id = ?1",
                params![reference],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = exact {
            return Ok(RequestId::from_string(id));
        }

        let mut stmt =
            conn.prepare("SELECT id FROM requests WHERE id LIKE ?1 || '%' LIMIT 2")?;
        let matches: Vec<String> = stmt
            .query_map(params![reference], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        match matches.len() {
            0 => Err(StoreError::NotFound { id: reference }),
            1 => Ok(RequestId::from_string(matches.into_iter().next().unwrap())),
            _ => Err(StoreError::validation(format!(
                "reference '{}' is ambiguous",
                reference
            ))),
        }
    }

    /// Apply a validated status transition
    ///
    /// Atomic read-modify-write: the precondition check and the update run
    /// against the same revision, and the audit entry commits with the
    /// status change or not at all.
    pub fn update_status(
        &self,
        id: &RequestId,
        target: Status,
        actor: &str,
    ) -> Result<Request, StoreError> {
        for _ in 0..MAX_UPDATE_ATTEMPTS {
            if self.try_transition(id, target, actor)? {
                return self.get(id);
            }
        }
        Err(StoreError::Conflict {
            id: id.to_string(),
            attempts: MAX_UPDATE_ATTEMPTS,
        })
    }

    fn try_transition(
        &self,
        id: &RequestId,
        target: Status,
        actor: &str,
    ) -> Result<bool, StoreError> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let row: Option<(Status, u32)> = tx
            .query_row(
                "SELECT status, revision FROM requests WHERE id = ?1",
                params![id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (current, revision) = row.ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })?;

        self.engine.check_transition(current, target)?;

        let now = Utc::now();
        let completed_at = (target == Status::Completed).then(|| to_millis(now));

        let changed = tx.execute(
            "UPDATE requests
             SET status = ?1,
                 updated_at = ?2,
                 completed_at = COALESCE(?3, completed_at),
                 revision = revision + 1
             WHERE id = ?4 AND revision = ?5",
            params![target, to_millis(now), completed_at, id.as_str(), revision],
        )?;

        if changed != 1 {
            // Lost the revision race; the caller re-reads and retries
            return Ok(false);
        }

        append_audit(
            &tx,
            id,
            now,
            actor,
            AuditAction::Transition,
            current,
            target,
            None,
        )?;
        tx.commit()?;
        Ok(true)
    }

    /// Change the responsible staff member
    ///
    /// Appends an audit entry; the due date is never touched by a
    /// reassignment alone.
    pub fn reassign(
        &self,
        id: &RequestId,
        new_assignee: &str,
        actor: &str,
    ) -> Result<Request, StoreError> {
        if new_assignee.trim().is_empty() {
            return Err(StoreError::validation("assignee must not be empty"));
        }

        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let done = {
                let mut conn = self.lock();
                let tx = conn.transaction()?;

                let row: Option<(Status, u32, String)> = tx
                    .query_row(
                        "SELECT status, revision, assignee FROM requests WHERE id = ?1",
                        params![id.as_str()],
                        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                    )
                    .optional()?;
                let (status, revision, old_assignee) =
                    row.ok_or_else(|| StoreError::NotFound {
                        id: id.to_string(),
                    })?;

                let now = Utc::now();
                let changed = tx.execute(
                    "UPDATE requests
                     SET assignee = ?1, updated_at = ?2, revision = revision + 1
                     WHERE id = ?3 AND revision = ?4",
                    params![new_assignee, to_millis(now), id.as_str(), revision],
                )?;

                if changed == 1 {
                    append_audit(
                        &tx,
                        id,
                        now,
                        actor,
                        AuditAction::Reassign,
                        status,
                        status,
                        Some(format!("{} -> {}", old_assignee, new_assignee)),
                    )?;
                    tx.commit()?;
                    true
                } else {
                    false
                }
            };
            if done {
                return self.get(id);
            }
        }
        Err(StoreError::Conflict {
            id: id.to_string(),
            attempts: MAX_UPDATE_ATTEMPTS,
        })
    }

    /// Change the category and recompute the SLA deadline
    ///
    /// The new due date is `created_at` plus the new category's SLA, so a
    /// recategorized request is judged against its original intake time.
    pub fn recategorize(
        &self,
        id: &RequestId,
        new_category: Category,
        actor: &str,
    ) -> Result<Request, StoreError> {
        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let done = {
                let mut conn = self.lock();
                let tx = conn.transaction()?;

                let row: Option<(Status, u32, Category, i64)> = tx
                    .query_row(
                        "SELECT status, revision, category, created_at
                         FROM requests WHERE id = ?1",
                        params![id.as_str()],
                        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                    )
                    .optional()?;
                let (status, revision, old_category, created_ms) =
                    row.ok_or_else(|| StoreError::NotFound {
                        id: id.to_string(),
                    })?;

                let created_at = from_millis(created_ms);
                let routed = self.router.route(new_category, created_at)?;

                let now = Utc::now();
                let changed = tx.execute(
                    "UPDATE requests
                     SET category = ?1, due_at = ?2, updated_at = ?3,
                         revision = revision + 1
                     WHERE id = ?4 AND revision = ?5",
                    params![
                        new_category,
                        to_millis(routed.due_at),
                        to_millis(now),
                        id.as_str(),
                        revision
                    ],
                )?;

                if changed == 1 {
                    append_audit(
                        &tx,
                        id,
                        now,
                        actor,
                        AuditAction::Recategorize,
                        status,
                        status,
                        Some(format!("{} -> {}", old_category, new_category)),
                    )?;
                    tx.commit()?;
                    true
                } else {
                    false
                }
            };
            if done {
                return self.get(id);
            }
        }
        Err(StoreError::Conflict {
            id: id.to_string(),
            attempts: MAX_UPDATE_ATTEMPTS,
        })
    }

    /// List requests matching the filter
    ///
    /// Ordered by creation time then id, so repeated identical queries
    /// return rows in the same order.
    pub fn list(&self, filter: &RequestFilter) -> Result<Vec<Request>, StoreError> {
        let mut sql = String::from(
            "SELECT id, category, status, assignee, summary, details,
                    employee_id, employee_name, department,
                    created_at, updated_at, due_at, completed_at, revision
             FROM requests WHERE 1=1",
        );
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            sql.push_str(&format!(" AND status = ?{}", values.len() + 1));
            values.push(Box::new(status));
        }
        if let Some(category) = filter.category {
            sql.push_str(&format!(" AND category = ?{}", values.len() + 1));
            values.push(Box::new(category));
        }
        if let Some(ref assignee) = filter.assignee {
            sql.push_str(&format!(" AND assignee = ?{}", values.len() + 1));
            values.push(Box::new(assignee.clone()));
        }
        if filter.overdue_only {
            let as_of = filter.as_of.unwrap_or_else(Utc::now);
            sql.push_str(&format!(
                " AND status != '{}' AND due_at < ?{}",
                Status::Completed,
                values.len() + 1
            ));
            values.push(Box::new(to_millis(as_of)));
        }
        sql.push_str(" ORDER BY created_at, id");

        let conn = self.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
            row_to_request,
        )?;

        let mut requests = Vec::new();
        for row in rows {
            let mut request = row?;
            request.attachments = load_attachments(&conn, &request.id)?;
            requests.push(request);
        }
        Ok(requests)
    }

    /// All non-completed requests past their due date at `as_of`
    ///
    /// Read-only; never mutates request state. Each row is a consistent
    /// snapshot of one request (no single snapshot across all rows).
    pub fn overdue(&self, as_of: DateTime<Utc>) -> Result<Vec<Request>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, category, status, assignee, summary, details,
                    employee_id, employee_name, department,
                    created_at, updated_at, due_at, completed_at, revision
             FROM requests
             WHERE status != ?1 AND due_at < ?2
             ORDER BY due_at, id",
        )?;
        let rows = stmt.query_map(params![Status::Completed, to_millis(as_of)], row_to_request)?;

        let mut requests = Vec::new();
        for row in rows {
            let mut request = row?;
            request.attachments = load_attachments(&conn, &request.id)?;
            requests.push(request);
        }
        Ok(requests)
    }

    /// The request's audit trail in chronological order
    pub fn audit(&self, id: &RequestId) -> Result<Vec<AuditEntry>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT at, actor, action, old_status, new_status, note
             FROM audit_log WHERE request_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![id.as_str()], |row| {
            Ok(AuditEntry {
                at: from_millis(row.get(0)?),
                actor: row.get(1)?,
                action: row.get(2)?,
                old_status: row.get(3)?,
                new_status: row.get(4)?,
                note: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Record a stored blob as the request's next attachment
    pub fn add_attachment(
        &self,
        id: &RequestId,
        blob_ref: &str,
        filename: &str,
    ) -> Result<Request, StoreError> {
        let now = Utc::now();
        {
            let mut conn = self.lock();
            let tx = conn.transaction()?;

            let exists: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM requests WHERE id = ?1",
                    params![id.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            if exists.is_none() {
                return Err(StoreError::NotFound {
                    id: id.to_string(),
                });
            }

            tx.execute(
                "INSERT INTO attachments (request_id, position, blob_ref, filename, uploaded_at)
                 SELECT ?1, COALESCE(MAX(position) + 1, 0), ?2, ?3, ?4
                 FROM attachments WHERE request_id = ?1",
                params![id.as_str(), blob_ref, filename, to_millis(now)],
            )?;
            tx.execute(
                "UPDATE requests SET updated_at = ?1 WHERE id = ?2",
                params![to_millis(now), id.as_str()],
            )?;
            tx.commit()?;
        }
        self.get(id)
    }
}

fn row_to_request(row: &rusqlite::Row<'_>) -> rusqlite::Result<Request> {
    let completed_ms: Option<i64> = row.get(12)?;
    Ok(Request {
        id: RequestId::from_string(row.get(0)?),
        category: row.get(1)?,
        status: row.get(2)?,
        assignee: row.get(3)?,
        summary: row.get(4)?,
        details: row.get(5)?,
        employee_id: row.get(6)?,
        employee_name: row.get(7)?,
        department: row.get(8)?,
        created_at: from_millis(row.get(9)?),
        updated_at: from_millis(row.get(10)?),
        due_at: from_millis(row.get(11)?),
        completed_at: completed_ms.map(from_millis),
        attachments: Vec::new(),
        revision: row.get(13)?,
    })
}

fn load_attachments(
    conn: &Connection,
    id: &RequestId,
) -> Result<Vec<Attachment>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT blob_ref, filename, uploaded_at
         FROM attachments WHERE request_id = ?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![id.as_str()], |row| {
        Ok(Attachment {
            blob_ref: row.get(0)?,
            filename: row.get(1)?,
            uploaded_at: from_millis(row.get(2)?),
        })
    })?;
    rows.collect()
}

#[allow(clippy::too_many_arguments)]
fn append_audit(
    tx: &rusqlite::Transaction<'_>,
    id: &RequestId,
    at: DateTime<Utc>,
    actor: &str,
    action: AuditAction,
    old_status: Status,
    new_status: Status,
    note: Option<String>,
) -> Result<(), rusqlite::Error> {
    tx.execute(
        "INSERT INTO audit_log (request_id, at, actor, action, old_status, new_status, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id.as_str(),
            to_millis(at),
            actor,
            action,
            old_status,
            new_status,
            note
        ],
    )?;
    Ok(())
}
