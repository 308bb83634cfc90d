//! SLA monitor - query-time evaluation of open requests against due dates
//!
//! The monitor only reads. Escalation, notification, or any other
//! reaction to an overdue request happens outside this crate, driven by
//! the report returned here.

use chrono::{DateTime, Duration, Utc};

use crate::core::request::Request;
use crate::core::store::{RequestStore, StoreError};

/// Result of one overdue sweep
#[derive(Debug)]
pub struct OverdueReport {
    /// Evaluation instant used for every row in this report
    pub as_of: DateTime<Utc>,
    /// Overdue requests, most overdue first
    pub requests: Vec<Request>,
}

impl OverdueReport {
    /// How far past its deadline a request in this report is
    pub fn lateness(&self, request: &Request) -> Duration {
        self.as_of - request.due_at
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }
}

/// Evaluate all open requests against their due dates at `as_of`
pub fn sweep(store: &RequestStore, as_of: DateTime<Utc>) -> Result<OverdueReport, StoreError> {
    let requests = store.overdue(as_of)?;
    Ok(OverdueReport { as_of, requests })
}
