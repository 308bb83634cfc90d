//! Workflow engine for request status transitions
//!
//! Validates status changes against the fixed lifecycle graph. The engine
//! only answers "is this edge legal"; applying the change (timestamps,
//! audit entry, concurrency) is the store's job.

use thiserror::Error;

use crate::core::request::Status;

/// Errors that can occur during workflow validation
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: Status, to: Status },
}

/// Workflow engine for the request lifecycle
///
/// Allowed edges:
///
/// ```text
/// submitted    -> under_review
/// under_review -> processing
/// under_review -> submitted      (bounce back, e.g. missing info)
/// processing   -> completed
/// processing   -> under_review   (bounce back)
/// ```
///
/// `completed` is terminal. Self-transitions are not edges and fail,
/// so a client re-sending the current status gets an error instead of
/// a silent no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkflowEngine;

impl WorkflowEngine {
    pub fn new() -> Self {
        Self
    }

    /// Check if a status transition is a legal single edge
    pub fn is_valid_transition(&self, from: Status, to: Status) -> bool {
        matches!(
            (from, to),
            // Normal forward transitions
            (Status::Submitted, Status::UnderReview)
                | (Status::UnderReview, Status::Processing)
                | (Status::Processing, Status::Completed)
                // Bounce back for missing information or rework
                | (Status::UnderReview, Status::Submitted)
                | (Status::Processing, Status::UnderReview)
        )
    }

    /// Get allowed target statuses from the current status
    pub fn allowed_transitions(&self, current: Status) -> Vec<Status> {
        match current {
            Status::Submitted => vec![Status::UnderReview],
            Status::UnderReview => vec![Status::Processing, Status::Submitted],
            Status::Processing => vec![Status::Completed, Status::UnderReview],
            Status::Completed => vec![],
        }
    }

    /// Validate a transition, returning the error the caller should surface
    pub fn check_transition(&self, from: Status, to: Status) -> Result<(), WorkflowError> {
        if !self.is_valid_transition(from, to) {
            return Err(WorkflowError::InvalidTransition { from, to });
        }
        Ok(())
    }

    /// The single step forward from the current status, if any
    pub fn next_forward(&self, current: Status) -> Option<Status> {
        match current {
            Status::Submitted => Some(Status::UnderReview),
            Status::UnderReview => Some(Status::Processing),
            Status::Processing => Some(Status::Completed),
            Status::Completed => None,
        }
    }

    /// The single bounce-back step from the current status, if any
    pub fn bounce_back(&self, current: Status) -> Option<Status> {
        match current {
            Status::UnderReview => Some(Status::Submitted),
            Status::Processing => Some(Status::UnderReview),
            Status::Submitted | Status::Completed => None,
        }
    }
}
