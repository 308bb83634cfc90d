//! Unified filter enums for CLI commands

use clap::ValueEnum;

use crate::core::request::Status;

/// Status filter for list commands
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Submitted only
    Submitted,
    /// Under review only
    UnderReview,
    /// Processing only
    Processing,
    /// Completed only
    Completed,
    /// Everything not yet completed - default
    #[default]
    Open,
    /// All statuses including completed
    All,
}

impl StatusFilter {
    /// Check if a Status matches this filter
    pub fn matches(&self, status: &Status) -> bool {
        match self {
            StatusFilter::Submitted => *status == Status::Submitted,
            StatusFilter::UnderReview => *status == Status::UnderReview,
            StatusFilter::Processing => *status == Status::Processing,
            StatusFilter::Completed => *status == Status::Completed,
            StatusFilter::Open => *status != Status::Completed,
            StatusFilter::All => true,
        }
    }

    /// The single status this filter pins down, if any
    ///
    /// Exact filters push down into the store query; the composite
    /// `Open`/`All` filters are applied in memory after listing.
    pub fn exact(&self) -> Option<Status> {
        match self {
            StatusFilter::Submitted => Some(Status::Submitted),
            StatusFilter::UnderReview => Some(Status::UnderReview),
            StatusFilter::Processing => Some(Status::Processing),
            StatusFilter::Completed => Some(Status::Completed),
            StatusFilter::Open | StatusFilter::All => None,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::Submitted => write!(f, "submitted"),
            StatusFilter::UnderReview => write!(f, "under_review"),
            StatusFilter::Processing => write!(f, "processing"),
            StatusFilter::Completed => write!(f, "completed"),
            StatusFilter::Open => write!(f, "open"),
            StatusFilter::All => write!(f, "all"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::Submitted.matches(&Status::Submitted));
        assert!(!StatusFilter::Submitted.matches(&Status::Processing));

        assert!(StatusFilter::Open.matches(&Status::Submitted));
        assert!(StatusFilter::Open.matches(&Status::Processing));
        assert!(!StatusFilter::Open.matches(&Status::Completed));

        assert!(StatusFilter::All.matches(&Status::Completed));
    }

    #[test]
    fn test_exact_pushdown() {
        assert_eq!(StatusFilter::Processing.exact(), Some(Status::Processing));
        assert_eq!(StatusFilter::Open.exact(), None);
        assert_eq!(StatusFilter::All.exact(), None);
    }
}
