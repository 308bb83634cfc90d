//! hrsd: HR Service Desk
//!
//! A command-line portal for categorized HR service requests: intake with
//! automatic owner routing and SLA deadlines, a fixed status workflow, and
//! an append-only audit trail persisted in a single SQLite database.

pub mod cli;
pub mod core;
