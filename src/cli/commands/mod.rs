//! CLI command implementations

pub mod assign;
pub mod attach;
pub mod chat;
pub mod history;
pub mod init;
pub mod list;
pub mod new;
pub mod overdue;
pub mod show;
pub mod workflow;
