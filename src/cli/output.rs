//! Output formatting utilities

use chrono::{DateTime, Utc};
use console::style;

use crate::core::request::{Request, Status};

/// Truncate a string for fixed-width table columns
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Short display form of a request id (REQ- plus the first 8 ULID chars)
pub fn format_short_id(id: &crate::core::request::RequestId) -> String {
    let s = id.as_str();
    if s.len() > 12 {
        format!("{}...", &s[..12])
    } else {
        s.to_string()
    }
}

pub fn format_dt(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Status with the coloring used across all commands
pub fn styled_status(status: Status) -> String {
    match status {
        Status::Submitted => style(status).cyan().to_string(),
        Status::UnderReview => style(status).yellow().to_string(),
        Status::Processing => style(status).magenta().to_string(),
        Status::Completed => style(status).green().to_string(),
    }
}

/// Print one request in full
pub fn print_request(req: &Request, as_of: DateTime<Utc>) {
    println!("{}  {}", style(&req.id).bold(), styled_status(req.status));
    println!("  {:<12} {}", "summary:", req.summary);
    if !req.details.is_empty() {
        println!("  {:<12} {}", "details:", req.details);
    }
    println!("  {:<12} {}", "category:", req.category.label());
    println!("  {:<12} {}", "assignee:", req.assignee);
    if !req.employee_name.is_empty() {
        let who = if req.employee_id.is_empty() {
            req.employee_name.clone()
        } else {
            format!("{} ({})", req.employee_name, req.employee_id)
        };
        println!("  {:<12} {}", "requester:", who);
    }
    if !req.department.is_empty() {
        println!("  {:<12} {}", "department:", req.department);
    }
    println!("  {:<12} {}", "created:", format_dt(req.created_at));

    let due = if req.is_overdue(as_of) {
        style(format_dt(req.due_at)).red().bold().to_string()
    } else {
        format_dt(req.due_at)
    };
    println!("  {:<12} {}", "due:", due);

    if let Some(completed_at) = req.completed_at {
        println!("  {:<12} {}", "completed:", format_dt(completed_at));
    }
    if !req.attachments.is_empty() {
        println!("  {:<12}", "attachments:");
        for (i, att) in req.attachments.iter().enumerate() {
            println!(
                "    [{}] {} ({})",
                i,
                att.filename,
                truncate_str(&att.blob_ref, 12)
            );
        }
    }
}

/// Print the fixed-width header used by list-style commands
pub fn print_list_header() {
    println!(
        "{:<16} {:<24} {:<36} {:<14} {:<16}",
        style("ID").bold(),
        style("CATEGORY").bold(),
        style("SUMMARY").bold(),
        style("STATUS").bold(),
        style("DUE").bold()
    );
    println!("{}", "-".repeat(108));
}

/// Print one row in the list format
pub fn print_list_row(req: &Request, as_of: DateTime<Utc>) {
    let due = if req.is_overdue(as_of) {
        style(format_dt(req.due_at)).red().to_string()
    } else {
        format_dt(req.due_at)
    };
    println!(
        "{:<16} {:<24} {:<36} {:<14} {:<16}",
        format_short_id(&req.id),
        truncate_str(req.category.label(), 22),
        truncate_str(&req.summary, 34),
        req.status,
        due
    );
}
