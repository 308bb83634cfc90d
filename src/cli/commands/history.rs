//! `hrsd history` command - Show a request's audit trail

use console::style;
use miette::Result;

use crate::cli::helpers::{open_desk, resolve_request};
use crate::cli::output::format_dt;

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Request id or unique prefix
    pub reference: String,
}

/// Run the history command
pub fn run(args: HistoryArgs) -> Result<()> {
    let desk = open_desk()?;
    let id = resolve_request(&desk, &args.reference)?;

    // Confirm the request exists before printing an empty trail
    let request = desk.store.get(&id).map_err(|e| miette::miette!("{}", e))?;
    let entries = desk.store.audit(&id).map_err(|e| miette::miette!("{}", e))?;

    println!("{}  {}", style(&request.id).bold(), request.summary);
    if entries.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    for entry in &entries {
        let change = if entry.old_status == entry.new_status {
            entry.new_status.to_string()
        } else {
            format!("{} -> {}", entry.old_status, entry.new_status)
        };
        let note = entry
            .note
            .as_deref()
            .map(|n| format!("  ({})", n))
            .unwrap_or_default();
        println!(
            "  {}  {:<13} {:<28} by {}{}",
            format_dt(entry.at),
            entry.action,
            change,
            entry.actor,
            note
        );
    }

    Ok(())
}
