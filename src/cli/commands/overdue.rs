//! `hrsd overdue` command - Requests past their SLA deadline

use chrono::{DateTime, Utc};
use console::style;
use miette::Result;

use crate::cli::helpers::open_desk;
use crate::cli::output::{format_dt, format_short_id, truncate_str};
use crate::core::sla;

#[derive(clap::Args, Debug)]
pub struct OverdueArgs {
    /// Evaluation instant, RFC 3339 (defaults to now)
    #[arg(long, value_name = "TIMESTAMP")]
    pub as_of: Option<String>,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

/// Run the overdue command
pub fn run(args: OverdueArgs) -> Result<()> {
    let desk = open_desk()?;

    let as_of: DateTime<Utc> = match args.as_of {
        Some(ref raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| miette::miette!("Invalid --as-of timestamp '{}': {}", raw, e))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let report = sla::sweep(&desk.store, as_of).map_err(|e| miette::miette!("{}", e))?;

    if args.count {
        println!("{}", report.len());
        return Ok(());
    }

    if report.is_empty() {
        println!("Nothing overdue as of {}.", format_dt(as_of));
        return Ok(());
    }

    println!(
        "{:<16} {:<36} {:<22} {:<16} {:>10}",
        style("ID").bold(),
        style("SUMMARY").bold(),
        style("ASSIGNEE").bold(),
        style("DUE").bold(),
        style("LATE").bold()
    );
    println!("{}", "-".repeat(104));
    for request in &report.requests {
        let late = report.lateness(request);
        println!(
            "{:<16} {:<36} {:<22} {:<16} {:>9}h",
            format_short_id(&request.id),
            truncate_str(&request.summary, 34),
            truncate_str(&request.assignee, 20),
            style(format_dt(request.due_at)).red(),
            late.num_hours()
        );
    }
    println!("\n{} overdue request(s)", report.len());

    Ok(())
}
