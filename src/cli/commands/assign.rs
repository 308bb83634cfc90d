//! `hrsd reassign` and `hrsd recategorize` commands

use console::style;
use miette::Result;

use crate::cli::helpers::{open_desk, parse_category, resolve_request};
use crate::cli::output::format_dt;

#[derive(clap::Args, Debug)]
pub struct ReassignArgs {
    /// Request id or unique prefix
    pub reference: String,

    /// New responsible staff member or team
    pub assignee: String,

    /// Actor recorded in the audit trail
    #[arg(long)]
    pub actor: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RecategorizeArgs {
    /// Request id or unique prefix
    pub reference: String,

    /// New category
    pub category: String,

    /// Actor recorded in the audit trail
    #[arg(long)]
    pub actor: Option<String>,
}

/// Run the reassign command
pub fn run_reassign(args: ReassignArgs) -> Result<()> {
    let desk = open_desk()?;
    let id = resolve_request(&desk, &args.reference)?;
    let actor = desk.config.actor(args.actor);

    let request = desk
        .store
        .reassign(&id, &args.assignee, &actor)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} {} reassigned to {} (due {} unchanged)",
        style("✓").green().bold(),
        style(&request.id).bold(),
        request.assignee,
        format_dt(request.due_at)
    );

    Ok(())
}

/// Run the recategorize command
pub fn run_recategorize(args: RecategorizeArgs) -> Result<()> {
    let desk = open_desk()?;
    let id = resolve_request(&desk, &args.reference)?;
    let category = parse_category(&args.category)?;
    let actor = desk.config.actor(args.actor);

    let request = desk
        .store
        .recategorize(&id, category, &actor)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} {} is now {} (due recomputed to {})",
        style("✓").green().bold(),
        style(&request.id).bold(),
        request.category.label(),
        format_dt(request.due_at)
    );

    Ok(())
}
