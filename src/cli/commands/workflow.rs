//! Workflow transition commands - review, start, complete, bounce
//!
//! Each verb targets one fixed status; `bounce` derives its target from
//! the request's current status. Illegal edges surface as errors from
//! the store, never as silent no-ops.

use console::style;
use miette::Result;

use crate::cli::helpers::{open_desk, resolve_request, Desk};
use crate::cli::output::styled_status;
use crate::core::request::{RequestId, Status};
use crate::core::workflow::WorkflowEngine;

#[derive(clap::Args, Debug)]
pub struct TransitionArgs {
    /// Request id or unique prefix
    pub reference: String,

    /// Actor recorded in the audit trail
    #[arg(long)]
    pub actor: Option<String>,
}

/// Move a submitted request into review
pub fn run_review(args: TransitionArgs) -> Result<()> {
    transition_to(args, Status::UnderReview)
}

/// Start processing a reviewed request
pub fn run_start(args: TransitionArgs) -> Result<()> {
    transition_to(args, Status::Processing)
}

/// Complete a request being processed
pub fn run_complete(args: TransitionArgs) -> Result<()> {
    transition_to(args, Status::Completed)
}

/// Bounce a request one step back
pub fn run_bounce(args: TransitionArgs) -> Result<()> {
    let desk = open_desk()?;
    let id = resolve_request(&desk, &args.reference)?;

    let current = desk
        .store
        .get(&id)
        .map_err(|e| miette::miette!("{}", e))?
        .status;
    let target = WorkflowEngine::new().bounce_back(current).ok_or_else(|| {
        miette::miette!("Cannot bounce a request in status '{}'", current)
    })?;

    apply(&desk, &id, target, args.actor)
}

fn transition_to(args: TransitionArgs, target: Status) -> Result<()> {
    let desk = open_desk()?;
    let id = resolve_request(&desk, &args.reference)?;
    apply(&desk, &id, target, args.actor)
}

fn apply(desk: &Desk, id: &RequestId, target: Status, actor: Option<String>) -> Result<()> {
    let actor = desk.config.actor(actor);
    let request = desk
        .store
        .update_status(id, target, &actor)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} {} is now {}",
        style("✓").green().bold(),
        style(&request.id).bold(),
        styled_status(request.status)
    );
    if let Some(completed_at) = request.completed_at {
        if request.status == Status::Completed {
            println!("  completed at {}", completed_at.format("%Y-%m-%d %H:%M"));
        }
    }

    Ok(())
}
