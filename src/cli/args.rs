//! Top-level CLI definition

use clap::{Parser, Subcommand};

use crate::cli::commands::assign::{ReassignArgs, RecategorizeArgs};
use crate::cli::commands::attach::{AttachArgs, FetchArgs};
use crate::cli::commands::chat::ChatArgs;
use crate::cli::commands::history::HistoryArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::list::ListArgs;
use crate::cli::commands::new::NewArgs;
use crate::cli::commands::overdue::OverdueArgs;
use crate::cli::commands::show::ShowArgs;
use crate::cli::commands::workflow::TransitionArgs;

/// HR service desk: categorized requests, auto-routing, SLA tracking
#[derive(Parser, Debug)]
#[command(name = "hrsd", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a portal in the current directory
    Init(InitArgs),

    /// Submit a new request
    New(NewArgs),

    /// Show a request's details
    Show(ShowArgs),

    /// List requests with filtering
    List(ListArgs),

    /// Move a submitted request into review
    Review(TransitionArgs),

    /// Start processing a reviewed request
    Start(TransitionArgs),

    /// Complete a request being processed
    Complete(TransitionArgs),

    /// Bounce a request one step back (missing info, rework)
    Bounce(TransitionArgs),

    /// Hand a request to a different assignee
    Reassign(ReassignArgs),

    /// Change a request's category and recompute its deadline
    Recategorize(RecategorizeArgs),

    /// List requests past their SLA deadline
    Overdue(OverdueArgs),

    /// Show a request's audit trail
    History(HistoryArgs),

    /// Attach a file to a request
    Attach(AttachArgs),

    /// Save an attachment back to disk
    Fetch(FetchArgs),

    /// Ask the HR chat assistant
    Chat(ChatArgs),
}
