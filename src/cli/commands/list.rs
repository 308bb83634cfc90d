//! `hrsd list` command - List requests with filtering

use chrono::Utc;
use miette::Result;

use crate::cli::filters::StatusFilter;
use crate::cli::helpers::{open_desk, parse_category};
use crate::cli::output::{print_list_header, print_list_row};
use crate::core::store::RequestFilter;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', value_enum, default_value_t = StatusFilter::Open)]
    pub status: StatusFilter,

    /// Filter by category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Filter by assignee (exact match)
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// Only requests past their due date
    #[arg(long)]
    pub overdue: bool,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

/// Run the list command
pub fn run(args: ListArgs) -> Result<()> {
    let desk = open_desk()?;

    let category = match args.category {
        Some(ref s) => Some(parse_category(s)?),
        None => None,
    };

    let filter = RequestFilter {
        status: args.status.exact(),
        category,
        assignee: args.assignee.clone(),
        overdue_only: args.overdue,
        as_of: None,
    };

    let now = Utc::now();
    let requests: Vec<_> = desk
        .store
        .list(&filter)
        .map_err(|e| miette::miette!("{}", e))?
        .into_iter()
        .filter(|r| args.status.matches(&r.status))
        .collect();

    if args.count {
        println!("{}", requests.len());
        return Ok(());
    }

    if requests.is_empty() {
        println!("No requests match.");
        return Ok(());
    }

    print_list_header();
    for request in &requests {
        print_list_row(request, now);
    }
    println!("\n{} request(s)", requests.len());

    Ok(())
}
