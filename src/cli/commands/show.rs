//! `hrsd show` command - Display one request

use chrono::Utc;
use miette::Result;

use crate::cli::helpers::{open_desk, resolve_request};
use crate::cli::output::print_request;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Request id or unique prefix
    pub reference: String,
}

/// Run the show command
pub fn run(args: ShowArgs) -> Result<()> {
    let desk = open_desk()?;
    let id = resolve_request(&desk, &args.reference)?;
    let request = desk.store.get(&id).map_err(|e| miette::miette!("{}", e))?;

    print_request(&request, Utc::now());
    Ok(())
}
