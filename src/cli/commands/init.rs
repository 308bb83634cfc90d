//! `hrsd init` command - Initialize a portal

use std::path::PathBuf;
use std::sync::Arc;

use console::style;
use miette::Result;

use crate::core::config::Config;
use crate::core::portal::Portal;
use crate::core::store::RequestStore;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Company name recorded in the portal config
    #[arg(long)]
    pub company: Option<String>,
}

/// Run the init command
pub fn run(args: InitArgs) -> Result<()> {
    let portal = Portal::init(&args.path).map_err(|e| miette::miette!("{}", e))?;

    let mut config = Config::default();
    if let Some(company) = args.company {
        config.company_name = company;
    }
    config
        .save(&portal)
        .map_err(|e| miette::miette!("Failed to write config: {}", e))?;

    // Create the database up front so the first command after init
    // doesn't pay schema setup
    let registry = config
        .registry()
        .map_err(|e| miette::miette!("{}", e))?;
    RequestStore::open(&portal.db_path(), Arc::new(registry))
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Initialized portal for {} at {}",
        style("✓").green().bold(),
        style(&config.company_name).bold(),
        portal.root().display()
    );
    println!("  config:   {}", portal.config_path().display());
    println!("  database: {}", portal.db_path().display());

    Ok(())
}
