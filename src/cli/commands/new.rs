//! `hrsd new` command - Submit a new request
//!
//! Flags cover scripted use; missing intake fields fall back to an
//! interactive wizard.

use std::path::PathBuf;

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_desk, parse_category};
use crate::cli::output::print_request;
use crate::core::blob::FsBlobStore;
use crate::core::category::Category;
use crate::core::request::RequestDraft;

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Short summary of the request
    pub summary: Option<String>,

    /// Request category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Full request text
    #[arg(long, short = 'd')]
    pub details: Option<String>,

    /// Submitter's employee id
    #[arg(long)]
    pub employee_id: Option<String>,

    /// Submitter's name
    #[arg(long, short = 'n')]
    pub employee_name: Option<String>,

    /// Submitter's department
    #[arg(long)]
    pub department: Option<String>,

    /// File(s) to attach (repeatable)
    #[arg(long, value_name = "FILE")]
    pub attach: Vec<PathBuf>,
}

/// Run the new command
pub fn run(args: NewArgs) -> Result<()> {
    let desk = open_desk()?;
    let theme = ColorfulTheme::default();

    let category = match args.category {
        Some(ref s) => parse_category(s)?,
        None => {
            let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
            let picked = Select::with_theme(&theme)
                .with_prompt("Category")
                .items(&labels)
                .default(0)
                .interact()
                .into_diagnostic()?;
            Category::ALL[picked]
        }
    };

    let summary = match args.summary {
        Some(s) => s,
        None => Input::with_theme(&theme)
            .with_prompt("Summary")
            .interact_text()
            .into_diagnostic()?,
    };

    let employee_name = match args.employee_name {
        Some(n) => n,
        None => Input::with_theme(&theme)
            .with_prompt("Your name")
            .interact_text()
            .into_diagnostic()?,
    };

    let draft = RequestDraft {
        category,
        summary,
        details: args.details.unwrap_or_default(),
        employee_id: args.employee_id.unwrap_or_default(),
        employee_name,
        department: args.department.unwrap_or_default(),
    };

    let mut request = desk
        .store
        .create(draft)
        .map_err(|e| miette::miette!("{}", e))?;

    if !args.attach.is_empty() {
        let blobs = FsBlobStore::new(desk.portal.uploads_dir());
        for path in &args.attach {
            let blob_ref = blobs
                .put_file(path)
                .map_err(|e| miette::miette!("{}", e))?;
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            request = desk
                .store
                .add_attachment(&request.id, &blob_ref, &filename)
                .map_err(|e| miette::miette!("{}", e))?;
        }
    }

    println!(
        "{} Submitted {} (assigned to {}, due {})",
        style("✓").green().bold(),
        style(&request.id).bold(),
        request.assignee,
        request.due_at.format("%Y-%m-%d %H:%M")
    );
    print_request(&request, chrono::Utc::now());

    Ok(())
}
