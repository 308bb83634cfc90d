//! `hrsd chat` command - Ask the HR assistant

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_desk;
use crate::core::assistant::{Assistant, GroqAssistant};

#[derive(clap::Args, Debug)]
pub struct ChatArgs {
    /// Question for the assistant (prompted for if omitted)
    pub message: Option<String>,
}

/// Run the chat command
pub fn run(args: ChatArgs) -> Result<()> {
    let desk = open_desk()?;

    let message = match args.message {
        Some(m) => m,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Ask HR")
            .interact_text()
            .into_diagnostic()?,
    };

    let assistant = GroqAssistant::from_env(desk.config.chat.model.clone())
        .map_err(|e| miette::miette!("{}", e))?;
    let reply = assistant
        .ask(&message)
        .map_err(|e| miette::miette!("{}", e))?;

    println!("{}", style("Assistant:").bold());
    println!("{}", reply);

    Ok(())
}
