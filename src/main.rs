use clap::Parser;
use hrsd::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => hrsd::cli::commands::init::run(args),
        Commands::New(args) => hrsd::cli::commands::new::run(args),
        Commands::Show(args) => hrsd::cli::commands::show::run(args),
        Commands::List(args) => hrsd::cli::commands::list::run(args),
        Commands::Review(args) => hrsd::cli::commands::workflow::run_review(args),
        Commands::Start(args) => hrsd::cli::commands::workflow::run_start(args),
        Commands::Complete(args) => hrsd::cli::commands::workflow::run_complete(args),
        Commands::Bounce(args) => hrsd::cli::commands::workflow::run_bounce(args),
        Commands::Reassign(args) => hrsd::cli::commands::assign::run_reassign(args),
        Commands::Recategorize(args) => hrsd::cli::commands::assign::run_recategorize(args),
        Commands::Overdue(args) => hrsd::cli::commands::overdue::run(args),
        Commands::History(args) => hrsd::cli::commands::history::run(args),
        Commands::Attach(args) => hrsd::cli::commands::attach::run_attach(args),
        Commands::Fetch(args) => hrsd::cli::commands::attach::run_fetch(args),
        Commands::Chat(args) => hrsd::cli::commands::chat::run(args),
    }
}
