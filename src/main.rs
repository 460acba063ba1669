use clap::Parser;
use ferney::cli::commands::add::AddArgs;
use ferney::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr; FERNEY_LOG takes EnvFilter directives.
    let filter = if cli.verbose {
        EnvFilter::new("ferney=debug")
    } else {
        EnvFilter::try_from_env("FERNEY_LOG").unwrap_or_else(|_| EnvFilter::new("error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Init => ferney::cli::commands::init::execute(&cli),
        Commands::Add {
            ref title,
            ref site,
            ref username,
            ref notes,
        } => ferney::cli::commands::add::execute(
            &cli,
            AddArgs {
                title: title.as_deref(),
                site: site.as_deref(),
                username: username.as_deref(),
                notes: notes.as_deref(),
            },
        ),
        Commands::View { ref title, json } => {
            ferney::cli::commands::view::execute(&cli, title, json)
        }
        Commands::List { json } => ferney::cli::commands::list::execute(&cli, json),
    };

    if let Err(e) = result {
        ferney::cli::output::error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}
