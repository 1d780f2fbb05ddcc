//! navcat CLI entry point.

use clap::Parser;
use navcat::cli::commands;
use navcat::cli::{Cli, Commands};
use navcat::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR non-TTY stdout
    let json = cli.json || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let db = cli.db.as_deref();
    let timeout = cli.busy_timeout;

    match &cli.command {
        Commands::Init => commands::init::execute(db, timeout, json),
        Commands::Status => commands::status::execute(db, timeout, json),
        Commands::Version => commands::version::execute(json),

        // Catalog
        Commands::Group { command } => commands::group::execute(command, db, timeout, json),
        Commands::Site { command } => commands::site::execute(command, db, timeout, json),
        Commands::Config { command } => commands::config::execute(command, db, timeout, json),

        // Envelope transfer
        Commands::Export { output } => {
            commands::export::execute(output.as_deref(), db, timeout, json)
        }
        Commands::Import { file } => commands::import::execute(file, db, timeout, json),

        // Auth
        Commands::Login(args) => commands::auth::login(args, json),
        Commands::Verify { token } => commands::auth::verify(token, json),

        // Shell completions
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
