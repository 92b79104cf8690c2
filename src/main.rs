use clap::{CommandFactory, Parser};
use netmon::cli::{Cli, Commands};
use netmon::error::{DiagError, DiagResult};
use netmon::output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // No subcommand: print usage and exit cleanly.
    let Some(command) = cli.command else {
        output::print_banner();
        Cli::command().print_help().ok();
        return;
    };

    if !cli.quiet {
        output::print_banner();
    }

    let result = tokio::select! {
        result = dispatch(&command, cli.verbose, cli.quiet) => result,
        _ = tokio::signal::ctrl_c() => Err(DiagError::Interrupted),
    };

    if let Err(e) = result {
        match e {
            DiagError::Interrupted => output::print_cancelled(),
            other => output::print_error(&other.to_string()),
        }
        std::process::exit(1);
    }
}

async fn dispatch(command: &Commands, verbose: bool, quiet: bool) -> DiagResult<()> {
    match command {
        Commands::Ping(cmd) => cmd.execute(verbose, quiet).await,
        Commands::Dns(cmd) => cmd.execute(verbose, quiet).await,
        Commands::Scan(cmd) => cmd.execute(verbose, quiet).await,
        Commands::Traceroute(cmd) => cmd.execute(verbose, quiet).await,
    }
}
