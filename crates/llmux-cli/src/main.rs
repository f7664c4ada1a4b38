//! `llmux` binary entry point.

use clap::{CommandFactory, Parser};

use llmux_cli::{Cli, Commands, handlers, init_logging, load_env};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve(args) => handlers::serve::execute(args.into()).await?,
        Commands::Providers { providers } => handlers::providers::execute(&providers)?,
    }

    Ok(())
}
