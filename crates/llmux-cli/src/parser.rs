//! Root CLI parser.

use clap::Parser;

use crate::commands::Commands;

/// Multi-provider LLM gateway with session transcript capture.
#[derive(Parser)]
#[command(name = "llmux")]
#[command(about = "Route LLM API calls to multiple providers and record session transcripts")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_args() {
        let cli = Cli::parse_from([
            "llmux",
            "serve",
            "--verbose",
            "--host",
            "127.0.0.1",
            "--port",
            "4100",
            "--providers",
            "/etc/llmux/providers.json",
            "--logs-dir",
            "/var/log/llmux",
            "--models-timeout-secs",
            "3",
        ]);
        assert!(cli.verbose);
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 4100);
        assert_eq!(args.providers, PathBuf::from("/etc/llmux/providers.json"));
        assert_eq!(args.logs_dir, PathBuf::from("/var/log/llmux"));
        assert_eq!(args.models_timeout_secs, 3);
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["llmux", "serve"]);
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.models_timeout_secs, 10);
    }

    #[test]
    fn test_no_command() {
        let cli = Cli::parse_from(["llmux"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Cli::try_parse_from(["llmux", "serve", "--port", "70000"]).is_err());
    }
}
