use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tally", about = "Tally: item ratings with a per-voter cooldown", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Show the rating and vote count of an item
    Rating(RatingArgs),
    /// List the votes cast on an item, newest first
    History(HistoryArgs),
    /// Check the stored document for inconsistencies
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on, overriding the configuration
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

/// Read a local document instead of the configured store.
#[derive(Args, Clone, Debug, Default)]
pub struct SourceArgs {
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct RatingArgs {
    pub item: String,
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args)]
pub struct HistoryArgs {
    pub item: String,
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_history_with_file() {
        let cli = Cli::parse_from(["tally", "history", "a", "-n", "5", "--file", "v.json"]);
        match cli.command {
            Command::History(args) => {
                assert_eq!(args.item, "a");
                assert_eq!(args.limit, 5);
                assert_eq!(args.source.file, Some(PathBuf::from("v.json")));
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn parses_serve_bind() {
        let cli = Cli::parse_from(["tally", "--verbose", "serve", "--bind", "127.0.0.1:8080"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Serve(args) => assert_eq!(args.bind.unwrap().port(), 8080),
            _ => panic!("expected serve"),
        }
    }
}
