use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use tally_ledger::VoteLedger;
use tally_server::{ServerConfig, TallyServer};
use tally_store::{DocumentStore, FileDocumentStore};
use tally_types::VoteRecord;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::Rating(args) => cmd_rating(&config, args).await,
        Command::History(args) => cmd_history(&config, args).await,
        Command::Verify(args) => cmd_verify(&config, args).await,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env().context("applying environment overrides")?;
    tracing::debug!(bind = %config.bind_addr, cooldown_ms = config.cooldown_ms, "configuration loaded");
    Ok(config)
}

fn open_ledger(config: &ServerConfig, source: &SourceArgs) -> anyhow::Result<VoteLedger> {
    let store: Arc<dyn DocumentStore> = match &source.file {
        Some(path) => Arc::new(FileDocumentStore::new(path)),
        None => config.store.open()?,
    };
    Ok(VoteLedger::new(store).with_cooldown_ms(config.cooldown_ms))
}

async fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    println!("{} Tally server on {}", "▶".green().bold(), config.bind_addr.to_string().bold());
    TallyServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_rating(config: &ServerConfig, args: RatingArgs) -> anyhow::Result<()> {
    let ledger = open_ledger(config, &args.source)?;
    let summary = ledger.rating(&args.item).await?;
    println!(
        "{}  rating {}  ({} votes)",
        args.item.yellow().bold(),
        format_rating(summary.rating),
        summary.votes.to_string().bold()
    );
    Ok(())
}

async fn cmd_history(config: &ServerConfig, args: HistoryArgs) -> anyhow::Result<()> {
    let ledger = open_ledger(config, &args.source)?;
    let history = ledger.history(&args.item).await?;
    if history.is_empty() {
        println!("No votes on {}.", args.item.yellow());
        return Ok(());
    }

    println!("{} ({} votes)", args.item.yellow().bold(), history.len());
    for record in history.iter().rev().take(args.limit) {
        println!("  {}", format_record(record));
    }
    Ok(())
}

async fn cmd_verify(config: &ServerConfig, args: VerifyArgs) -> anyhow::Result<()> {
    let ledger = open_ledger(config, &args.source)?;
    let violations = ledger.verify().await?;
    if violations.is_empty() {
        let document = ledger.store().load().await?.document;
        println!(
            "{} Document consistent: {} items, {} votes ({}).",
            "✓".green().bold(),
            document.item_count(),
            document.total_votes(),
            ledger.store().describe()
        );
        return Ok(());
    }

    for v in &violations {
        println!("  {} {} {:?}: {}", "✗".red(), v.item_id.yellow(), v.kind, v.description);
    }
    bail!("{} violation(s) found", violations.len())
}

fn format_rating(rating: i64) -> ColoredString {
    let text = format!("{rating:+}");
    match rating.signum() {
        1 => text.green(),
        -1 => text.red(),
        _ => text.normal(),
    }
}

fn format_timestamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("{ms} ms"))
}

fn format_record(record: &VoteRecord) -> String {
    format!(
        "{}  {}  {}  from {}",
        format_timestamp(record.timestamp_ms).dimmed(),
        format_rating(record.direction.delta()),
        record.voter,
        record.source_address
    )
}
