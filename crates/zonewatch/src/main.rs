//! `zwatch` - CLI for zonewatch
//!
//! This binary is the in-scope transport over the zone-time aggregation
//! layer: it loads occupancy records from storage, runs the summary
//! operations, and prints the results as text or JSON.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;

use anyhow::Context;
use chrono::Duration;
use clap::Parser;
use tracing::warn;

use zonewatch::aggregate::{flatten_to_mapping, summarize_all, summarize_by_person, PersonSummary};
use zonewatch::cli::{Cli, Command, ConfigCommand, ImportCommand, ImportFormat, PruneCommand};
use zonewatch::{init_logging, Config, Storage, ZoneRecord};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Persons(cmd) => handle_persons(&config, cmd.json),
        Command::Zones(cmd) => handle_zones(&config, cmd.pretty),
        Command::Person(cmd) => handle_person(&config, &cmd.id, cmd.json),
        Command::Import(cmd) => handle_import(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Prune(cmd) => handle_prune(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Open storage at the configured path, applying start-up retention if
/// the configuration asks for it.
fn open_storage(config: &Config) -> anyhow::Result<Storage> {
    let storage = Storage::open(config.database_path())
        .with_context(|| format!("cannot open {}", config.database_path().display()))?;

    if config.storage.prune_on_open {
        if let Some(max_age) = config.max_age() {
            storage.prune_older_than(max_age)?;
        }
    }

    Ok(storage)
}

fn handle_persons(config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let records = storage.fetch_all()?;
    let summaries = summarize_all(&records)?;

    if summaries.is_empty() {
        if json {
            println!("{}", serde_json::json!({ "persons": [] }));
        } else {
            println!("No occupancy data recorded yet.");
        }
        return Ok(());
    }

    if json {
        let payload = serde_json::json!({ "persons": summaries });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for summary in &summaries {
            print_summary(summary);
            println!();
        }
    }
    Ok(())
}

fn handle_zones(config: &Config, pretty: bool) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let records = storage.fetch_all()?;
    let mapping = flatten_to_mapping(&records)?;

    if pretty {
        println!("{}", serde_json::to_string_pretty(&mapping)?);
    } else {
        println!("{}", serde_json::to_string(&mapping)?);
    }
    Ok(())
}

fn handle_person(config: &Config, person_id: &str, json: bool) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let records = storage.fetch_for_person(person_id)?;
    let summary = summarize_by_person(&records, person_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
        println!();
        println!("History ({} entries):", summary.entries.len());
        for entry in &summary.entries {
            println!(
                "  {}  desk1={}s desk2={}s meeting={}s break={}s movement={}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.zone_times.desk1,
                entry.zone_times.desk2,
                entry.zone_times.meeting,
                entry.zone_times.break_area,
                entry.movement_time,
            );
        }
    }
    Ok(())
}

fn print_summary(summary: &PersonSummary) {
    println!("Person {}", summary.person_id);
    println!("  Desk 1:     {}s", summary.totals.desk1);
    println!("  Desk 2:     {}s", summary.totals.desk2);
    println!("  Meeting:    {}s", summary.totals.meeting);
    println!("  Break:      {}s", summary.totals.break_area);
    println!("  Movement:   {}", summary.totals.movement_time);
    println!("  Records:    {}", summary.entries.len());
}

fn handle_import(config: &Config, cmd: &ImportCommand) -> anyhow::Result<()> {
    let content = fs::read_to_string(&cmd.file)
        .with_context(|| format!("cannot read {}", cmd.file.display()))?;

    let records: Vec<ZoneRecord> = match cmd.format {
        ImportFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of records", cmd.file.display()))?,
        ImportFormat::Jsonl => content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("{} is not valid JSONL", cmd.file.display()))?,
    };

    // Reject mode fails the whole file before any row is written.
    if config.ingest.reject_invalid {
        for record in &records {
            record.validate()?;
        }
    }

    let storage = open_storage(config)?;
    let mut inserted = 0usize;
    let mut skipped = 0usize;
    for record in &records {
        match record.validate() {
            Ok(()) => {
                storage.insert(record)?;
                inserted += 1;
            }
            Err(err) => {
                warn!(%err, "Skipping invalid record");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        println!("Imported {inserted} records ({skipped} skipped).");
    } else {
        println!("Imported {inserted} records.");
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "total_records": stats.total_records,
            "distinct_persons": stats.distinct_persons,
            "oldest_record": stats.oldest_record,
            "newest_record": stats.newest_record,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("zwatch status");
        println!("-------------");
        println!("Database:      {}", storage.path().display());
        println!("Records:       {}", stats.total_records);
        println!("Persons:       {}", stats.distinct_persons);
        match (stats.oldest_record, stats.newest_record) {
            (Some(oldest), Some(newest)) => {
                println!("Oldest:        {}", oldest.format("%Y-%m-%d %H:%M:%S"));
                println!("Newest:        {}", newest.format("%Y-%m-%d %H:%M:%S"));
            }
            _ => println!("Range:         (empty)"),
        }
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_prune(config: &Config, cmd: &PruneCommand) -> anyhow::Result<()> {
    let days = cmd.max_age_days.unwrap_or(config.storage.max_age_days);
    if days == 0 {
        anyhow::bail!("no retention age set; pass --max-age-days or set storage.max_age_days");
    }

    if !cmd.yes {
        println!("This will delete records older than {days} days.");
        println!("Use --yes to confirm.");
        return Ok(());
    }

    let storage = open_storage(config)?;
    let pruned = storage.prune_older_than(Duration::days(i64::from(days)))?;
    println!("Pruned {pruned} records older than {days} days.");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Max age (days): {}", config.storage.max_age_days);
                println!("  Prune on open:  {}", config.storage.prune_on_open);
                println!();
                println!("[Ingest]");
                println!("  Reject invalid: {}", config.ingest.reject_invalid);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
