//! `transync` command-line host.
//!
//! # Responsibility
//! - Expose decode/encode, status and bulk dispatch to scripts and operators.
//! - Print machine-readable JSON on stdout; diagnostics go to the log files.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use transync_core::db::open_db;
use transync_core::{
    decode_file, default_log_level, encode, init_logging, DispatchError, DispatchRouter, ItemId,
    SqliteGroupResolver, SqliteJobLedger, StatusService, StructuredContent, SyncConfig,
};

#[derive(Debug, Parser)]
#[command(name = "transync", version, about = "Translation sync tooling", long_about = None)]
struct Cli {
    #[command(flatten)]
    logging: LogArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct LogArgs {
    /// Absolute directory for rolling log files; logging stays off without it
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode an interchange file and print its content as JSON
    Decode { file: PathBuf },
    /// Encode a content JSON file as an interchange document
    Encode { json_file: PathBuf },
    /// Print the row state, or one column state, of a content item
    Status {
        /// Snapshot database; defaults to `database_path` from `--config`
        #[arg(long)]
        db: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        item: ItemId,
        #[arg(long)]
        locale: Option<String>,
    },
    /// Route a bulk action for the selected items
    Dispatch {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        action: String,
        #[arg(long, value_delimiter = ',')]
        ids: Vec<ItemId>,
    },
    /// List the bulk actions offered for the active configuration
    Menu {
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

impl Command {
    fn config_path(&self) -> Option<&Path> {
        match self {
            Self::Status { config, .. } => config.as_deref(),
            Self::Dispatch { config, .. } | Self::Menu { config } => Some(config.as_path()),
            Self::Decode { .. } | Self::Encode { .. } => None,
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.command.config_path().map(load_config).transpose()?;
    if let Some((level, dir)) = log_target(&cli.logging, config.as_ref()) {
        init_logging(&level, dir).map_err(anyhow::Error::msg)?;
    }

    match cli.command {
        Command::Decode { file } => {
            let content = decode_file(&file)
                .with_context(|| format!("failed to decode `{}`", file.display()))?;
            print_json(&content)
        }
        Command::Encode { json_file } => {
            let raw = std::fs::read_to_string(&json_file)
                .with_context(|| format!("failed to read `{}`", json_file.display()))?;
            let content: StructuredContent =
                serde_json::from_str(&raw).context("invalid content json")?;
            println!("{}", encode(&content)?);
            Ok(())
        }
        Command::Status {
            db, item, locale, ..
        } => {
            let db = snapshot_path(db, config.as_ref())?;
            status(&db, item, locale.as_deref())
        }
        Command::Dispatch { action, ids, .. } => dispatch(require(config)?, &action, &ids),
        Command::Menu { .. } => {
            let config = require(config)?;
            let router = DispatchRouter::from_config(&config)?;
            print_json(&router.menu())
        }
    }
}

/// Level and directory for file logs: CLI flags first, then the config file.
fn log_target(args: &LogArgs, config: Option<&SyncConfig>) -> Option<(String, PathBuf)> {
    let settings = config.and_then(|config| config.logging.as_ref());
    let dir = args
        .log_dir
        .clone()
        .or_else(|| settings.map(|settings| settings.dir.clone()))?;
    let level = args
        .log_level
        .clone()
        .or_else(|| settings.map(|settings| settings.level.clone()))
        .unwrap_or_else(|| default_log_level().to_string());
    Some((level, dir))
}

/// Snapshot database to open: `--db` wins over the configured path.
fn snapshot_path(explicit: Option<PathBuf>, config: Option<&SyncConfig>) -> Result<PathBuf> {
    match explicit.or_else(|| config.and_then(|config| config.database_path.clone())) {
        Some(path) => Ok(path),
        None => bail!("no snapshot database: pass --db or set database_path in --config"),
    }
}

fn require(config: Option<SyncConfig>) -> Result<SyncConfig> {
    config.context("command requires a configuration file")
}

fn status(db: &Path, item: ItemId, locale: Option<&str>) -> Result<()> {
    if !db.is_file() {
        bail!("snapshot database `{}` does not exist", db.display());
    }
    let conn =
        open_db(db).with_context(|| format!("failed to open snapshot `{}`", db.display()))?;
    let service = StatusService::new(
        SqliteGroupResolver::new(&conn),
        SqliteJobLedger::new(&conn),
    );

    if let Some(locale) = locale {
        let state = service.locale_status(item, locale)?;
        return print_json(&state);
    }

    let row = service.row_status(item)?;
    let route = row.route();
    print_json(&serde_json::json!({ "row": row, "route": route }))
}

fn dispatch(config: SyncConfig, action: &str, ids: &[ItemId]) -> Result<()> {
    let router = DispatchRouter::from_config(&config)?;
    let request = match router.parse(action, ids) {
        Ok(request) => request,
        Err(DispatchError::NotOurs) => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    info!(
        "event=cli_dispatch module=cli status=ok action={action} items={}",
        ids.len()
    );
    let route = request.route(&config)?;
    print_json(&serde_json::json!({ "request": request, "route": route }))
}

fn load_config(path: &Path) -> Result<SyncConfig> {
    SyncConfig::load(path).with_context(|| format!("failed to load config `{}`", path.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{log_target, snapshot_path, LogArgs};
    use std::path::PathBuf;
    use transync_core::SyncConfig;

    fn config() -> SyncConfig {
        SyncConfig::from_json_str(
            r#"{
                "project_options_id": "po-1",
                "pairings": { "po-1": { "source": "en-US", "targets": ["de-DE"] } },
                "database_path": "/srv/host.sqlite3",
                "logging": { "level": "warn", "dir": "/var/log/transync" }
            }"#,
        )
        .unwrap()
    }

    fn no_flags() -> LogArgs {
        LogArgs {
            log_dir: None,
            log_level: None,
        }
    }

    #[test]
    fn configured_database_is_used_without_db_flag() {
        let config = config();
        assert_eq!(
            snapshot_path(None, Some(&config)).unwrap(),
            PathBuf::from("/srv/host.sqlite3")
        );
        let explicit = PathBuf::from("/tmp/other.sqlite3");
        assert_eq!(
            snapshot_path(Some(explicit.clone()), Some(&config)).unwrap(),
            explicit
        );
        assert!(snapshot_path(None, None).is_err());
    }

    #[test]
    fn configured_logging_applies_when_flags_are_absent() {
        let config = config();
        assert_eq!(
            log_target(&no_flags(), Some(&config)),
            Some(("warn".to_string(), PathBuf::from("/var/log/transync")))
        );

        let flags = LogArgs {
            log_dir: Some(PathBuf::from("/tmp/logs")),
            log_level: Some("debug".to_string()),
        };
        assert_eq!(
            log_target(&flags, Some(&config)),
            Some(("debug".to_string(), PathBuf::from("/tmp/logs")))
        );
        assert_eq!(log_target(&no_flags(), None), None);
    }
}
