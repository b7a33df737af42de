//! Profile Backup - Main entry point
//!
//! Backs up or restores browser profiles for every user on this workstation.

use anyhow::Result;
use clap::{Parser, Subcommand};
use profile_backup::config::Config;
use profile_backup::host::HostIdentity;
use profile_backup::platform::{CommandPermissionResetter, StatvfsSpaceProbe};
use profile_backup::report::Summary;
use profile_backup::sync::Direction;
use profile_backup::{utils, BackupOrchestrator, RestoreOrchestrator, RunContext};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Use this host identity instead of the system hostname
    #[arg(long, value_name = "NAME")]
    host: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy local browser profiles to the share
    Backup {
        /// Only process these users
        #[arg(short, long = "user", value_name = "NAME")]
        users: Vec<String>,
    },
    /// Copy browser profiles from the share back to this machine
    Restore {
        /// Only process these users
        #[arg(short, long = "user", value_name = "NAME")]
        users: Vec<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };
    config.apply_env_overrides();
    config.validate()?;

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level, config.log.file_target())?;

    let host = HostIdentity::resolve(args.host.as_deref(), config.host.require_site_prefix)?;

    let (direction, users) = match args.command {
        Command::Backup { users } => (Direction::ToBackup, users),
        Command::Restore { users } => (Direction::FromBackup, users),
    };

    let run_id = uuid::Uuid::new_v4();
    let started_at = chrono::Utc::now();
    let _span = tracing::info_span!("run", %run_id, host = %host.hostname).entered();

    tracing::info!(
        "Starting profile {} v{} (host: {}, site: {})",
        direction.verb(),
        env!("CARGO_PKG_VERSION"),
        host.hostname,
        host.site.as_deref().unwrap_or("-")
    );

    let ctx = RunContext::from_config(&config, host, users);

    let result = match direction {
        Direction::ToBackup => BackupOrchestrator::new(&ctx).run(),
        Direction::FromBackup => {
            let resetter =
                CommandPermissionResetter::new(config.restore.permission_reset_command.clone());
            RestoreOrchestrator::new(&ctx, &StatvfsSpaceProbe, &resetter).run()
        }
    };

    let ledger = match result {
        Ok(ledger) => ledger,
        Err(e) if e.is_fatal() => {
            tracing::error!("Aborting {} before any report: {}", direction.verb(), e);
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!("Profile {} failed: {}", direction.verb(), e);
            return Err(e.into());
        }
    };

    let summary = Summary::from_ledger(&ledger, run_id, &ctx.host.hostname, direction, started_at);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for line in summary.lines() {
            println!("{line}");
        }
    }

    for failure in ledger.failures() {
        tracing::warn!(
            user = %failure.user,
            browser = %failure.browser,
            step = %failure.step,
            "{}",
            failure.reason
        );
    }

    tracing::info!(
        users = ledger.users().len(),
        successful = summary.fully_successful.len(),
        "Profile {} finished",
        direction.verb()
    );

    Ok(())
}
