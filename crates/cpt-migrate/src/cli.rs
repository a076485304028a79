//! Command line surface
//!
//! Every migration ships as its own executable taking no arguments, and the
//! umbrella `cpt-migrate` command lists and runs them by name. Both open the
//! configured directory store, run, print one audit line per mutated
//! document on stdout and exit non-zero on any failure.

use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use cpt_store::DirectoryStore;

use crate::catalog::MigrationName;
use crate::config::MigrateConfig;
use crate::runner::{FailurePolicy, MigrationReport, RunOptions, StdoutAudit};
use crate::telemetry::{init_tracing, LogFormat};
use crate::VERSION;

/// Open the configured store and run one migration
///
/// The store, and with it the database lock, is released before this
/// returns.
///
/// # Errors
/// Configuration, store and migration failures, with context
pub fn execute(name: MigrationName, options: RunOptions) -> anyhow::Result<MigrationReport> {
    let config = MigrateConfig::load().context("failed to load configuration")?;
    let database_dir = config.store.database_dir();
    let mut store = DirectoryStore::open(&config.store)
        .with_context(|| format!("failed to open database at {}", database_dir.display()))?;

    let report = name
        .run(&mut store, &config.seed, options, &mut StdoutAudit)
        .with_context(|| format!("{name} failed"))?;
    tracing::info!(
        migration = %name,
        scanned = report.scanned,
        migrated = report.migrated,
        unchanged = report.unchanged,
        failed = report.failed.len(),
        dry_run = report.dry_run,
        "run complete"
    );
    for failed in &report.failed {
        tracing::error!(key = %failed.key, error = %failed.error, "document not migrated");
    }
    Ok(report.into_result()?)
}

/// Entry point of a single-migration executable
pub fn standalone_main(name: MigrationName) -> ! {
    let _matches = Command::new(name.as_str())
        .version(VERSION)
        .about(name.description())
        .get_matches();

    init_tracing(LogFormat::from_env());
    exit_with(execute(name, RunOptions::new()))
}

/// Argument definition of the umbrella command
#[must_use]
pub fn command() -> Command {
    Command::new("cpt-migrate")
        .version(VERSION)
        .about("Maintenance migrations for the capacity-planning database")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List available migrations"))
        .subcommand(
            Command::new("run")
                .about("Run one migration")
                .arg(
                    Arg::new("name")
                        .required(true)
                        .value_parser(PossibleValuesParser::new(MigrationName::ALL.map(MigrationName::as_str)))
                        .help("Migration to run"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Report what would change without writing"),
                )
                .arg(
                    Arg::new("skip-failures")
                        .long("skip-failures")
                        .action(ArgAction::SetTrue)
                        .help("Continue past failing documents; still exits non-zero"),
                ),
        )
}

/// Options of a `run` invocation
///
/// # Errors
/// `MigrationError::UnknownMigration` if the name is not in the catalog
pub fn run_request(args: &ArgMatches) -> anyhow::Result<(MigrationName, RunOptions)> {
    let name = args
        .get_one::<String>("name")
        .map(String::as_str)
        .unwrap_or_default()
        .parse::<MigrationName>()?;
    let policy = if args.get_flag("skip-failures") {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Abort
    };
    let options = RunOptions::new()
        .with_dry_run(args.get_flag("dry-run"))
        .with_failure_policy(policy);
    Ok((name, options))
}

/// Entry point of the umbrella command
pub fn umbrella_main() -> ! {
    let matches = command().get_matches();

    match matches.subcommand() {
        Some(("list", _)) => {
            for name in MigrationName::ALL {
                println!("{:<26} {}", name.as_str(), name.description());
            }
            std::process::exit(0);
        }
        Some(("run", args)) => {
            init_tracing(LogFormat::from_env());
            exit_with(run_request(args).and_then(|(name, options)| execute(name, options)))
        }
        _ => {
            eprintln!("Unknown command. Use --help for usage.");
            std::process::exit(2);
        }
    }
}

fn exit_with(result: anyhow::Result<MigrationReport>) -> ! {
    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_flags() {
        let matches = command()
            .try_get_matches_from(["cpt-migrate", "run", "add-version-nr", "--dry-run", "--skip-failures"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let (name, options) = run_request(args).unwrap();

        assert_eq!(name, MigrationName::AddVersionNr);
        assert!(options.dry_run);
        assert_eq!(options.failure_policy, FailurePolicy::Skip);
    }

    #[test]
    fn defaults_abort_and_write() {
        let matches = command()
            .try_get_matches_from(["cpt-migrate", "run", "seed-admin-user"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let (_, options) = run_request(args).unwrap();
        assert_eq!(options, RunOptions::new());
    }

    #[test]
    fn unknown_migration_rejected_by_parser() {
        assert!(command()
            .try_get_matches_from(["cpt-migrate", "run", "drop-everything"])
            .is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        command().debug_assert();
    }
}
