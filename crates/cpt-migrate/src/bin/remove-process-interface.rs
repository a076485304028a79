//! `remove-process-interface`: runs one migration against the configured database

use cpt_migrate::cli::standalone_main;
use cpt_migrate::MigrationName;

fn main() {
    standalone_main(MigrationName::RemoveProcessInterface);
}
