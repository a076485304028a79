//! `cpt-migrate`: list and run maintenance migrations

fn main() {
    cpt_migrate::cli::umbrella_main();
}
