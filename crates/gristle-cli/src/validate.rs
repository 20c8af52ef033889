//! The validate command: run the library and translate the outcome into an
//! exit code.

use gristle::{ExitStatus, GristleError, RunStats};
use tracing::warn;

use crate::cli::Cli;
use crate::report;

/// Run a validation and return the process exit code.
pub fn run(cli: &Cli) -> i32 {
    let config = cli.run_config();

    match gristle::run(&config) {
        Ok(stats) => {
            if cli.stats {
                report::print_stats(&stats, cli.stats_format);
            }
            stats.exit_status().code()
        }
        Err(GristleError::NoData(reason)) => {
            warn!(%reason, "no records read");
            if cli.stats {
                report::print_stats(&RunStats::default(), cli.stats_format);
            }
            ExitStatus::NoData.code()
        }
        Err(e) => {
            report::print_fatal(&e);
            e.exit_status().code()
        }
    }
}
