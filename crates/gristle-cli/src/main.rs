//! gristle_validator - split delimited records into valid and invalid outputs.

mod cli;
mod logging;
mod report;
mod validate;

use clap::Parser;
use cli::Cli;
use gristle::ExitStatus;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitStatus::Error.code()
            } else {
                ExitStatus::Success.code()
            };
            std::process::exit(code);
        }
    };

    if let Err(error) = logging::init_logging(&logging::LogConfig::from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(ExitStatus::Error.code());
    }

    std::process::exit(validate::run(&cli));
}
