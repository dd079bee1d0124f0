#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;

use tshook::cli::{args::CliArgs, driver};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;

fn main() -> Result<()> {
    // Initialize tracing if TSHOOK_LOG or RUST_LOG is set (zero cost
    // otherwise). Supports TSHOOK_LOG_FORMAT=tree|json|text.
    tshook::tracing_config::init_tracing();

    let args = CliArgs::parse();

    match driver::run(&args) {
        Ok(summary) => {
            eprintln!("{summary}");
            std::process::exit(EXIT_SUCCESS);
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}
