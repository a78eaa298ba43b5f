//! MEPA interpreter REPL.
//!
//! Starts the interactive command loop on the terminal.
//!
//! # Usage
//! ```text
//! mepa [file] [OPTIONS]
//! ```
//!
//! # Options
//! - `-f, --file <path>`: Source file to load at start-up
//! - `--step-limit <n>`: Stop `RUN` after `n` instructions
//! - `--page-size <n>`: Lines per `LIST` page (defaults to 20)
//! - `--log-level <level>`: `debug`, `info`, `warn` or `error`
//! - `--no-timestamp`: Omit timestamps from log lines

use mepa::config::Config;
use mepa::repl::Repl;
use mepa::{debug, error};
use std::env;
use std::io;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("mepa");

    if args.iter().skip(1).any(|a| a == "--help" || a == "-h") {
        print_usage(program);
        process::exit(0);
    }

    let config = match Config::from_args(args.get(1..).unwrap_or_default(), |key| env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            print_usage(program);
            process::exit(1);
        }
    };
    config.apply_logging();
    debug!("{config:?}");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut repl = Repl::new(stdin.lock(), stdout.lock(), config);
    if let Err(e) = repl.run() {
        error!("terminal I/O failed: {e}");
        process::exit(1);
    }
}

const USAGE: &str = "\
MEPA Interpreter

USAGE:
    {program} [file] [OPTIONS]

ARGS:
    [file]                  Source file to load at start-up

OPTIONS:
    -f, --file <path>       Source file to load at start-up
    --step-limit <n>        Stop RUN after n executed instructions
    --page-size <n>         Lines per LIST page (default: 20)
    --log-level <level>     Log threshold: debug, info, warn or error (default: info)
    --no-timestamp          Omit timestamps from log lines
    -h, --help              Print this help message

ENVIRONMENT:
    MEPA_STEP_LIMIT    Default for --step-limit
    MEPA_LOG           Default for --log-level

EXAMPLES:
    # Open the REPL with a program loaded
    {program} demos/factorial.mepa

    # Guard against runaway loops
    {program} loop.mepa --step-limit 100000
";

fn print_usage(program: &str) {
    eprintln!("{}", USAGE.replace("{program}", program));
}
