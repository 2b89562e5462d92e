// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Command-line options:
///
/// - `-v` / `-vv`: log info / debug messages to stderr (default: warnings only)
/// - `-q`: no log output at all
/// - `-h` / `--help`: print usage and exit
/// - `DIR...`: top-level Digital RF directories to inspect. Without any, the
///   three example datasets are inspected, relative to the working directory.
///
/// Each dataset prints its channels, the bounds of its first channel and that
/// channel's continuous blocks. The first error aborts the run with exit status 1.
use drf_inspect::error::DrfError::{self, DrfErr};
use drf_inspect::error::Result;
use drf_inspect::runner::{self, Dataset};
use log::debug;
use std::env;
use std::io;

const USAGE: &str = "usage: drf-inspect [-v|-vv|-q] [DIR...]";

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Run(Options),
}

#[derive(Debug, PartialEq)]
struct Options {
    level: log::Level,
    quiet: bool,
    datasets: Vec<Dataset>,
}

fn parse_args<I: Iterator<Item = String>>(args: I) -> Result<Command> {
    let mut level = log::Level::Warn;
    let mut quiet = false;
    let mut dirs: Vec<String> = Vec::new();

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" => level = log::Level::Info,
            "-vv" => level = log::Level::Debug,
            "-q" => quiet = true,
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(DrfErr(format!("unknown option {}\n{}", flag, USAGE)));
            }
            _ => dirs.push(arg),
        }
    }

    let datasets = if dirs.is_empty() {
        Dataset::examples()
    } else {
        dirs.iter()
            .enumerate()
            .map(|(i, dir)| Dataset::new(format!("Dataset {}: {}", i + 1, dir), dir.as_str()))
            .collect()
    };
    Ok(Command::Run(Options {
        level,
        quiet,
        datasets,
    }))
}

fn run() -> Result<()> {
    let opts = match parse_args(env::args().skip(1))? {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Run(opts) => opts,
    };

    stderrlog::new()
        .module(module_path!())
        .quiet(opts.quiet)
        .verbosity(opts.level)
        .init()
        .map_err(|e| DrfErr(format!("unable to set up logging: {}", e)))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    runner::run(&opts.datasets, &mut out)
}

fn error_line(err: &DrfError) -> String {
    format!("drf-inspect: {}", err)
}

fn main() {
    if let Err(err) = run() {
        debug!("{:?}", err);
        eprintln!("{}", error_line(&err));
        std::process::exit(1);
    }
}
