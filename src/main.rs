//! Gridcalc - Spreadsheet evaluator driven by command scripts

mod config;
mod error;
mod logger;
mod script;

use anyhow::Context;
use log::LevelFilter;
use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use config::Config;
use script::Runner;

fn print_usage() {
    eprintln!("Usage: gridcalc [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Command script to run (default: stdin)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <COMMAND>   Run a command instead of a script (can be repeated)");
    eprintln!("  --config <FILE>           Load configuration from FILE");
    eprintln!("  --no-config               Ignore configuration files");
    eprintln!("  -v, --verbose             Log debug messages to stderr");
    eprintln!("  -h, --help                Print help");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut file_path: Option<PathBuf> = None;
    let mut commands: Vec<String> = Vec::new();
    let mut config_file: Option<PathBuf> = None;
    let mut no_config = false;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a value");
                    std::process::exit(1);
                }
                commands.push(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            "--no-config" => no_config = true,
            "-v" | "--verbose" => verbose = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if file_path.is_none() {
                    file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    let (mut config, warnings) = if no_config {
        (Config::default(), Vec::new())
    } else {
        config::load_config(config_file.as_ref())
    };
    if verbose {
        config.log_level = LevelFilter::Debug;
    }
    logger::init(config.log_level);
    for warning in warnings {
        log::warn!("{}", warning);
    }

    match run(config, file_path, &commands) {
        Ok(0) => {}
        Ok(failures) => {
            log::debug!("{} command(s) failed", failures);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Run the script and return the number of failed commands.
fn run(config: Config, file_path: Option<PathBuf>, commands: &[String]) -> anyhow::Result<usize> {
    let script = if !commands.is_empty() {
        if file_path.is_some() {
            log::warn!("Ignoring script file because --command was given");
        }
        commands.join("\n")
    } else if let Some(path) = file_path {
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        content
    };

    let stdout = io::stdout();
    let mut runner = Runner::new(config, stdout.lock(), io::stderr());
    let failures = runner.run_script(&script)?;
    log::debug!("Finished with {} stored cells", runner.sheet().len());
    Ok(failures)
}
