// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ripple-serialize
//!
//! Entry point for the `ripple-serialize` binary. Parses CLI arguments,
//! initializes logging, resolves the key file and runs one command.
//!
//! ```text
//! ripple-serialize [options] <command> [<argument> ...]
//! ```

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use ripple_serialize::cli::SerializeCli;
use ripple_serialize::logging::{self, LogFormat};
use ripple_serialize::run_command;
use ripple_sign_serialize::config::default_key_file;

fn main() -> ExitCode {
    let cli = SerializeCli::parse();
    logging::init_logging(&cli.log_level, LogFormat::from_str_lossy(&cli.log_format));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: SerializeCli) -> Result<()> {
    let key_file = match cli.keyfile {
        Some(path) => path,
        None => {
            let cwd = env::current_dir().context("cannot determine the working directory")?;
            let home = env::var_os("HOME").map(PathBuf::from);
            default_key_file(home.as_deref(), &cwd)
        }
    };

    let Some(command) = cli.command else {
        SerializeCli::command()
            .print_help()
            .context("failed to print help")?;
        println!("\n      Default keyfile is: {}", key_file.display());
        return Ok(());
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(&command, &cli.arguments, &key_file, io::stdin().lock(), &mut out)?;
    out.flush().context("failed to flush output")?;
    Ok(())
}
