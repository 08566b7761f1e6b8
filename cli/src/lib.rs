// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ripple-serialize
//!
//! The command-line front end of `ripple-sign-serialize`: argument parsing,
//! command dispatch, stdin fallback, key file guards and backups, and all
//! user-facing text. The protocol work itself lives in the library.

pub mod cli;
pub mod commands;
pub mod logging;

pub use commands::{run_command, CommandError};
