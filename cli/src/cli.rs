//! # CLI Interface
//!
//! Defines the command-line argument structure for `ripple-serialize` using
//! `clap` derive. The command and its arguments are positional; dispatch and
//! argument counts are checked in [`crate::commands`] so that errors carry
//! the tool's own wording.

use clap::Parser;
use std::path::PathBuf;

/// Command list shown after the options in `--help`.
pub const COMMANDS_HELP: &str = "\
Commands:
  Serialization:
    serialize [<argument>]              Serialize from JSON.
    deserialize [<argument>]            Deserialize to JSON.

  Transaction signing:
    sign [<argument>]                   Sign for submission.
    multiSign [<argument>]              Apply a multi-signature.
      Signing commands require a valid keyfile.
      Input can be serialized or unserialized JSON.
      Output will always be unserialized JSON.

      If an <argument> is not provided, the data will be
      read from stdin.

  Key Management:
    create_keyfile [<keytype> [<seed>]] Create a new keyfile.
      Specifying <seed> on the command line is strongly discouraged,
      particularly on a shared machine. Instead, create a random seed,
      edit the keyfile \"master_seed\", then run repair_keyfile.
    repair_keyfile                      Resync \"master_seed\"-derived fields.";

/// Serialize, deserialize and sign XRP Ledger transactions.
#[derive(Parser, Debug)]
#[command(
    name = "ripple-serialize",
    about = "Serialize, deserialize and sign XRP Ledger transactions",
    version = ripple_sign_serialize::config::TOOL_VERSION,
    after_help = COMMANDS_HELP
)]
pub struct SerializeCli {
    /// Key file used by the signing and key management commands.
    ///
    /// Defaults to `$HOME/.ripple/secret-key.txt`.
    #[arg(long, env = "RIPPLE_KEYFILE")]
    pub keyfile: Option<PathBuf>,

    /// Log output format: pretty or json.
    #[arg(long, env = "RIPPLE_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Default log filter when `RUST_LOG` is not set.
    #[arg(long, env = "RIPPLE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to run.
    pub command: Option<String>,

    /// Command arguments.
    #[arg(allow_hyphen_values = true)]
    pub arguments: Vec<String>,
}
