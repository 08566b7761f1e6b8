//! Command dispatch.
//!
//! Each command has a fixed range of argument counts. Commands that take
//! data read it from stdin when no argument is given. Parse and sign
//! failures are reported on the output as `Unable to ... "<input>"` and are
//! not errors; key file problems and usage mistakes are.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use ripple_sign_serialize::config::MAX_KEY_FILE_BACKUPS;
use ripple_sign_serialize::crypto::{KeyError, SigningKey};
use ripple_sign_serialize::keyfile::{self, KeyFileError};
use ripple_sign_serialize::tool::{self, ToolError};

/// Errors that end a command unsuccessfully.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Syntax error: Wrong number of arguments")]
    WrongArity,

    #[error("Refusing to overwrite existing key file: {}", .0.display())]
    OverwriteRefused(PathBuf),

    #[error("Cannot back up key file: {}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to read standard input")]
    Stdin(#[source] io::Error),

    #[error(transparent)]
    KeyFile(#[from] KeyFileError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Output(#[from] io::Error),
}

/// Argument counts a command accepts, and whether it falls back to stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
    pub reads_stdin: bool,
}

const fn arity(min: usize, max: usize, reads_stdin: bool) -> Arity {
    Arity {
        min,
        max,
        reads_stdin,
    }
}

/// Every command the tool knows.
pub const COMMANDS: &[(&str, Arity)] = &[
    ("serialize", arity(0, 1, true)),
    ("deserialize", arity(0, 1, true)),
    ("sign", arity(0, 1, true)),
    ("multiSign", arity(0, 1, true)),
    ("create_keyfile", arity(0, 2, false)),
    ("repair_keyfile", arity(0, 0, false)),
];

pub fn arity_of(command: &str) -> Option<Arity> {
    COMMANDS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, arity)| *arity)
}

/// Run one command, writing its output to `out`.
pub fn run_command<R: Read, W: Write>(
    command: &str,
    args: &[String],
    key_file: &Path,
    mut stdin: R,
    out: &mut W,
) -> Result<(), CommandError> {
    let arity = arity_of(command).ok_or_else(|| CommandError::UnknownCommand(command.to_string()))?;
    if args.len() < arity.min || args.len() > arity.max {
        return Err(CommandError::WrongArity);
    }
    debug!(command, args = args.len(), "running command");

    let input = match args.first() {
        Some(arg) => arg.clone(),
        None if arity.reads_stdin => {
            let mut buf = String::new();
            stdin.read_to_string(&mut buf).map_err(CommandError::Stdin)?;
            buf
        }
        None => String::new(),
    };

    match command {
        "serialize" => match tool::serialize_from_json(&input) {
            Ok(blob) => writeln!(out, "{blob}")?,
            Err(_) => writeln!(out, "Unable to serialize \"{input}\"")?,
        },
        "deserialize" => match tool::deserialize_to_json(&input) {
            Ok(json) => writeln!(out, "{json:#}")?,
            Err(_) => writeln!(out, "Unable to deserialize \"{input}\"")?,
        },
        "sign" => sign(&input, key_file, out, tool::sign_single)?,
        "multiSign" => sign(&input, key_file, out, tool::sign_multi)?,
        "create_keyfile" => {
            let key_type = args.first().map(String::as_str).filter(|s| !s.is_empty());
            let seed = args.get(1).map(String::as_str);
            create_keyfile(key_file, key_type, seed, out)?;
        }
        "repair_keyfile" => repair_keyfile(key_file, out)?,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    }
    Ok(())
}

type SignFn = fn(&str, &SigningKey) -> Result<serde_json::Value, ToolError>;

/// The key file is only read once the input is known to parse.
fn sign<W: Write>(input: &str, key_file: &Path, out: &mut W, sign_fn: SignFn) -> Result<(), CommandError> {
    if tool::make_transaction(input).is_err() {
        writeln!(out, "Unable to sign \"{input}\"")?;
        return Ok(());
    }
    let key = keyfile::load(key_file)?.key;
    match sign_fn(input, &key) {
        Ok(json) => writeln!(out, "{json:#}")?,
        Err(_) => writeln!(out, "Unable to sign \"{input}\"")?,
    }
    Ok(())
}

fn create_keyfile<W: Write>(
    key_file: &Path,
    key_type: Option<&str>,
    seed: Option<&str>,
    out: &mut W,
) -> Result<(), CommandError> {
    if key_file.exists() {
        return Err(CommandError::OverwriteRefused(key_file.to_path_buf()));
    }
    let key = match tool::create_key(key_type, seed) {
        Ok(key) => key,
        Err(ToolError::Key(err @ KeyError::InvalidKeyType(_))) => {
            writeln!(out, "{err}")?;
            return Ok(());
        }
        Err(other) => return Err(other.into()),
    };
    keyfile::persist(&key, key_file)?;
    info!(path = %key_file.display(), account = %key.account_id(), "key file created");

    write!(
        out,
        "New ripple key created.\n\
         Stored in {}.\n\
         Key type is {}.\n\
         Account ID is {}.\n\
         \n\n\
         This file should be stored securely and not shared.\n\n",
        key_file.display(),
        key.key_type(),
        key.account_id(),
    )?;
    Ok(())
}

/// First `<file>.bak.<n>` that does not exist yet.
fn backup_path(key_file: &Path) -> Option<PathBuf> {
    (0..MAX_KEY_FILE_BACKUPS)
        .map(|n| {
            let mut name = OsString::from(key_file.as_os_str());
            name.push(format!(".bak.{n}"));
            PathBuf::from(name)
        })
        .find(|candidate| !candidate.exists())
}

fn repair_keyfile<W: Write>(key_file: &Path, out: &mut W) -> Result<(), CommandError> {
    let loaded = keyfile::load(key_file)?;

    // With every backup slot taken, repair without one.
    if let Some(backup) = backup_path(key_file) {
        fs::copy(key_file, &backup).map_err(|source| CommandError::Backup {
            path: backup.clone(),
            source,
        })?;
        info!(backup = %backup.display(), "key file backed up");
    }

    let key = loaded.key;
    keyfile::persist(&key, key_file)?;

    write!(
        out,
        "Ripple key in {} repaired.\n\
         Key type is {}.\n\
         Account ID is {}.\n\
         \n\n\
         This file should be stored securely and not shared.\n\n",
        key_file.display(),
        key.key_type(),
        key.account_id(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_has_an_arity() {
        assert_eq!(arity_of("sign"), Some(arity(0, 1, true)));
        assert_eq!(arity_of("create_keyfile"), Some(arity(0, 2, false)));
        assert_eq!(arity_of("repair_keyfile"), Some(arity(0, 0, false)));
        assert_eq!(arity_of("multisign"), None);
    }

    #[test]
    fn backup_path_skips_taken_slots() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("key.txt");
        assert_eq!(backup_path(&key), Some(dir.path().join("key.txt.bak.0")));
        fs::write(dir.path().join("key.txt.bak.0"), "x").unwrap();
        fs::write(dir.path().join("key.txt.bak.1"), "x").unwrap();
        assert_eq!(backup_path(&key), Some(dir.path().join("key.txt.bak.2")));
    }
}
