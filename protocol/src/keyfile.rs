//! # Key File
//!
//! A signing key persisted as a pretty-printed JSON document of nine
//! members. Only `key_type` and `master_seed` are read back; every other
//! member is derived from them and rewritten on each save, so a file whose
//! stored keys drifted from its seed is repaired by loading and saving it.
//!
//! Writes go to a uniquely named sibling temporary file, created owner-only
//! and synced before it is renamed over the target. A failed write never
//! leaves a half-written key file or a stray temporary file behind.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::KEY_FILE_MEMBER_COUNT;
use crate::crypto::{KeyType, Seed, SigningKey};

/// Errors reading or writing a key file.
#[derive(Debug, Error)]
pub enum KeyFileError {
    #[error("Failed to open key file: {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to parse json key file: {}", .path.display())]
    Parse { path: PathBuf },

    #[error("Field '{field}' is missing from key file: {}", .path.display())]
    MissingField { field: &'static str, path: PathBuf },

    #[error("Invalid 'key_type' field \"{value}\" found in key file: {}", .path.display())]
    InvalidKeyType { value: String, path: PathBuf },

    #[error("Invalid 'master_seed' field found in key file: {}", .path.display())]
    InvalidSeed { path: PathBuf },

    #[error("Cannot create directory: {}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot open key file: {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to encode key file: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The persisted document. Field order here is the order written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFileRecord {
    pub key_type: String,
    pub master_seed: String,
    pub master_seed_hex: String,
    pub master_key: String,
    pub public_key: String,
    pub public_key_hex: String,
    pub secret_key: String,
    pub secret_key_hex: String,
    pub account_id: String,
}

impl KeyFileRecord {
    /// Derive every member afresh from the key.
    pub fn from_key(key: &SigningKey) -> Self {
        Self {
            key_type: key.key_type().to_string(),
            master_seed: key.seed().to_base58(),
            master_seed_hex: key.seed().to_hex(),
            master_key: key.seed().to_rfc1751(),
            public_key: key.public_key().to_base58(),
            public_key_hex: key.public_key().to_hex(),
            secret_key: key.secret_key().to_base58(),
            secret_key_hex: key.secret_key().to_hex(),
            account_id: key.account_id().to_base58(),
        }
    }
}

/// A key read back from disk.
#[derive(Debug)]
pub struct LoadedKey {
    pub key: SigningKey,
    /// Members found in the file.
    pub member_count: usize,
}

impl LoadedKey {
    /// A file with more or fewer members than a saved one carries.
    pub fn is_suspect(&self) -> bool {
        self.member_count != KEY_FILE_MEMBER_COUNT
    }
}

/// Read a key file and rebuild the key from its type and seed.
///
/// Stored public and secret keys are ignored.
pub fn load(path: &Path) -> Result<LoadedKey, KeyFileError> {
    let text = fs::read_to_string(path).map_err(|source| KeyFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let json: Value = serde_json::from_str(&text).map_err(|_| KeyFileError::Parse {
        path: path.to_path_buf(),
    })?;
    let map = json.as_object().ok_or_else(|| KeyFileError::Parse {
        path: path.to_path_buf(),
    })?;

    let key_type = key_type_member(map, path)?;
    let seed_text = map
        .get("master_seed")
        .ok_or_else(|| KeyFileError::MissingField {
            field: "master_seed",
            path: path.to_path_buf(),
        })?
        .as_str()
        .ok_or_else(|| KeyFileError::InvalidSeed {
            path: path.to_path_buf(),
        })?;
    let key = Seed::parse_generic(seed_text)
        .and_then(|seed| SigningKey::new(key_type, seed))
        .map_err(|_| KeyFileError::InvalidSeed {
            path: path.to_path_buf(),
        })?;

    let member_count = map.len();
    if member_count != KEY_FILE_MEMBER_COUNT {
        warn!(
            path = %path.display(),
            members = member_count,
            expected = KEY_FILE_MEMBER_COUNT,
            "key file has an unexpected number of members"
        );
    }
    debug!(path = %path.display(), account = %key.account_id(), "key file loaded");

    Ok(LoadedKey { key, member_count })
}

fn key_type_member(map: &Map<String, Value>, path: &Path) -> Result<KeyType, KeyFileError> {
    let value = map.get("key_type").ok_or_else(|| KeyFileError::MissingField {
        field: "key_type",
        path: path.to_path_buf(),
    })?;
    let invalid = || KeyFileError::InvalidKeyType {
        value: value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string()),
        path: path.to_path_buf(),
    };
    value
        .as_str()
        .ok_or_else(invalid)?
        .parse()
        .map_err(|_| invalid())
}

/// Write the key's full record to `path`, replacing any file already there.
///
/// Missing parent directories are created. On Unix the file is readable by
/// its owner only.
pub fn persist(key: &SigningKey, path: &Path) -> Result<KeyFileRecord, KeyFileError> {
    let record = KeyFileRecord::from_key(key);
    let mut text = serde_json::to_string_pretty(&record)?;
    text.push('\n');

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| KeyFileError::CreateDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    write_restricted(path, text.as_bytes()).map_err(|source| KeyFileError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), account = %record.account_id, "key file written");
    Ok(record)
}

/// Replace `path` with `contents` through an owner-only temporary file in
/// the same directory.
fn write_restricted(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut prefix = OsString::from(".");
    prefix.push(path.file_name().unwrap_or_default());
    prefix.push(".");

    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o600));
    }
    let mut temp = builder.tempfile_in(dir)?;

    if let Err(err) = fill(&mut temp, contents) {
        discard(temp);
        return Err(err);
    }
    temp.persist(path).map_err(|failed| {
        discard(failed.file);
        failed.error
    })?;
    Ok(())
}

fn fill(temp: &mut NamedTempFile, contents: &[u8]) -> io::Result<()> {
    temp.write_all(contents)?;
    temp.as_file().sync_all()
}

fn discard(temp: NamedTempFile) {
    let temp_path = temp.path().to_path_buf();
    if let Err(err) = temp.close() {
        debug!(path = %temp_path.display(), error = %err, "temporary key file not removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master_key(key_type: KeyType) -> SigningKey {
        SigningKey::from_seed_text(key_type, "masterpassphrase").unwrap()
    }

    #[test]
    fn record_holds_every_encoding() {
        let record = KeyFileRecord::from_key(&master_key(KeyType::Secp256k1));
        assert_eq!(record.key_type, "secp256k1");
        assert_eq!(record.master_seed, "snoPBrXtMeMyMHUVTgbuqAfg1SUTb");
        assert_eq!(record.master_seed_hex, "DEDCE9CE67B451D852FD4E846FCDE31C");
        assert_eq!(record.master_key, "I IRE BOND BOW TRIO LAID SEAT GOAL HEN IBIS IBIS DARE");
        assert_eq!(record.public_key, "aBQG8RQAzjs1eTKFEAQXr2gS4utcDiEC9wmi7pfUPTi27VCahwgw");
        assert_eq!(
            record.public_key_hex,
            "0330E7FC9D56BB25D6893BA3F317AE5BCF33B3291BD63DB32654A313222F7FD020"
        );
        assert_eq!(record.secret_key, "p9JfM6HHi64m6mvB6v5k7G2b1cXzGmYiCNJf6GHPKvFTWdeRVjh");
        assert_eq!(record.account_id, "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
    }

    #[test]
    fn persisted_file_has_nine_members() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        persist(&master_key(KeyType::Ed25519), &path).unwrap();

        let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json.as_object().unwrap().len(), KEY_FILE_MEMBER_COUNT);
        assert_eq!(json["account_id"], "rGWrZyQqhTp9Xu7G5Pkayo7bXjH4k4QYpf");
    }

    #[test]
    fn load_recovers_persisted_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        for key_type in [KeyType::Secp256k1, KeyType::Ed25519] {
            let key = SigningKey::generate(key_type).unwrap();
            persist(&key, &path).unwrap();
            let loaded = load(&path).unwrap();
            assert_eq!(loaded.key, key);
            assert_eq!(loaded.key.public_key(), key.public_key());
            assert!(!loaded.is_suspect());
        }
    }

    #[test]
    fn stored_keys_are_not_trusted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        let key = master_key(KeyType::Secp256k1);
        let mut record = KeyFileRecord::from_key(&key);
        record.public_key_hex = "00".repeat(33);
        record.account_id = "rrrrrrrrrrrrrrrrrrrrrhoLvTp".to_string();
        fs::write(&path, serde_json::to_string(&record).unwrap()).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.key.account_id().to_base58(), "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");

        // Saving again repairs every derived member.
        let repaired = persist(&loaded.key, &path).unwrap();
        assert_eq!(repaired, KeyFileRecord::from_key(&key));
    }

    #[test]
    fn minimal_file_loads_but_is_suspect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        fs::write(
            &path,
            r#"{"key_type": "ed25519", "master_seed": "snoPBrXtMeMyMHUVTgbuqAfg1SUTb"}"#,
        )
        .unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.member_count, 2);
        assert!(loaded.is_suspect());
        assert_eq!(loaded.key, master_key(KeyType::Ed25519));
    }

    #[test]
    fn load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");

        assert!(matches!(load(&path), Err(KeyFileError::Open { .. })));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(load(&path), Err(KeyFileError::Parse { .. })));

        fs::write(&path, r#"{"master_seed": "masterpassphrase"}"#).unwrap();
        assert!(matches!(
            load(&path),
            Err(KeyFileError::MissingField { field: "key_type", .. })
        ));

        fs::write(&path, r#"{"key_type": "rsa", "master_seed": "masterpassphrase"}"#).unwrap();
        let err = load(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Invalid 'key_type' field \"rsa\" found in key file: {}", path.display())
        );

        fs::write(&path, r#"{"key_type": "secp256k1"}"#).unwrap();
        assert!(matches!(
            load(&path),
            Err(KeyFileError::MissingField { field: "master_seed", .. })
        ));

        fs::write(&path, r#"{"key_type": "secp256k1", "master_seed": ""}"#).unwrap();
        assert!(matches!(load(&path), Err(KeyFileError::InvalidSeed { .. })));
    }

    #[test]
    fn persist_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("key.txt");
        persist(&master_key(KeyType::Secp256k1), &path).unwrap();
        assert!(path.exists());
        assert_eq!(entries(path.parent().unwrap()), vec!["key.txt"]);
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn persist_leaves_unrelated_siblings_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        fs::write(dir.path().join("key.txt.tmp"), "unrelated").unwrap();

        persist(&master_key(KeyType::Ed25519), &path).unwrap();
        persist(&master_key(KeyType::Ed25519), &path).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("key.txt.tmp")).unwrap(),
            "unrelated"
        );
        assert_eq!(entries(dir.path()), vec!["key.txt", "key.txt.tmp"]);
    }

    #[test]
    fn failed_persist_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way makes the final rename fail.
        let path = dir.path().join("key.txt");
        fs::create_dir(&path).unwrap();

        let err = persist(&master_key(KeyType::Secp256k1), &path).unwrap_err();
        assert!(matches!(err, KeyFileError::Write { .. }));
        assert_eq!(entries(dir.path()), vec!["key.txt"]);
        assert!(fs::read_dir(&path).unwrap().next().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn persisted_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        persist(&master_key(KeyType::Secp256k1), &path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
