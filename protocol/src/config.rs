//! # Protocol Configuration & Constants
//!
//! Every magic number the serializer and signer depend on lives here. The
//! values are fixed by the XRP Ledger wire format: changing any of them
//! produces blobs and signatures that no validator will accept.

use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Tool Version
// ---------------------------------------------------------------------------

/// Version of the tool, fixed at compile time from the crate manifest.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// Hash Prefixes
// ---------------------------------------------------------------------------

/// Prefix for single-signature signing data: `STX\0`.
pub const HASH_PREFIX_TX_SIGN: u32 = 0x5354_5800;

/// Prefix for multi-signature signing data: `SMT\0`.
pub const HASH_PREFIX_TX_MULTI_SIGN: u32 = 0x534D_5400;

/// Prefix for the transaction ID hash: `TXN\0`.
pub const HASH_PREFIX_TRANSACTION_ID: u32 = 0x5458_4E00;

// ---------------------------------------------------------------------------
// Base58 Token Types
// ---------------------------------------------------------------------------

/// Version bytes prepended to base58check payloads. The alphabet is the
/// ledger's own (`rpshnaf39w...`), not Bitcoin's.
pub const TOKEN_ACCOUNT_ID: u8 = 0;
pub const TOKEN_NODE_PUBLIC: u8 = 28;
pub const TOKEN_NODE_PRIVATE: u8 = 32;
pub const TOKEN_FAMILY_SEED: u8 = 33;
pub const TOKEN_ACCOUNT_SECRET: u8 = 34;
pub const TOKEN_ACCOUNT_PUBLIC: u8 = 35;

// ---------------------------------------------------------------------------
// Key Material
// ---------------------------------------------------------------------------

/// Seed length in bytes. Every key pair is a pure function of these 16 bytes.
pub const SEED_LENGTH: usize = 16;

/// Both supported key types serialize their public key as 33 bytes:
/// a compressed secp256k1 point, or `0xED` followed by an Ed25519 point.
pub const PUBLIC_KEY_LENGTH: usize = 33;

/// Secret keys are 32 bytes for both key types.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Account IDs are RIPEMD-160 digests.
pub const ACCOUNT_ID_LENGTH: usize = 20;

/// Leading byte that marks an Ed25519 public key.
pub const ED25519_PUBLIC_KEY_PREFIX: u8 = 0xED;

/// Key type used when the caller does not pick one.
pub const DEFAULT_KEY_TYPE: &str = "secp256k1";

// ---------------------------------------------------------------------------
// Variable-Length Prefix Tiers
// ---------------------------------------------------------------------------

/// Largest length that fits in a one-byte VL prefix.
pub const VL_TIER_ONE_MAX: usize = 192;

/// Largest length that fits in a two-byte VL prefix.
pub const VL_TIER_TWO_MAX: usize = 12_480;

/// Largest length that fits in a three-byte VL prefix. Anything longer is
/// not representable on the wire.
pub const VL_TIER_THREE_MAX: usize = 918_744;

/// Deepest nesting of objects and arrays binary decoding accepts. Matches
/// the recursion limit `serde_json` applies to JSON input.
pub const MAX_NESTING_DEPTH: usize = 128;

// ---------------------------------------------------------------------------
// Key File
// ---------------------------------------------------------------------------

/// Number of members a well-formed key file carries.
pub const KEY_FILE_MEMBER_COUNT: usize = 9;

/// Upper bound on `.bak.<n>` copies made before a repair.
pub const MAX_KEY_FILE_BACKUPS: usize = 1000;

/// Key file location relative to the home directory.
pub const DEFAULT_KEY_FILE_DIR: &str = ".ripple";
pub const DEFAULT_KEY_FILE_NAME: &str = "secret-key.txt";

/// Resolves the default key file: `$HOME/.ripple/secret-key.txt`, or the
/// same path under `fallback` when no home directory is known.
pub fn default_key_file(home: Option<&Path>, fallback: &Path) -> PathBuf {
    home.filter(|h| !h.as_os_str().is_empty())
        .unwrap_or(fallback)
        .join(DEFAULT_KEY_FILE_DIR)
        .join(DEFAULT_KEY_FILE_NAME)
}
