// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ripple-sign-serialize: Core Library
//!
//! Key management, canonical transaction encoding and signing for the XRP
//! Ledger. Everything here is synchronous and free of shared mutable state;
//! the only I/O is reading and writing key files.
//!
//! ## Architecture
//!
//! The library is split into modules along the lines of the data flow, from
//! raw bytes up to signed JSON:
//!
//! - **config**: protocol constants, hash prefixes and key file defaults.
//! - **crypto**: hashing, base58 tokens, RFC 1751 words, seeds, key pairs
//!   and both signature algorithms.
//! - **codec**: the field table, field values and the canonical binary
//!   serializer.
//! - **object**: the ordered field map every transaction is, and its JSON
//!   mapping.
//! - **transaction**: builder, signing data, single and multi signing,
//!   verification.
//! - **keyfile**: the nine-member JSON key file.
//! - **tool**: one function per command of the command-line tool.
//!
//! ## Example
//!
//! ```
//! use ripple_sign_serialize::crypto::{KeyType, SigningKey};
//! use ripple_sign_serialize::tool;
//!
//! let key = SigningKey::from_seed_text(KeyType::Ed25519, "masterpassphrase").unwrap();
//! let tx = r#"{"TransactionType": "AccountSet", "Account": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
//!              "Fee": "10", "Sequence": 1}"#;
//! let signed = tool::sign_single(tx, &key).unwrap();
//! assert!(signed["TxnSignature"].is_string());
//! assert!(signed["hash"].is_string());
//! ```

pub mod codec;
pub mod config;
pub mod crypto;
pub mod keyfile;
pub mod object;
pub mod tool;
pub mod transaction;
