//! # Transaction Module
//!
//! Construction, signing and verification of ledger transactions. A
//! transaction is an [`StObject`](crate::object::StObject); this module adds
//! the protocol rules that sit on top of the generic object model.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        : named codes (TransactionType, LedgerEntryType, TransactionResult)
//! builder.rs      : fluent TransactionBuilder for unsigned transactions
//! signing.rs      : signing data, signing hashes, single and multi signing
//! verification.rs : signature checks for both signing modes
//! ```
//!
//! ## Signature states
//!
//! A transaction is unsigned, single signed or multi signed.
//! [`single_sign`] moves any state to single signed. [`multi_sign`] moves
//! any state to multi signed, adding or replacing one signer entry. Nothing
//! removes signatures.

pub mod builder;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::TransactionBuilder;
pub use signing::{
    multi_sign, signing_data, signing_hash, single_sign, transaction_id, SignError, SigningMode,
};
pub use types::{LedgerEntryType, TransactionResult, TransactionType};
pub use verification::verify_signatures;
