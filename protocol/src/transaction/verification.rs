//! Signature verification for single- and multi-signed transactions.
//!
//! Structural checks run before any signature is verified, so a malformed
//! signer list is reported as such rather than as a bad signature.

use super::signing::{signing_data, SignError, SigningMode};
use crate::codec::fields::{ACCOUNT, SIGNERS, SIGNING_PUB_KEY, TXN_SIGNATURE};
use crate::crypto::{verify, AccountId};
use crate::object::{ArrayEntry, StObject};

/// Check every signature on `tx`.
///
/// A transaction with a non-empty `SigningPubKey` is treated as single
/// signed. One with an empty `SigningPubKey` must carry a signer list:
///
/// 1. **Non-empty**: at least one `Signer`.
/// 2. **Sorted**: accounts strictly ascending, so no duplicates.
/// 3. **Not self**: no signer is the transaction's own `Account`.
/// 4. **Valid**: each signature verifies over that signer's signing data.
///
/// # Errors
///
/// The first failing check, as a [`SignError`].
pub fn verify_signatures(tx: &StObject) -> Result<(), SignError> {
    let public_key = tx.get_blob(SIGNING_PUB_KEY).ok_or(SignError::Unsigned)?;
    if public_key.is_empty() {
        verify_multi(tx)
    } else {
        verify_single(tx, public_key)
    }
}

fn verify_single(tx: &StObject, public_key: &[u8]) -> Result<(), SignError> {
    if tx.contains(SIGNERS) {
        return Err(SignError::MixedSignatures);
    }
    let signature = tx.get_blob(TXN_SIGNATURE).ok_or(SignError::Unsigned)?;
    let data = signing_data(tx, SigningMode::Single)?;
    if verify(public_key, &data, signature) {
        Ok(())
    } else {
        Err(SignError::BadSignature)
    }
}

fn verify_multi(tx: &StObject) -> Result<(), SignError> {
    let signers = tx.get_array(SIGNERS).ok_or(SignError::Unsigned)?;
    if signers.is_empty() {
        return Err(SignError::EmptySigners);
    }
    if tx.contains(TXN_SIGNATURE) {
        return Err(SignError::MixedSignatures);
    }

    let owner = tx.get_account(ACCOUNT);
    let mut previous: Option<AccountId> = None;
    let mut checked = Vec::with_capacity(signers.len());
    for entry in signers {
        let signer = SignerRef::from_entry(entry)?;
        if previous.is_some_and(|p| p >= signer.account) {
            return Err(SignError::UnsortedSigners(signer.account));
        }
        if owner == Some(signer.account) {
            return Err(SignError::SignerIsAccount(signer.account));
        }
        previous = Some(signer.account);
        checked.push(signer);
    }

    for signer in checked {
        let data = signing_data(tx, SigningMode::Multi(signer.account))?;
        if !verify(signer.public_key, &data, signer.signature) {
            return Err(SignError::BadSignerSignature(signer.account));
        }
    }
    Ok(())
}

struct SignerRef<'a> {
    account: AccountId,
    public_key: &'a [u8],
    signature: &'a [u8],
}

impl<'a> SignerRef<'a> {
    fn from_entry(entry: &'a ArrayEntry) -> Result<Self, SignError> {
        let obj = &entry.object;
        Ok(Self {
            account: obj
                .get_account(ACCOUNT)
                .ok_or(SignError::MalformedSigner("Account"))?,
            public_key: obj
                .get_blob(SIGNING_PUB_KEY)
                .ok_or(SignError::MalformedSigner("SigningPubKey"))?,
            signature: obj
                .get_blob(TXN_SIGNATURE)
                .ok_or(SignError::MalformedSigner("TxnSignature"))?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::fields::{FEE, SEQUENCE, TRANSACTION_TYPE};
    use crate::codec::{Amount, FieldValue};
    use crate::crypto::{KeyType, SigningKey};
    use crate::transaction::signing::{multi_sign, single_sign};

    fn key(key_type: KeyType, passphrase: &str) -> SigningKey {
        SigningKey::from_seed_text(key_type, passphrase).unwrap()
    }

    fn account_set(owner: &SigningKey) -> StObject {
        let mut tx = StObject::new();
        tx.insert(TRANSACTION_TYPE, FieldValue::UInt16(3));
        tx.insert(SEQUENCE, FieldValue::UInt32(9));
        tx.insert(FEE, FieldValue::Amount(Amount::drops(12)));
        tx.insert(ACCOUNT, FieldValue::AccountId(owner.account_id()));
        tx
    }

    fn flip_last_byte(tx: &mut StObject) {
        if let Some(FieldValue::Blob(sig)) = tx.get_mut(TXN_SIGNATURE) {
            if let Some(last) = sig.last_mut() {
                *last ^= 0x01;
            }
        }
    }

    #[test]
    fn single_signed_passes() {
        for key_type in [KeyType::Secp256k1, KeyType::Ed25519] {
            let owner = key(key_type, "owner");
            let mut tx = account_set(&owner);
            single_sign(&mut tx, &owner).unwrap();
            assert_eq!(verify_signatures(&tx), Ok(()));
        }
    }

    #[test]
    fn tampered_signature_fails() {
        for key_type in [KeyType::Secp256k1, KeyType::Ed25519] {
            let owner = key(key_type, "owner");
            let mut tx = account_set(&owner);
            single_sign(&mut tx, &owner).unwrap();
            flip_last_byte(&mut tx);
            assert_eq!(verify_signatures(&tx), Err(SignError::BadSignature));
        }
    }

    #[test]
    fn tampered_body_fails() {
        let owner = key(KeyType::Ed25519, "owner");
        let mut tx = account_set(&owner);
        single_sign(&mut tx, &owner).unwrap();
        tx.insert(SEQUENCE, FieldValue::UInt32(10));
        assert_eq!(verify_signatures(&tx), Err(SignError::BadSignature));
    }

    #[test]
    fn unsigned_is_reported() {
        let owner = key(KeyType::Ed25519, "owner");
        assert_eq!(verify_signatures(&account_set(&owner)), Err(SignError::Unsigned));
    }

    #[test]
    fn multi_signed_passes() {
        let owner = key(KeyType::Secp256k1, "owner");
        let mut tx = account_set(&owner);
        multi_sign(&mut tx, &key(KeyType::Secp256k1, "alice")).unwrap();
        multi_sign(&mut tx, &key(KeyType::Ed25519, "bob")).unwrap();
        assert_eq!(verify_signatures(&tx), Ok(()));
    }

    #[test]
    fn unsorted_signers_fail() {
        let owner = key(KeyType::Secp256k1, "owner");
        let mut tx = account_set(&owner);
        multi_sign(&mut tx, &key(KeyType::Secp256k1, "alice")).unwrap();
        multi_sign(&mut tx, &key(KeyType::Ed25519, "bob")).unwrap();
        if let Some(FieldValue::Array(entries)) = tx.get_mut(SIGNERS) {
            entries.reverse();
        }
        assert!(matches!(verify_signatures(&tx), Err(SignError::UnsortedSigners(_))));
    }

    #[test]
    fn tampered_signer_fails() {
        let owner = key(KeyType::Secp256k1, "owner");
        let alice = key(KeyType::Secp256k1, "alice");
        let mut tx = account_set(&owner);
        multi_sign(&mut tx, &alice).unwrap();
        if let Some(FieldValue::Array(entries)) = tx.get_mut(SIGNERS) {
            flip_last_byte(&mut entries[0].object);
        }
        assert_eq!(
            verify_signatures(&tx),
            Err(SignError::BadSignerSignature(alice.account_id()))
        );
    }

    #[test]
    fn empty_signer_list_fails() {
        let owner = key(KeyType::Secp256k1, "owner");
        let mut tx = account_set(&owner);
        tx.insert(SIGNING_PUB_KEY, FieldValue::Blob(vec![]));
        tx.insert(SIGNERS, FieldValue::Array(vec![]));
        assert_eq!(verify_signatures(&tx), Err(SignError::EmptySigners));
    }
}
