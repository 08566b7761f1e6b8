//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] assembles an unsigned transaction object from
//! typed setters, then checks it on `.build()`: the common required fields
//! must be present and every value must match its field's type.
//!
//! The builder does not sign. That happens in [`super::signing`].

use super::signing::missing_required_field;
use super::types::TransactionType;
use crate::codec::fields::{self, ACCOUNT, FEE, SEQUENCE, SIGNING_PUB_KEY, TRANSACTION_TYPE};
use crate::codec::{Amount, FieldId, FieldValue, TypeCode};
use crate::crypto::AccountId;
use crate::object::{ArrayEntry, FieldError, StObject};

const FLAGS: FieldId = FieldId::new(TypeCode::UInt32, 2);
const LAST_LEDGER_SEQUENCE: FieldId = FieldId::new(TypeCode::UInt32, 27);
const AMOUNT: FieldId = FieldId::new(TypeCode::Amount, 1);
const DESTINATION: FieldId = FieldId::new(TypeCode::AccountId, 3);
const MEMOS: FieldId = FieldId::new(TypeCode::Array, 9);
const MEMO: FieldId = FieldId::new(TypeCode::Object, 10);
const MEMO_TYPE: FieldId = FieldId::new(TypeCode::Blob, 12);
const MEMO_DATA: FieldId = FieldId::new(TypeCode::Blob, 13);

/// Fluent builder for unsigned transactions.
///
/// # Usage
///
/// ```
/// use ripple_sign_serialize::codec::Amount;
/// use ripple_sign_serialize::crypto::AccountId;
/// use ripple_sign_serialize::transaction::{TransactionBuilder, TransactionType};
///
/// let account: AccountId = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".parse().unwrap();
/// let tx = TransactionBuilder::new(TransactionType::Payment)
///     .account(account)
///     .destination("rGWrZyQqhTp9Xu7G5Pkayo7bXjH4k4QYpf".parse().unwrap())
///     .amount(Amount::drops(1_000_000))
///     .fee(Amount::drops(10))
///     .sequence(1)
///     .build()
///     .unwrap();
/// assert_eq!(tx.len(), 7);
/// ```
///
/// `SigningPubKey` starts out empty; signing fills it in.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    tx: StObject,
    memos: Vec<ArrayEntry>,
}

impl TransactionBuilder {
    pub fn new(tx_type: TransactionType) -> Self {
        let mut tx = StObject::new();
        tx.insert(TRANSACTION_TYPE, FieldValue::UInt16(tx_type.code()));
        tx.insert(SIGNING_PUB_KEY, FieldValue::Blob(Vec::new()));
        Self {
            tx,
            memos: Vec::new(),
        }
    }

    pub fn account(self, account: AccountId) -> Self {
        self.set(ACCOUNT, FieldValue::AccountId(account))
    }

    pub fn sequence(self, sequence: u32) -> Self {
        self.set(SEQUENCE, FieldValue::UInt32(sequence))
    }

    pub fn fee(self, fee: Amount) -> Self {
        self.set(FEE, FieldValue::Amount(fee))
    }

    pub fn flags(self, flags: u32) -> Self {
        self.set(FLAGS, FieldValue::UInt32(flags))
    }

    pub fn last_ledger_sequence(self, sequence: u32) -> Self {
        self.set(LAST_LEDGER_SEQUENCE, FieldValue::UInt32(sequence))
    }

    pub fn destination(self, destination: AccountId) -> Self {
        self.set(DESTINATION, FieldValue::AccountId(destination))
    }

    pub fn amount(self, amount: Amount) -> Self {
        self.set(AMOUNT, FieldValue::Amount(amount))
    }

    /// Appends a memo. Memos keep the order they were added in.
    pub fn memo(mut self, memo_type: &[u8], memo_data: &[u8]) -> Self {
        let mut memo = StObject::new();
        memo.insert(MEMO_TYPE, FieldValue::Blob(memo_type.to_vec()));
        memo.insert(MEMO_DATA, FieldValue::Blob(memo_data.to_vec()));
        self.memos.push(ArrayEntry {
            field: MEMO,
            object: memo,
        });
        self
    }

    /// Sets any field by id. Type agreement is checked at build time.
    pub fn set(mut self, id: FieldId, value: FieldValue) -> Self {
        self.tx.insert(id, value);
        self
    }

    /// Consumes the builder and produces the unsigned transaction.
    ///
    /// # Errors
    ///
    /// [`FieldError::MissingField`] if `Account`, `Sequence` or `Fee` was
    /// never set, [`FieldError::UnknownField`] for an id outside the field
    /// table, and [`FieldError::InvalidValue`] when a value's type does not
    /// match its field.
    pub fn build(mut self) -> Result<StObject, FieldError> {
        if !self.memos.is_empty() {
            self.tx.insert(MEMOS, FieldValue::Array(self.memos));
        }
        if let Some(name) = missing_required_field(&self.tx) {
            return Err(FieldError::MissingField(name));
        }
        for (id, value) in self.tx.iter() {
            let field = fields::by_id(*id).ok_or_else(|| FieldError::UnknownField(id.to_string()))?;
            if field.type_code() != value.type_code() {
                return Err(FieldError::InvalidValue {
                    field: field.name,
                    reason: format!("expected {}, got {}", field.type_code(), value.type_code()),
                });
            }
        }
        Ok(self.tx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
