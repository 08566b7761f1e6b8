//! The fixed field table.
//!
//! Every field the codec can read or write is listed here once, with the
//! JSON name it goes by and whether it takes part in signing data. Lookups
//! by name and by id go through maps built on first use.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::types::{FieldId, TypeCode};

/// A field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub id: FieldId,
    /// `false` for signatures: they cannot sign themselves.
    pub signing: bool,
}

impl Field {
    pub fn type_code(&self) -> TypeCode {
        self.id.type_code
    }
}

/// The transaction ID member of signed JSON. Never serialized.
pub const HASH_MEMBER: &str = "hash";

/// Reserved field marking the end of a nested object.
pub const OBJECT_END_MARKER: FieldId = FieldId::new(TypeCode::Object, 1);

/// Reserved field marking the end of an array.
pub const ARRAY_END_MARKER: FieldId = FieldId::new(TypeCode::Array, 1);

macro_rules! fields {
    (@signing) => { true };
    (@signing not_signing) => { false };
    ($( $name:literal => $tc:ident, $code:literal $(, $flag:ident)? ; )*) => {
        &[ $( Field {
            name: $name,
            id: FieldId::new(TypeCode::$tc, $code),
            signing: fields!(@signing $($flag)?),
        }, )* ]
    };
}

#[rustfmt::skip]
static FIELDS: &[Field] = fields! {
    // UInt8
    "CloseResolution"       => UInt8, 1;
    "Method"                => UInt8, 2;
    "TransactionResult"     => UInt8, 3;
    "TickSize"              => UInt8, 16;

    // UInt16
    "LedgerEntryType"       => UInt16, 1;
    "TransactionType"       => UInt16, 2;
    "SignerWeight"          => UInt16, 3;
    "Version"               => UInt16, 16;

    // UInt32
    "Flags"                 => UInt32, 2;
    "SourceTag"             => UInt32, 3;
    "Sequence"              => UInt32, 4;
    "PreviousTxnLgrSeq"     => UInt32, 5;
    "LedgerSequence"        => UInt32, 6;
    "CloseTime"             => UInt32, 7;
    "ParentCloseTime"       => UInt32, 8;
    "SigningTime"           => UInt32, 9;
    "Expiration"            => UInt32, 10;
    "TransferRate"          => UInt32, 11;
    "WalletSize"            => UInt32, 12;
    "OwnerCount"            => UInt32, 13;
    "DestinationTag"        => UInt32, 14;
    "HighQualityIn"         => UInt32, 16;
    "HighQualityOut"        => UInt32, 17;
    "LowQualityIn"          => UInt32, 18;
    "LowQualityOut"         => UInt32, 19;
    "QualityIn"             => UInt32, 20;
    "QualityOut"            => UInt32, 21;
    "StampEscrow"           => UInt32, 22;
    "BondAmount"            => UInt32, 23;
    "LoadFee"               => UInt32, 24;
    "OfferSequence"         => UInt32, 25;
    "FirstLedgerSequence"   => UInt32, 26;
    "LastLedgerSequence"    => UInt32, 27;
    "TransactionIndex"      => UInt32, 28;
    "OperationLimit"        => UInt32, 29;
    "ReferenceFeeUnits"     => UInt32, 30;
    "ReserveBase"           => UInt32, 31;
    "ReserveIncrement"      => UInt32, 32;
    "SetFlag"               => UInt32, 33;
    "ClearFlag"             => UInt32, 34;
    "SignerQuorum"          => UInt32, 35;
    "CancelAfter"           => UInt32, 36;
    "FinishAfter"           => UInt32, 37;
    "SignerListID"          => UInt32, 38;
    "SettleDelay"           => UInt32, 39;
    "TicketCount"           => UInt32, 40;
    "TicketSequence"        => UInt32, 41;

    // UInt64
    "IndexNext"             => UInt64, 1;
    "IndexPrevious"         => UInt64, 2;
    "BookNode"              => UInt64, 3;
    "OwnerNode"             => UInt64, 4;
    "BaseFee"               => UInt64, 5;
    "ExchangeRate"          => UInt64, 6;
    "LowNode"               => UInt64, 7;
    "HighNode"              => UInt64, 8;
    "DestinationNode"       => UInt64, 9;
    "Cookie"                => UInt64, 10;
    "ServerVersion"         => UInt64, 11;

    // Hash128
    "EmailHash"             => Hash128, 1;

    // Hash160
    "TakerPaysCurrency"     => Hash160, 1;
    "TakerPaysIssuer"       => Hash160, 2;
    "TakerGetsCurrency"     => Hash160, 3;
    "TakerGetsIssuer"       => Hash160, 4;

    // Hash256
    "LedgerHash"            => Hash256, 1;
    "ParentHash"            => Hash256, 2;
    "TransactionHash"       => Hash256, 3;
    "AccountHash"           => Hash256, 4;
    "PreviousTxnID"         => Hash256, 5;
    "LedgerIndex"           => Hash256, 6;
    "WalletLocator"         => Hash256, 7;
    "RootIndex"             => Hash256, 8;
    "AccountTxnID"          => Hash256, 9;
    "BookDirectory"         => Hash256, 16;
    "InvoiceID"             => Hash256, 17;
    "Nickname"              => Hash256, 18;
    "Amendment"             => Hash256, 19;
    "TicketID"              => Hash256, 20;
    "Digest"                => Hash256, 21;
    "Channel"               => Hash256, 22;
    "ConsensusHash"         => Hash256, 23;
    "CheckID"               => Hash256, 24;
    "ValidatedHash"         => Hash256, 25;

    // Amount
    "Amount"                => Amount, 1;
    "Balance"               => Amount, 2;
    "LimitAmount"           => Amount, 3;
    "TakerPays"             => Amount, 4;
    "TakerGets"             => Amount, 5;
    "LowLimit"              => Amount, 6;
    "HighLimit"             => Amount, 7;
    "Fee"                   => Amount, 8;
    "SendMax"               => Amount, 9;
    "DeliverMin"            => Amount, 10;
    "MinimumOffer"          => Amount, 16;
    "RippleEscrow"          => Amount, 17;
    "DeliveredAmount"       => Amount, 18;

    // Blob
    "PublicKey"             => Blob, 1;
    "MessageKey"            => Blob, 2;
    "SigningPubKey"         => Blob, 3;
    "TxnSignature"          => Blob, 4, not_signing;
    "Signature"             => Blob, 6, not_signing;
    "Domain"                => Blob, 7;
    "FundCode"              => Blob, 8;
    "RemoveCode"            => Blob, 9;
    "ExpireCode"            => Blob, 10;
    "CreateCode"            => Blob, 11;
    "MemoType"              => Blob, 12;
    "MemoData"              => Blob, 13;
    "MemoFormat"            => Blob, 14;
    "Fulfillment"           => Blob, 16;
    "Condition"             => Blob, 17;
    "MasterSignature"       => Blob, 18, not_signing;

    // AccountID
    "Account"               => AccountId, 1;
    "Owner"                 => AccountId, 2;
    "Destination"           => AccountId, 3;
    "Issuer"                => AccountId, 4;
    "Authorize"             => AccountId, 5;
    "Unauthorize"           => AccountId, 6;
    "Target"                => AccountId, 7;
    "RegularKey"            => AccountId, 8;

    // STObject
    "TransactionMetaData"   => Object, 2;
    "CreatedNode"           => Object, 3;
    "DeletedNode"           => Object, 4;
    "ModifiedNode"          => Object, 5;
    "PreviousFields"        => Object, 6;
    "FinalFields"           => Object, 7;
    "NewFields"             => Object, 8;
    "TemplateEntry"         => Object, 9;
    "Memo"                  => Object, 10;
    "SignerEntry"           => Object, 11;
    "Signer"                => Object, 16;
    "Majority"              => Object, 18;
    "DisabledValidator"     => Object, 19;

    // STArray
    "Signers"               => Array, 3, not_signing;
    "SignerEntries"         => Array, 4;
    "Template"              => Array, 5;
    "Necessary"             => Array, 6;
    "Sufficient"            => Array, 7;
    "AffectedNodes"         => Array, 8;
    "Memos"                 => Array, 9;
    "Majorities"            => Array, 16;
    "DisabledValidators"    => Array, 17;

    // PathSet
    "Paths"                 => PathSet, 1;

    // Vector256
    "Indexes"               => Vector256, 1;
    "Hashes"                => Vector256, 2;
    "Amendments"            => Vector256, 3;
};

static BY_NAME: Lazy<HashMap<&'static str, &'static Field>> =
    Lazy::new(|| FIELDS.iter().map(|f| (f.name, f)).collect());

static BY_ID: Lazy<HashMap<FieldId, &'static Field>> =
    Lazy::new(|| FIELDS.iter().map(|f| (f.id, f)).collect());

/// Look up a field by its JSON name.
pub fn by_name(name: &str) -> Option<&'static Field> {
    BY_NAME.get(name).copied()
}

/// Look up a field by its wire identifier.
pub fn by_id(id: FieldId) -> Option<&'static Field> {
    BY_ID.get(&id).copied()
}

/// Every known field, in table order.
pub fn all() -> &'static [Field] {
    FIELDS
}

// Fields the signer touches directly.
pub const TRANSACTION_TYPE: FieldId = FieldId::new(TypeCode::UInt16, 2);
pub const SEQUENCE: FieldId = FieldId::new(TypeCode::UInt32, 4);
pub const FEE: FieldId = FieldId::new(TypeCode::Amount, 8);
pub const SIGNING_PUB_KEY: FieldId = FieldId::new(TypeCode::Blob, 3);
pub const TXN_SIGNATURE: FieldId = FieldId::new(TypeCode::Blob, 4);
pub const ACCOUNT: FieldId = FieldId::new(TypeCode::AccountId, 1);
pub const SIGNER: FieldId = FieldId::new(TypeCode::Object, 16);
pub const SIGNERS: FieldId = FieldId::new(TypeCode::Array, 3);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_and_ids_are_unique() {
        let names: HashSet<_> = FIELDS.iter().map(|f| f.name).collect();
        let ids: HashSet<_> = FIELDS.iter().map(|f| f.id).collect();
        assert_eq!(names.len(), FIELDS.len());
        assert_eq!(ids.len(), FIELDS.len());
    }

    #[test]
    fn markers_are_not_fields() {
        assert!(by_id(OBJECT_END_MARKER).is_none());
        assert!(by_id(ARRAY_END_MARKER).is_none());
    }

    #[test]
    fn signatures_are_not_signing_fields() {
        assert!(!by_name("TxnSignature").unwrap().signing);
        assert!(!by_name("Signers").unwrap().signing);
        assert!(by_name("SigningPubKey").unwrap().signing);
        assert!(by_name("Account").unwrap().signing);
    }

    #[test]
    fn handles_match_the_table() {
        for (name, id) in [
            ("TransactionType", TRANSACTION_TYPE),
            ("Sequence", SEQUENCE),
            ("Fee", FEE),
            ("SigningPubKey", SIGNING_PUB_KEY),
            ("TxnSignature", TXN_SIGNATURE),
            ("Account", ACCOUNT),
            ("Signer", SIGNER),
            ("Signers", SIGNERS),
        ] {
            assert_eq!(by_name(name).map(|f| f.id), Some(id), "{name}");
        }
    }

    #[test]
    fn hash_member_is_not_a_field() {
        assert!(by_name(HASH_MEMBER).is_none());
    }
}
