//! Named codes: transaction types, ledger entry types and result codes.
//!
//! These three integer fields render as names in JSON (`"Payment"`,
//! `"AccountRoot"`, `"tesSUCCESS"`). Codes without a name here still
//! round-trip as plain numbers.

use std::fmt;
use std::str::FromStr;

/// Error for a name that is not in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown name \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownName {}

macro_rules! named_codes {
    (
        $(#[$meta:meta])*
        $name:ident : $repr:ty { $( $variant:ident = $code:expr, )* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(non_camel_case_types)]
        pub enum $name {
            $( $variant, )*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )* ];

            pub fn code(self) -> $repr {
                match self {
                    $( $name::$variant => $code, )*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant), )*
                }
            }

            pub fn from_code(code: $repr) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.code() == code)
            }
        }

        impl FromStr for $name {
            type Err = UnknownName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == s)
                    .ok_or_else(|| UnknownName(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

named_codes! {
    /// The `TransactionType` field.
    TransactionType: u16 {
        Payment = 0,
        EscrowCreate = 1,
        EscrowFinish = 2,
        AccountSet = 3,
        EscrowCancel = 4,
        SetRegularKey = 5,
        NickNameSet = 6,
        OfferCreate = 7,
        OfferCancel = 8,
        Contract = 9,
        TicketCreate = 10,
        TicketCancel = 11,
        SignerListSet = 12,
        PaymentChannelCreate = 13,
        PaymentChannelFund = 14,
        PaymentChannelClaim = 15,
        CheckCreate = 16,
        CheckCash = 17,
        CheckCancel = 18,
        DepositPreauth = 19,
        TrustSet = 20,
        AccountDelete = 21,
        EnableAmendment = 100,
        SetFee = 101,
        UNLModify = 102,
    }
}

// ---------------------------------------------------------------------------
// LedgerEntryType
// ---------------------------------------------------------------------------

named_codes! {
    /// The `LedgerEntryType` field. Codes are ASCII letters.
    LedgerEntryType: u16 {
        AccountRoot = 0x61,
        DirectoryNode = 0x64,
        RippleState = 0x72,
        Ticket = 0x54,
        SignerList = 0x53,
        Offer = 0x6f,
        LedgerHashes = 0x68,
        Amendments = 0x66,
        FeeSettings = 0x73,
        Escrow = 0x75,
        PayChannel = 0x78,
        Check = 0x43,
        DepositPreauth = 0x70,
        NegativeUNL = 0x4e,
    }
}

// ---------------------------------------------------------------------------
// TransactionResult
// ---------------------------------------------------------------------------

named_codes! {
    /// The `TransactionResult` metadata field. Only outcomes that reach a
    /// ledger appear here: success and the fee-claimed `tec` codes.
    TransactionResult: u8 {
        tesSUCCESS = 0,
        tecCLAIM = 100,
        tecPATH_PARTIAL = 101,
        tecUNFUNDED_ADD = 102,
        tecUNFUNDED_OFFER = 103,
        tecUNFUNDED_PAYMENT = 104,
        tecFAILED_PROCESSING = 105,
        tecDIR_FULL = 121,
        tecINSUF_RESERVE_LINE = 122,
        tecINSUF_RESERVE_OFFER = 123,
        tecNO_DST = 124,
        tecNO_DST_INSUF_XRP = 125,
        tecNO_LINE_INSUF_RESERVE = 126,
        tecNO_LINE_REDUNDANT = 127,
        tecPATH_DRY = 128,
        tecUNFUNDED = 129,
        tecNO_ALTERNATIVE_KEY = 130,
        tecNO_REGULAR_KEY = 131,
        tecOWNERS = 132,
        tecNO_ISSUER = 133,
        tecNO_AUTH = 134,
        tecNO_LINE = 135,
        tecINSUFF_FEE = 136,
        tecFROZEN = 137,
        tecNO_TARGET = 138,
        tecNO_PERMISSION = 139,
        tecNO_ENTRY = 140,
        tecINSUFFICIENT_RESERVE = 141,
        tecNEED_MASTER_KEY = 142,
        tecDST_TAG_NEEDED = 143,
        tecINTERNAL = 144,
        tecOVERSIZE = 145,
        tecCRYPTOCONDITION_ERROR = 146,
        tecINVARIANT_FAILED = 147,
        tecEXPIRED = 148,
        tecDUPLICATE = 149,
        tecKILLED = 150,
        tecHAS_OBLIGATIONS = 151,
        tecTOO_SOON = 152,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
