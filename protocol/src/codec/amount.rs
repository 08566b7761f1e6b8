//! Amounts and currency codes.
//!
//! An amount is either native XRP, counted in drops, or an issued currency
//! amount with a decimal floating-point value, a currency code and an
//! issuer.
//!
//! ## Wire format
//!
//! ```text
//! native:  0 | sign | 62-bit drops                                  (8 bytes)
//! issued:  1 | sign | 8-bit exponent + 97 | 54-bit mantissa         (8 bytes)
//!          currency                                                (20 bytes)
//!          issuer                                                  (20 bytes)
//! ```
//!
//! The sign bit is set for positive values. Issued zero is the special word
//! `0x8000000000000000`.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Map, Value};

use super::binary::{BinaryReader, BinaryWriter};
use super::CodecError;
use crate::crypto::AccountId;

const NOT_NATIVE_BIT: u64 = 0x8000_0000_0000_0000;
const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;
const NATIVE_MASK: u64 = 0x3FFF_FFFF_FFFF_FFFF;
const MANTISSA_MASK: u64 = 0x003F_FFFF_FFFF_FFFF;

/// 100 billion XRP, the total supply.
pub const MAX_NATIVE_DROPS: u64 = 100_000_000_000_000_000;

pub const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
pub const MAX_MANTISSA: u64 = 9_999_999_999_999_999;
pub const MIN_EXPONENT: i32 = -96;
pub const MAX_EXPONENT: i32 = 80;

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

const ISO_CHARS: &str = "?!@#$%^&*<>(){}[]|";

/// A 20-byte currency code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Currency([u8; 20]);

impl Currency {
    /// The all-zero code, which stands for XRP.
    pub const XRP: Currency = Currency([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_xrp(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// The three-letter code, if this is a standard ISO-style currency.
    pub fn iso_code(&self) -> Option<&str> {
        let standard = self.0[..12].iter().all(|b| *b == 0) && self.0[15..].iter().all(|b| *b == 0);
        if !standard {
            return None;
        }
        let code = std::str::from_utf8(&self.0[12..15]).ok()?;
        (code != "XRP" && code.chars().all(is_iso_char)).then_some(code)
    }
}

fn is_iso_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ISO_CHARS.contains(c)
}

impl FromStr for Currency {
    type Err = CodecError;

    /// Accepts `XRP`, a three-character code, or 40 hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "XRP" {
            return Ok(Self::XRP);
        }
        if s.len() == 3 && s.chars().all(is_iso_char) {
            let mut bytes = [0u8; 20];
            bytes[12..15].copy_from_slice(s.as_bytes());
            return Ok(Self(bytes));
        }
        if s.len() == 40 {
            if let Ok(Ok(bytes)) = hex::decode(s).map(<[u8; 20]>::try_from) {
                return Ok(Self(bytes));
            }
        }
        Err(CodecError::InvalidCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_xrp() {
            f.write_str("XRP")
        } else if let Some(code) = self.iso_code() {
            f.write_str(code)
        } else {
            f.write_str(&hex::encode_upper(self.0))
        }
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({self})")
    }
}

// ---------------------------------------------------------------------------
// IssuedValue
// ---------------------------------------------------------------------------

/// A normalized decimal value: `mantissa * 10^exponent`.
///
/// Non-zero values always hold a 16-digit mantissa and an exponent within
/// `[-96, 80]`. Zero is mantissa 0, exponent 0, positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssuedValue {
    mantissa: u64,
    exponent: i32,
    negative: bool,
}

impl IssuedValue {
    pub const ZERO: IssuedValue = IssuedValue {
        mantissa: 0,
        exponent: 0,
        negative: false,
    };

    /// Normalize an arbitrary `mantissa * 10^exponent`. Digits beyond the
    /// sixteenth are truncated. Values too small to represent become zero.
    pub fn new(mut mantissa: u64, mut exponent: i32, negative: bool) -> Result<Self, CodecError> {
        if mantissa == 0 {
            return Ok(Self::ZERO);
        }
        while mantissa < MIN_MANTISSA && exponent > MIN_EXPONENT {
            mantissa *= 10;
            exponent -= 1;
        }
        while mantissa > MAX_MANTISSA {
            mantissa /= 10;
            exponent += 1;
        }
        if exponent > MAX_EXPONENT {
            return Err(CodecError::InvalidAmount(format!(
                "{mantissa}e{exponent} is out of range"
            )));
        }
        if mantissa < MIN_MANTISSA || exponent < MIN_EXPONENT {
            return Ok(Self::ZERO);
        }
        Ok(Self {
            mantissa,
            exponent,
            negative,
        })
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    fn to_wire(self) -> u64 {
        if self.is_zero() {
            return NOT_NATIVE_BIT;
        }
        let mut word = NOT_NATIVE_BIT | self.mantissa | (((self.exponent + 97) as u64) << 54);
        if !self.negative {
            word |= POSITIVE_BIT;
        }
        word
    }

    fn from_wire(word: u64) -> Result<Self, CodecError> {
        if word == NOT_NATIVE_BIT {
            return Ok(Self::ZERO);
        }
        let mantissa = word & MANTISSA_MASK;
        let exponent = ((word >> 54) & 0xFF) as i32 - 97;
        let value = Self {
            mantissa,
            exponent,
            negative: word & POSITIVE_BIT == 0,
        };
        let canonical = (MIN_MANTISSA..=MAX_MANTISSA).contains(&mantissa)
            && (MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent);
        if !canonical {
            return Err(CodecError::InvalidAmount(format!(
                "non-canonical issued value {word:016X}"
            )));
        }
        Ok(value)
    }
}

impl FromStr for IssuedValue {
    type Err = CodecError;

    /// Parses `[+-]digits[.digits][e[+-]digits]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CodecError::InvalidAmount(s.to_string());

        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (number, exp_text) = match rest.find(['e', 'E']) {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };
        let (int_part, frac_part) = match number.find('.') {
            Some(i) => (&number[..i], Some(&number[i + 1..])),
            None => (number, None),
        };

        let digits_only = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());
        if !digits_only(int_part) || (int_part.len() > 1 && int_part.starts_with('0')) {
            return Err(bad());
        }
        if frac_part.is_some_and(|f| !digits_only(f)) {
            return Err(bad());
        }

        let mut exponent: i32 = match exp_text {
            Some(text) => {
                let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
                if !digits_only(unsigned) {
                    return Err(bad());
                }
                text.parse().map_err(|_| bad())?
            }
            None => 0,
        };

        // Accumulate up to 18 significant digits; the rest only shift the
        // exponent (integer part) or fall away (fraction).
        let mut mantissa: u64 = 0;
        for b in int_part.bytes() {
            if mantissa < 100_000_000_000_000_000 {
                mantissa = mantissa * 10 + u64::from(b - b'0');
            } else {
                exponent = exponent.checked_add(1).ok_or_else(bad)?;
            }
        }
        for b in frac_part.unwrap_or("").bytes() {
            if mantissa < 100_000_000_000_000_000 {
                mantissa = mantissa * 10 + u64::from(b - b'0');
                exponent = exponent.checked_sub(1).ok_or_else(bad)?;
            }
        }

        Self::new(mantissa, exponent, negative)
    }
}

impl fmt::Display for IssuedValue {
    /// Plain decimal for exponents in `[-25, -5]`, `<mantissa>e<exponent>`
    /// otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let sign = if self.negative { "-" } else { "" };
        if self.exponent != 0 && !(-25..=-5).contains(&self.exponent) {
            return write!(f, "{sign}{}e{}", self.mantissa, self.exponent);
        }
        if self.exponent == 0 {
            return write!(f, "{sign}{}", self.mantissa);
        }

        // 16 mantissa digits, shifted right by up to 25 places.
        let digits = self.mantissa.to_string();
        let shift = (-self.exponent) as usize;
        let padded = format!("{}{digits}", "0".repeat(shift.saturating_sub(digits.len()) + 1));
        let (int_part, frac_part) = padded.split_at(padded.len() - shift);
        let int_part = int_part.trim_start_matches('0');
        let frac_part = frac_part.trim_end_matches('0');

        let int_part = if int_part.is_empty() { "0" } else { int_part };
        if frac_part.is_empty() {
            write!(f, "{sign}{int_part}")
        } else {
            write!(f, "{sign}{int_part}.{frac_part}")
        }
    }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A native or issued amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Amount {
    /// Drops of XRP. One XRP is a million drops.
    Native(i64),
    Issued {
        value: IssuedValue,
        currency: Currency,
        issuer: AccountId,
    },
}

impl Amount {
    pub fn drops(drops: i64) -> Self {
        Amount::Native(drops)
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Amount::Native(_))
    }

    pub fn encode(&self, w: &mut BinaryWriter) -> Result<(), CodecError> {
        match self {
            Amount::Native(drops) => {
                let magnitude = drops.unsigned_abs();
                if magnitude > MAX_NATIVE_DROPS {
                    return Err(CodecError::InvalidAmount(format!("{drops} drops is out of range")));
                }
                let sign = if *drops >= 0 { POSITIVE_BIT } else { 0 };
                w.write_u64(sign | magnitude);
            }
            Amount::Issued {
                value,
                currency,
                issuer,
            } => {
                if currency.is_xrp() {
                    return Err(CodecError::InvalidCurrency("XRP".to_string()));
                }
                w.write_u64(value.to_wire());
                w.write_bytes(currency.as_bytes());
                w.write_bytes(issuer.as_bytes());
            }
        }
        Ok(())
    }

    pub fn decode(r: &mut BinaryReader<'_>) -> Result<Self, CodecError> {
        let word = r.read_u64()?;
        if word & NOT_NATIVE_BIT == 0 {
            let magnitude = word & NATIVE_MASK;
            if magnitude > MAX_NATIVE_DROPS {
                return Err(CodecError::InvalidAmount(format!("{magnitude} drops is out of range")));
            }
            // Bounded by the supply check, so the cast cannot wrap.
            let drops = magnitude as i64;
            let drops = if word & POSITIVE_BIT != 0 { drops } else { -drops };
            return Ok(Amount::Native(drops));
        }
        let value = IssuedValue::from_wire(word)?;
        let currency = Currency::from_bytes(r.read_array()?);
        let issuer = AccountId::from_bytes(r.read_array()?);
        Ok(Amount::Issued {
            value,
            currency,
            issuer,
        })
    }

    /// Drops as a decimal string, or `{currency, issuer, value}`.
    pub fn to_json(&self) -> Value {
        match self {
            Amount::Native(drops) => Value::String(drops.to_string()),
            Amount::Issued {
                value,
                currency,
                issuer,
            } => json!({
                "currency": currency.to_string(),
                "issuer": issuer.to_base58(),
                "value": value.to_string(),
            }),
        }
    }

    pub fn from_json(json: &Value) -> Result<Self, CodecError> {
        match json {
            Value::String(s) => parse_drops(s).map(Amount::Native),
            Value::Number(n) => n
                .as_i64()
                .map(Amount::Native)
                .ok_or_else(|| CodecError::InvalidAmount(n.to_string())),
            Value::Object(map) => issued_from_json(map),
            other => Err(CodecError::InvalidAmount(other.to_string())),
        }
    }
}

fn parse_drops(s: &str) -> Result<i64, CodecError> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::InvalidAmount(s.to_string()));
    }
    s.parse().map_err(|_| CodecError::InvalidAmount(s.to_string()))
}

fn string_member<'a>(map: &'a Map<String, Value>, name: &str) -> Result<&'a str, CodecError> {
    map.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| CodecError::InvalidAmount(format!("issued amount needs a string '{name}'")))
}

fn issued_from_json(map: &Map<String, Value>) -> Result<Amount, CodecError> {
    if map.len() != 3 {
        return Err(CodecError::InvalidAmount(
            "issued amount takes exactly currency, issuer and value".to_string(),
        ));
    }
    let currency: Currency = string_member(map, "currency")?.parse()?;
    if currency.is_xrp() {
        return Err(CodecError::InvalidCurrency("XRP".to_string()));
    }
    let issuer_text = string_member(map, "issuer")?;
    let issuer: AccountId = issuer_text
        .parse()
        .map_err(|_| CodecError::InvalidAmount(format!("bad issuer {issuer_text}")))?;
    let value: IssuedValue = string_member(map, "value")?.parse()?;
    Ok(Amount::Issued {
        value,
        currency,
        issuer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    fn wire(amount: &Amount) -> String {
        let mut w = BinaryWriter::new();
        amount.encode(&mut w).unwrap();
        hex::encode_upper(w.into_bytes())
    }

    fn usd(value: &str) -> Amount {
        Amount::Issued {
            value: value.parse().unwrap(),
            currency: "USD".parse().unwrap(),
            issuer: ISSUER.parse().unwrap(),
        }
    }

    #[test]
    fn native_encoding() {
        assert_eq!(wire(&Amount::drops(10)), "400000000000000A");
        assert_eq!(wire(&Amount::drops(1_000_000)), "40000000000F4240");
        assert_eq!(wire(&Amount::drops(0)), "4000000000000000");
        assert_eq!(wire(&Amount::drops(-1)), "0000000000000001");
    }

    #[test]
    fn native_over_supply_is_rejected() {
        let mut w = BinaryWriter::new();
        assert!(Amount::drops(MAX_NATIVE_DROPS as i64 + 1).encode(&mut w).is_err());
    }

    #[test]
    fn issued_one_usd() {
        let hex = wire(&usd("1"));
        assert!(hex.starts_with("D4838D7EA4C68000"));
        assert_eq!(&hex[16..56], "0000000000000000000000005553440000000000");
        assert_eq!(&hex[56..], "B5F762798A53D543A014CAF8B297CFF8F2F937E8");
    }

    #[test]
    fn issued_zero_is_special_word() {
        assert!(wire(&usd("0")).starts_with("8000000000000000"));
        assert!(wire(&usd("0.000")).starts_with("8000000000000000"));
    }

    #[test]
    fn issued_decodes_back() {
        for text in ["1", "-1.5", "0", "123.456", "1e-80", "9999999999999999e80"] {
            let amount = usd(text);
            let mut w = BinaryWriter::new();
            amount.encode(&mut w).unwrap();
            let bytes = w.into_bytes();
            let decoded = Amount::decode(&mut BinaryReader::new(&bytes)).unwrap();
            assert_eq!(decoded, amount, "{text}");
        }
    }

    #[test]
    fn value_text_forms() {
        let show = |s: &str| s.parse::<IssuedValue>().unwrap().to_string();
        assert_eq!(show("1"), "1");
        assert_eq!(show("1.10"), "1.1");
        assert_eq!(show("-0.25"), "-0.25");
        assert_eq!(show("123.456"), "123.456");
        assert_eq!(show("0.0000001"), "0.0000001");
        assert_eq!(show("1e20"), "1000000000000000e5");
        assert_eq!(show("1e-10"), "0.0000000001");
        assert_eq!(show("1e-20"), "1000000000000000e-35");
        assert_eq!(show("1e-30"), "1000000000000000e-45");
        assert_eq!(show("1000000000000000"), "1000000000000000");
        assert_eq!(show("12345678901234567890"), "1234567890123456e4");
    }

    #[test]
    fn value_parse_rejects_junk() {
        for text in ["", "abc", "1.", ".5", "01", "1e", "1e+", "--1", "1.2.3"] {
            assert!(text.parse::<IssuedValue>().is_err(), "{text:?}");
        }
        assert!("1e81".parse::<IssuedValue>().is_ok());
        assert!("1e96".parse::<IssuedValue>().is_err());
    }

    #[test]
    fn tiny_values_underflow_to_zero() {
        assert!("1e-200".parse::<IssuedValue>().unwrap().is_zero());
    }

    #[test]
    fn currency_codes() {
        let usd: Currency = "USD".parse().unwrap();
        assert_eq!(usd.to_string(), "USD");
        assert!(Currency::XRP.is_xrp());
        assert_eq!(Currency::XRP.to_string(), "XRP");

        let custom = "0158415500000000C1F76FF6ECB0BAC600000000";
        let c: Currency = custom.parse().unwrap();
        assert_eq!(c.to_string(), custom);

        assert!("TOOLONG".parse::<Currency>().is_err());
    }

    #[test]
    fn json_forms() {
        assert_eq!(Amount::drops(10).to_json(), json!("10"));
        assert_eq!(Amount::from_json(&json!("10")).unwrap(), Amount::drops(10));
        assert_eq!(Amount::from_json(&json!(10)).unwrap(), Amount::drops(10));

        let issued = usd("1.5");
        let json = issued.to_json();
        assert_eq!(json["value"], "1.5");
        assert_eq!(json["currency"], "USD");
        assert_eq!(Amount::from_json(&json).unwrap(), issued);
    }

    #[test]
    fn json_rejects_bad_amounts() {
        assert!(Amount::from_json(&json!("1.5")).is_err());
        assert!(Amount::from_json(&json!(true)).is_err());
        assert!(Amount::from_json(&json!({"currency": "XRP", "issuer": ISSUER, "value": "1"})).is_err());
        assert!(Amount::from_json(&json!({"currency": "USD", "value": "1"})).is_err());
    }
}
