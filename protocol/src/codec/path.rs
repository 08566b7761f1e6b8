//! Payment paths.
//!
//! A path set is a list of paths, and a path is a list of steps. On the
//! wire each step is a type byte naming which members follow, paths are
//! separated by `0xFF` and the set ends with `0x00`.

use serde_json::{Map, Value};

use super::amount::Currency;
use super::binary::{BinaryReader, BinaryWriter};
use super::CodecError;
use crate::crypto::AccountId;

const STEP_ACCOUNT: u8 = 0x01;
const STEP_CURRENCY: u8 = 0x10;
const STEP_ISSUER: u8 = 0x20;
const PATH_SEPARATOR: u8 = 0xFF;
const PATH_SET_END: u8 = 0x00;

/// One hop along a payment path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PathStep {
    pub account: Option<AccountId>,
    pub currency: Option<Currency>,
    pub issuer: Option<AccountId>,
}

impl PathStep {
    fn type_byte(&self) -> u8 {
        let mut t = 0;
        if self.account.is_some() {
            t |= STEP_ACCOUNT;
        }
        if self.currency.is_some() {
            t |= STEP_CURRENCY;
        }
        if self.issuer.is_some() {
            t |= STEP_ISSUER;
        }
        t
    }

    fn to_json(self) -> Value {
        let t = self.type_byte();
        let mut map = Map::new();
        map.insert("type".to_string(), Value::from(t));
        map.insert("type_hex".to_string(), Value::from(format!("{:016X}", t)));
        if let Some(account) = self.account {
            map.insert("account".to_string(), Value::from(account.to_base58()));
        }
        if let Some(currency) = self.currency {
            map.insert("currency".to_string(), Value::from(currency.to_string()));
        }
        if let Some(issuer) = self.issuer {
            map.insert("issuer".to_string(), Value::from(issuer.to_base58()));
        }
        Value::Object(map)
    }

    fn from_json(json: &Value) -> Result<Self, CodecError> {
        let map = json
            .as_object()
            .ok_or_else(|| CodecError::InvalidPath("path step must be an object".to_string()))?;

        let account_id = |text: &str| {
            text.parse::<AccountId>()
                .map_err(|_| CodecError::InvalidPath(format!("bad account {text}")))
        };

        for key in map.keys() {
            if !matches!(key.as_str(), "account" | "currency" | "issuer" | "type" | "type_hex") {
                return Err(CodecError::InvalidPath(format!("unknown path member '{key}'")));
            }
        }

        let step = PathStep {
            account: optional_string(map, "account")?.map(account_id).transpose()?,
            currency: optional_string(map, "currency")?.map(str::parse::<Currency>).transpose()?,
            issuer: optional_string(map, "issuer")?.map(account_id).transpose()?,
        };
        if step.type_byte() == 0 {
            return Err(CodecError::InvalidPath("empty path step".to_string()));
        }
        Ok(step)
    }
}

fn optional_string<'a>(map: &'a Map<String, Value>, name: &str) -> Result<Option<&'a str>, CodecError> {
    match map.get(name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(CodecError::InvalidPath(format!("'{name}' must be a string"))),
    }
}

/// A path set: alternative routes for a cross-currency payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathSet(pub Vec<Vec<PathStep>>);

impl PathSet {
    pub fn encode(&self, w: &mut BinaryWriter) -> Result<(), CodecError> {
        for (i, path) in self.0.iter().enumerate() {
            if path.is_empty() {
                return Err(CodecError::InvalidPath("empty path".to_string()));
            }
            if i > 0 {
                w.write_u8(PATH_SEPARATOR);
            }
            for step in path {
                let t = step.type_byte();
                if t == 0 {
                    return Err(CodecError::InvalidPath("empty path step".to_string()));
                }
                w.write_u8(t);
                if let Some(account) = &step.account {
                    w.write_bytes(account.as_bytes());
                }
                if let Some(currency) = &step.currency {
                    w.write_bytes(currency.as_bytes());
                }
                if let Some(issuer) = &step.issuer {
                    w.write_bytes(issuer.as_bytes());
                }
            }
        }
        w.write_u8(PATH_SET_END);
        Ok(())
    }

    pub fn decode(r: &mut BinaryReader<'_>) -> Result<Self, CodecError> {
        let mut paths = Vec::new();
        let mut current: Vec<PathStep> = Vec::new();
        loop {
            let t = r.read_u8()?;
            if t == PATH_SET_END || t == PATH_SEPARATOR {
                if current.is_empty() {
                    // Only the empty set may end without a path.
                    if t == PATH_SEPARATOR || !paths.is_empty() {
                        return Err(CodecError::InvalidPath("empty path".to_string()));
                    }
                } else {
                    paths.push(std::mem::take(&mut current));
                }
                if t == PATH_SET_END {
                    return Ok(PathSet(paths));
                }
                continue;
            }
            if t & !(STEP_ACCOUNT | STEP_CURRENCY | STEP_ISSUER) != 0 {
                return Err(CodecError::InvalidPath(format!("bad step type {t:#04x}")));
            }
            let mut step = PathStep::default();
            if t & STEP_ACCOUNT != 0 {
                step.account = Some(AccountId::from_bytes(r.read_array()?));
            }
            if t & STEP_CURRENCY != 0 {
                step.currency = Some(Currency::from_bytes(r.read_array()?));
            }
            if t & STEP_ISSUER != 0 {
                step.issuer = Some(AccountId::from_bytes(r.read_array()?));
            }
            current.push(step);
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|path| Value::Array(path.iter().map(|s| s.to_json()).collect()))
                .collect(),
        )
    }

    pub fn from_json(json: &Value) -> Result<Self, CodecError> {
        let not_list = || CodecError::InvalidPath("paths must be a list of lists".to_string());
        let paths = json.as_array().ok_or_else(not_list)?;
        paths
            .iter()
            .map(|path| {
                let steps = path.as_array().ok_or_else(not_list)?;
                if steps.is_empty() {
                    return Err(CodecError::InvalidPath("empty path".to_string()));
                }
                steps.iter().map(PathStep::from_json).collect()
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PathSet)
    }
}
