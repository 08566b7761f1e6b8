//! # Transaction Object Model
//!
//! An [`StObject`] maps field identifiers to typed values. It backs
//! transactions, metadata, ledger entries and every nested object inside
//! them.
//!
//! Iteration is always in ascending [`FieldId`] order, whatever order the
//! fields went in. Canonical serialization relies on that and nothing
//! else.

use std::collections::btree_map::{self, BTreeMap};

use crate::codec::{FieldId, FieldValue};

pub mod json;

pub use json::{parse_json, parse_json_str, to_json, FieldError};

/// An ordered, typed field map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StObject {
    fields: BTreeMap<FieldId, FieldValue>,
}

impl StObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the value it replaced.
    pub fn insert(&mut self, id: FieldId, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(id, value)
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldValue> {
        self.fields.get(&id)
    }

    pub fn get_mut(&mut self, id: FieldId) -> Option<&mut FieldValue> {
        self.fields.get_mut(&id)
    }

    pub fn remove(&mut self, id: FieldId) -> Option<FieldValue> {
        self.fields.remove(&id)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.fields.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in canonical order.
    pub fn iter(&self) -> btree_map::Iter<'_, FieldId, FieldValue> {
        self.fields.iter()
    }

    pub fn get_blob(&self, id: FieldId) -> Option<&[u8]> {
        match self.get(id) {
            Some(FieldValue::Blob(b)) => Some(b),
            _ => None,
        }
    }

    pub fn get_account(&self, id: FieldId) -> Option<crate::crypto::AccountId> {
        match self.get(id) {
            Some(FieldValue::AccountId(a)) => Some(*a),
            _ => None,
        }
    }

    pub fn get_array(&self, id: FieldId) -> Option<&[ArrayEntry]> {
        match self.get(id) {
            Some(FieldValue::Array(entries)) => Some(entries),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a StObject {
    type Item = (&'a FieldId, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, FieldId, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(FieldId, FieldValue)> for StObject {
    fn from_iter<I: IntoIterator<Item = (FieldId, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// One element of an array: an inner object and the field that names it,
/// such as a `Signer` inside `Signers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayEntry {
    pub field: FieldId,
    pub object: StObject,
}
