//! Named parameters bound into filter SQL

use serde::Serialize;
use std::collections::BTreeMap;

pub const MAIN_TYPE: &str = "mainType";
pub const SUB_TYPES: &str = "subTypes";
pub const LIMIT_OBJECT_IDS: &str = "limitObjectIds";
pub const EXCLUDE_KEYS: &str = "excludeKeys";
pub const PARENT_IDS: &str = "parentIds";
pub const FLAT_IDS: &str = "flatIds";
pub const SCOPE_PAIRS: &str = "scopePairs";
pub const VERSIONED_REFS: &str = "versionedRefs";
pub const NON_VERSIONED_REFS: &str = "nonVersionedRefs";
pub const OBJECT_IDS: &str = "objectIds";

/// A value bound to one named placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Text(String),
    TextList(Vec<String>),
    Ids(Vec<i64>),
    /// `(object id, object version)` pairs
    IdPairs(Vec<(i64, i64)>),
}

/// Placeholder name to bound value, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterMap(BTreeMap<String, ParameterValue>);

impl ParameterMap {
    pub fn new() -> Self {
        ParameterMap(BTreeMap::new())
    }

    pub(crate) fn insert(&mut self, name: &str, value: ParameterValue) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}
