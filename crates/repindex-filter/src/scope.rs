//! Scope predicates, one per kind of view scope

use crate::params::{
    ParameterMap, ParameterValue, FLAT_IDS, NON_VERSIONED_REFS, OBJECT_IDS, PARENT_IDS,
    SCOPE_PAIRS, VERSIONED_REFS,
};
use repindex_common::IdAndVersion;
use std::collections::BTreeSet;

const CURRENT_VERSION_ONLY: &str = "R.OBJECT_VERSION = R.CURRENT_VERSION";
const NOTHING: &str = " AND FALSE";

/// The set of replicated objects a view admits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterScope {
    /// Current versions of every object whose parent is in `parent_ids`
    Hierarchical { parent_ids: BTreeSet<i64> },
    /// Current versions of the listed objects
    FlatIds { scope: BTreeSet<i64> },
    /// Exact `(id, version)` pairs
    FlatIdAndVersion { scope: BTreeSet<(i64, i64)> },
    /// Pinned versions where given, current versions otherwise
    IdAndVersion {
        versioned_refs: BTreeSet<(i64, i64)>,
        non_versioned_refs: BTreeSet<i64>,
    },
}

impl FilterScope {
    /// Splits mixed references into pinned pairs and current-version ids
    pub fn from_refs(scope: impl IntoIterator<Item = IdAndVersion>) -> Self {
        let mut versioned_refs = BTreeSet::new();
        let mut non_versioned_refs = BTreeSet::new();
        for reference in scope {
            match reference.version {
                Some(version) => {
                    versioned_refs.insert((reference.id, version));
                }
                None => {
                    non_versioned_refs.insert(reference.id);
                }
            }
        }
        FilterScope::IdAndVersion {
            versioned_refs,
            non_versioned_refs,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FilterScope::Hierarchical { parent_ids } => parent_ids.is_empty(),
            FilterScope::FlatIds { scope } => scope.is_empty(),
            FilterScope::FlatIdAndVersion { scope } => scope.is_empty(),
            FilterScope::IdAndVersion {
                versioned_refs,
                non_versioned_refs,
            } => versioned_refs.is_empty() && non_versioned_refs.is_empty(),
        }
    }

    /// Distinct object ids in scope, ignoring versions
    fn object_ids(&self) -> BTreeSet<i64> {
        match self {
            FilterScope::Hierarchical { .. } => BTreeSet::new(),
            FilterScope::FlatIds { scope } => scope.clone(),
            FilterScope::FlatIdAndVersion { scope } => scope.iter().map(|(id, _)| *id).collect(),
            FilterScope::IdAndVersion {
                versioned_refs,
                non_versioned_refs,
            } => versioned_refs
                .iter()
                .map(|(id, _)| *id)
                .chain(non_versioned_refs.iter().copied())
                .collect(),
        }
    }

    /// MySQL rejects an empty `IN ()`, so an empty scope admits nothing instead
    pub(crate) fn scope_sql(&self) -> String {
        if self.is_empty() {
            return NOTHING.to_string();
        }
        match self {
            FilterScope::Hierarchical { .. } => {
                format!(" AND R.PARENT_ID IN (:{}) AND {}", PARENT_IDS, CURRENT_VERSION_ONLY)
            }
            FilterScope::FlatIds { .. } => {
                format!(" AND R.OBJECT_ID IN (:{}) AND {}", FLAT_IDS, CURRENT_VERSION_ONLY)
            }
            FilterScope::FlatIdAndVersion { .. } => {
                format!(" AND (R.OBJECT_ID, R.OBJECT_VERSION) IN (:{})", SCOPE_PAIRS)
            }
            FilterScope::IdAndVersion {
                versioned_refs,
                non_versioned_refs,
            } => {
                let mut clauses = Vec::with_capacity(2);
                if !versioned_refs.is_empty() {
                    clauses.push(format!(
                        "((R.OBJECT_ID, R.OBJECT_VERSION) IN (:{}))",
                        VERSIONED_REFS
                    ));
                }
                if !non_versioned_refs.is_empty() {
                    clauses.push(format!(
                        "(R.OBJECT_ID IN (:{}) AND {})",
                        NON_VERSIONED_REFS, CURRENT_VERSION_ONLY
                    ));
                }
                format!(" AND ( {} )", clauses.join(" OR "))
            }
        }
    }

    /// Like [`scope_sql`](Self::scope_sql) but admitting every version
    pub(crate) fn object_id_sql(&self) -> String {
        if self.is_empty() {
            return NOTHING.to_string();
        }
        match self {
            FilterScope::Hierarchical { .. } => format!(" AND R.PARENT_ID IN (:{})", PARENT_IDS),
            _ => format!(" AND R.OBJECT_ID IN (:{})", OBJECT_IDS),
        }
    }

    pub(crate) fn add_parameters(&self, params: &mut ParameterMap) {
        match self {
            FilterScope::Hierarchical { parent_ids } => {
                params.insert(PARENT_IDS, ids(parent_ids));
            }
            FilterScope::FlatIds { scope } => {
                params.insert(FLAT_IDS, ids(scope));
            }
            FilterScope::FlatIdAndVersion { scope } => {
                params.insert(SCOPE_PAIRS, ParameterValue::IdPairs(scope.iter().copied().collect()));
            }
            FilterScope::IdAndVersion {
                versioned_refs,
                non_versioned_refs,
            } => {
                if !versioned_refs.is_empty() {
                    params.insert(
                        VERSIONED_REFS,
                        ParameterValue::IdPairs(versioned_refs.iter().copied().collect()),
                    );
                }
                if !non_versioned_refs.is_empty() {
                    params.insert(NON_VERSIONED_REFS, ids(non_versioned_refs));
                }
            }
        }
        if !matches!(self, FilterScope::Hierarchical { .. }) {
            params.insert(OBJECT_IDS, ids(&self.object_ids()));
        }
    }
}

fn ids(set: &BTreeSet<i64>) -> ParameterValue {
    ParameterValue::Ids(set.iter().copied().collect())
}
