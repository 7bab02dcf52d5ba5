//! View filters over the replicated-object table

use crate::builder::ViewFilterBuilder;
use crate::params::{
    ParameterMap, ParameterValue, EXCLUDE_KEYS, LIMIT_OBJECT_IDS, MAIN_TYPE, SUB_TYPES,
};
use crate::scope::FilterScope;
use repindex_common::{ChangeMessage, Error, IdAndVersion, ReplicationType, Result, SubType};
use std::collections::BTreeSet;

/// Restricts replicated rows (`R`) and their annotations (`A`) to a view's
/// scope, as a parameterized SQL predicate.
///
/// Filters are immutable. Narrowing goes through [`ViewFilter::new_builder`]
/// and always yields a new filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFilter {
    pub(crate) main_type: ReplicationType,
    pub(crate) sub_types: BTreeSet<SubType>,
    pub(crate) limit_object_ids: Option<BTreeSet<i64>>,
    pub(crate) exclude_keys: Option<BTreeSet<String>>,
    pub(crate) exclude_derived_keys: bool,
    pub(crate) scope: FilterScope,
}

impl ViewFilter {
    pub fn new(
        main_type: ReplicationType,
        sub_types: impl IntoIterator<Item = SubType>,
        scope: FilterScope,
    ) -> Result<Self> {
        let filter = ViewFilter {
            main_type,
            sub_types: sub_types.into_iter().collect(),
            limit_object_ids: None,
            exclude_keys: None,
            exclude_derived_keys: false,
            scope,
        };
        filter.validate()?;
        Ok(filter)
    }

    /// Current objects whose parent is one of `parent_ids`
    pub fn hierarchical(
        main_type: ReplicationType,
        sub_types: impl IntoIterator<Item = SubType>,
        parent_ids: impl IntoIterator<Item = i64>,
    ) -> Result<Self> {
        let parent_ids = parent_ids.into_iter().collect();
        Self::new(main_type, sub_types, FilterScope::Hierarchical { parent_ids })
    }

    /// Current versions of the given objects
    pub fn flat_ids(
        main_type: ReplicationType,
        sub_types: impl IntoIterator<Item = SubType>,
        scope: impl IntoIterator<Item = i64>,
    ) -> Result<Self> {
        let scope = scope.into_iter().collect();
        Self::new(main_type, sub_types, FilterScope::FlatIds { scope })
    }

    /// Exactly the given `(id, version)` pairs
    pub fn flat_id_and_version(
        main_type: ReplicationType,
        sub_types: impl IntoIterator<Item = SubType>,
        scope: impl IntoIterator<Item = (i64, i64)>,
    ) -> Result<Self> {
        let scope = scope.into_iter().collect();
        Self::new(main_type, sub_types, FilterScope::FlatIdAndVersion { scope })
    }

    /// Pinned versions where a reference has one, current versions otherwise
    pub fn id_and_version(
        main_type: ReplicationType,
        sub_types: impl IntoIterator<Item = SubType>,
        scope: impl IntoIterator<Item = IdAndVersion>,
    ) -> Result<Self> {
        Self::new(main_type, sub_types, FilterScope::from_refs(scope))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.sub_types.is_empty() {
            return Err(Error::required("subTypes"));
        }
        if self.limit_object_ids.as_ref().is_some_and(BTreeSet::is_empty) {
            return Err(Error::InvalidArgument(
                "limitObjectIds must not be empty when provided".to_string(),
            ));
        }
        if self.exclude_keys.as_ref().is_some_and(BTreeSet::is_empty) {
            return Err(Error::InvalidArgument(
                "excludeKeys must not be empty when provided".to_string(),
            ));
        }
        Ok(())
    }

    pub fn main_type(&self) -> ReplicationType {
        self.main_type
    }

    pub fn sub_types(&self) -> &BTreeSet<SubType> {
        &self.sub_types
    }

    pub fn limit_object_ids(&self) -> Option<&BTreeSet<i64>> {
        self.limit_object_ids.as_ref()
    }

    pub fn exclude_keys(&self) -> Option<&BTreeSet<String>> {
        self.exclude_keys.as_ref()
    }

    pub fn is_exclude_derived_keys(&self) -> bool {
        self.exclude_derived_keys
    }

    pub fn scope(&self) -> &FilterScope {
        &self.scope
    }

    /// True when the scope admits nothing. Narrowing filters are ignored.
    pub fn is_empty(&self) -> bool {
        self.scope.is_empty()
    }

    /// Every value needed to bind [`get_filter_sql`](Self::get_filter_sql)
    /// and [`get_object_id_filter_sql`](Self::get_object_id_filter_sql)
    pub fn get_parameters(&self) -> ParameterMap {
        let mut params = ParameterMap::new();
        params.insert(MAIN_TYPE, ParameterValue::Text(self.main_type.to_string()));
        params.insert(
            SUB_TYPES,
            ParameterValue::TextList(self.sub_types.iter().map(|t| t.to_string()).collect()),
        );
        if let Some(limit) = &self.limit_object_ids {
            params.insert(
                LIMIT_OBJECT_IDS,
                ParameterValue::Ids(limit.iter().copied().collect()),
            );
        }
        if let Some(keys) = &self.exclude_keys {
            params.insert(
                EXCLUDE_KEYS,
                ParameterValue::TextList(keys.iter().cloned().collect()),
            );
        }
        self.scope.add_parameters(&mut params);
        params
    }

    fn base_sql(&self) -> String {
        let mut sql = format!(
            "R.OBJECT_TYPE = :{} AND R.SUBTYPE IN (:{})",
            MAIN_TYPE, SUB_TYPES
        );
        if self.limit_object_ids.is_some() {
            sql.push_str(&format!(" AND R.OBJECT_ID IN (:{})", LIMIT_OBJECT_IDS));
        }
        if self.exclude_keys.is_some() {
            sql.push_str(&format!(" AND A.ANNO_KEY NOT IN (:{})", EXCLUDE_KEYS));
        }
        if self.exclude_derived_keys {
            sql.push_str(" AND A.IS_DERIVED = FALSE");
        }
        sql
    }

    /// Predicate selecting the rows that belong to the view
    pub fn get_filter_sql(&self) -> String {
        let mut sql = self.base_sql();
        sql.push_str(&self.scope.scope_sql());
        sql
    }

    /// Predicate selecting every version of every object in scope, used when
    /// reindexing
    pub fn get_object_id_filter_sql(&self) -> String {
        let mut sql = self.base_sql();
        sql.push_str(&self.scope.object_id_sql());
        sql
    }

    /// One container-changed message per parent when a hierarchical entity
    /// filter spans more than one parent; empty otherwise.
    pub fn get_sub_views(&self) -> Vec<ChangeMessage> {
        match &self.scope {
            FilterScope::Hierarchical { parent_ids }
                if self.main_type == ReplicationType::Entity && parent_ids.len() > 1 =>
            {
                parent_ids
                    .iter()
                    .map(|parent_id| ChangeMessage::container_changed(*parent_id))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// A builder seeded with a snapshot of this filter
    pub fn new_builder(&self) -> ViewFilterBuilder {
        ViewFilterBuilder::from_filter(self)
    }
}
