//! Narrowing an existing filter into a new one

use crate::filter::ViewFilter;
use repindex_common::Result;

/// Derives a new [`ViewFilter`] from a snapshot of an existing one.
///
/// The builder owns its snapshot, so nothing done here is visible through
/// the filter it came from.
#[derive(Debug, Clone)]
pub struct ViewFilterBuilder {
    snapshot: ViewFilter,
}

impl ViewFilterBuilder {
    pub(crate) fn from_filter(filter: &ViewFilter) -> Self {
        ViewFilterBuilder {
            snapshot: filter.clone(),
        }
    }

    /// Restrict the filter to these object ids, replacing any earlier limit
    pub fn add_limit_object_ids(mut self, object_ids: impl IntoIterator<Item = i64>) -> Self {
        self.snapshot.limit_object_ids = Some(object_ids.into_iter().collect());
        self
    }

    /// Exclude annotations with these keys, replacing any earlier exclusion
    pub fn add_exclude_annotation_keys<S: Into<String>>(
        mut self,
        keys: impl IntoIterator<Item = S>,
    ) -> Self {
        self.snapshot.exclude_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn set_exclude_derived_keys(mut self, exclude_derived_keys: bool) -> Self {
        self.snapshot.exclude_derived_keys = exclude_derived_keys;
        self
    }

    /// Fails if a limit or exclusion was supplied but is empty
    pub fn build(self) -> Result<ViewFilter> {
        self.snapshot.validate()?;
        tracing::debug!(
            main_type = %self.snapshot.main_type,
            limited = self.snapshot.limit_object_ids.is_some(),
            excluded_keys = self.snapshot.exclude_keys.as_ref().map_or(0, |k| k.len()),
            exclude_derived_keys = self.snapshot.exclude_derived_keys,
            "built view filter"
        );
        Ok(self.snapshot)
    }
}
