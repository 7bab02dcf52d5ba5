//! Dependencies of a multi-source query

use crate::IndexDescription;
use repindex_common::IdAndVersion;
use std::cmp::Ordering;

/// An index description together with the alias it is addressed by.
///
/// Equality and ordering consider only the wrapped identifier and the alias.
#[derive(Debug, Clone)]
pub struct TableDependency {
    pub index: IndexDescription,
    pub alias: Option<String>,
}

impl TableDependency {
    pub fn new(index: IndexDescription) -> Self {
        TableDependency { index, alias: None }
    }

    pub fn with_alias(index: IndexDescription, alias: impl Into<String>) -> Self {
        TableDependency {
            index,
            alias: Some(alias.into()),
        }
    }

    pub fn id_and_version(&self) -> IdAndVersion {
        self.index.get_id_and_version()
    }

    /// The alias if there is one, otherwise the physical table name
    pub fn reference_name(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => self.id_and_version().table_name(),
        }
    }

    fn sort_key(&self) -> (IdAndVersion, Option<&str>) {
        (self.id_and_version(), self.alias.as_deref())
    }
}

impl PartialEq for TableDependency {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for TableDependency {}

impl PartialOrd for TableDependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TableDependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}
