//! Object definitions held by the catalog

use repindex_common::{IdAndVersion, TableType};

/// How a registered object is defined, before its sources are resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    Table,
    /// A view over entities or submissions, by kind
    View(TableType),
    /// Sources in the order they appear in the defining query
    MaterializedView(Vec<IdAndVersion>),
    VirtualTable(String),
}

impl Definition {
    pub fn table_type(&self) -> TableType {
        match self {
            Definition::Table => TableType::Table,
            Definition::View(kind) => *kind,
            Definition::MaterializedView(_) => TableType::MaterializedView,
            Definition::VirtualTable(_) => TableType::VirtualTable,
        }
    }
}

/// A catalog entry: the definition plus the last change recorded against it
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) definition: Definition,
    pub(crate) last_change_number: Option<i64>,
}

impl Entry {
    pub(crate) fn new(definition: Definition) -> Self {
        Entry {
            definition,
            last_change_number: None,
        }
    }
}
