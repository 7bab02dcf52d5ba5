//! Repindex Catalog - registry of table-like objects
//!
//! The catalog holds the definition of every table, view, materialized view,
//! and virtual table, along with the last change recorded against each, and
//! resolves them into fully-linked [`IndexDescription`] graphs.

use hashbrown::HashMap;
use parking_lot::RwLock;
use repindex_common::{Error, IdAndVersion, Result, TableType};
use repindex_description::{IndexDescription, IndexDescriptionLookup};
use std::sync::atomic::{AtomicI64, Ordering};

mod definition;

pub use definition::Definition;
use definition::Entry;

/// The registry of object definitions
pub struct Catalog {
    /// All registered objects
    entries: RwLock<HashMap<IdAndVersion, Entry>>,
    /// Last change number handed out
    change_number: AtomicI64,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Catalog {
            entries: RwLock::new(HashMap::new()),
            change_number: AtomicI64::new(0),
        }
    }

    fn next_change_number(&self) -> i64 {
        self.change_number.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn register(&self, id_and_version: IdAndVersion, definition: Definition) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.contains_key(&id_and_version) {
            return Err(Error::TableAlreadyExists(id_and_version.to_string()));
        }
        tracing::debug!(
            object = %id_and_version,
            table_type = %definition.table_type(),
            "registered definition"
        );
        entries.insert(id_and_version, Entry::new(definition));
        Ok(())
    }

    pub fn create_table(&self, id_and_version: IdAndVersion) -> Result<()> {
        self.register(id_and_version, Definition::Table)
    }

    /// Register a view of the given kind; `kind` must be a view type
    pub fn create_view(&self, id_and_version: IdAndVersion, kind: TableType) -> Result<()> {
        if !kind.is_view() {
            return Err(Error::InvalidArgument(format!(
                "{} is not a view type",
                kind
            )));
        }
        self.register(id_and_version, Definition::View(kind))
    }

    /// Register a materialized view reading from `sources`, in query order
    pub fn create_materialized_view(
        &self,
        id_and_version: IdAndVersion,
        sources: Vec<IdAndVersion>,
    ) -> Result<()> {
        self.register(id_and_version, Definition::MaterializedView(sources))
    }

    /// Register a virtual table. The defining SQL is checked when the table
    /// is resolved, since its source may be registered later.
    pub fn create_virtual_table(
        &self,
        id_and_version: IdAndVersion,
        defining_sql: impl Into<String>,
    ) -> Result<()> {
        let defining_sql = defining_sql.into();
        if defining_sql.trim().is_empty() {
            return Err(Error::required("definingSql"));
        }
        self.register(id_and_version, Definition::VirtualTable(defining_sql))
    }

    /// Remove an object's definition
    pub fn drop_object(&self, id_and_version: &IdAndVersion) -> Result<()> {
        if self.entries.write().remove(id_and_version).is_none() {
            return Err(Error::TableNotFound(id_and_version.to_string()));
        }
        tracing::debug!(object = %id_and_version, "dropped definition");
        Ok(())
    }

    /// Record a change to an object, returning the change number assigned
    pub fn record_change(&self, id_and_version: &IdAndVersion) -> Result<i64> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(id_and_version)
            .ok_or_else(|| Error::TableNotFound(id_and_version.to_string()))?;
        let change_number = self.next_change_number();
        entry.last_change_number = Some(change_number);
        tracing::trace!(object = %id_and_version, change_number, "recorded change");
        Ok(change_number)
    }

    pub fn contains(&self, id_and_version: &IdAndVersion) -> bool {
        self.entries.read().contains_key(id_and_version)
    }

    pub fn get_definition(&self, id_and_version: &IdAndVersion) -> Option<Definition> {
        self.entries
            .read()
            .get(id_and_version)
            .map(|entry| entry.definition.clone())
    }

    pub fn get_last_change_number(&self, id_and_version: &IdAndVersion) -> Option<i64> {
        self.entries
            .read()
            .get(id_and_version)
            .and_then(|entry| entry.last_change_number)
    }

    /// List all registered objects in identifier order
    pub fn list_objects(&self) -> Vec<IdAndVersion> {
        let mut ids: Vec<IdAndVersion> = self.entries.read().keys().copied().collect();
        ids.sort();
        ids
    }

    /// Resolve an object and everything it reads from into a description
    /// graph, with recorded change numbers attached at every node.
    pub fn get_index_description(&self, id_and_version: &IdAndVersion) -> Result<IndexDescription> {
        self.resolve(id_and_version, &[])
    }

    fn resolve(
        &self,
        id_and_version: &IdAndVersion,
        path: &[IdAndVersion],
    ) -> Result<IndexDescription> {
        if path.contains(id_and_version) {
            return Err(Error::InvalidArgument(format!(
                "Circular definition: {} depends on itself",
                id_and_version
            )));
        }

        // Clone out so the lock is not held while resolving sources
        let entry = self
            .entries
            .read()
            .get(id_and_version)
            .cloned()
            .ok_or_else(|| Error::TableNotFound(id_and_version.to_string()))?;

        let mut path = path.to_vec();
        path.push(*id_and_version);

        let description = match entry.definition {
            Definition::Table => IndexDescription::table(*id_and_version),
            Definition::View(kind) => IndexDescription::view(*id_and_version, kind)?,
            Definition::MaterializedView(sources) => {
                let dependencies = sources
                    .iter()
                    .map(|source| self.resolve(source, &path))
                    .collect::<Result<Vec<_>>>()?;
                IndexDescription::materialized_view(*id_and_version, dependencies)
            }
            Definition::VirtualTable(defining_sql) => {
                let lookup = |source: &IdAndVersion| self.resolve(source, &path);
                IndexDescription::virtual_table(*id_and_version, defining_sql, &lookup)?
            }
        };

        Ok(match entry.last_change_number {
            Some(change_number) => description.with_last_change_number(change_number),
            None => description,
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexDescriptionLookup for Catalog {
    fn get_index_description(&self, id_and_version: &IdAndVersion) -> Result<IndexDescription> {
        Catalog::get_index_description(self, id_and_version)
    }
}
