//! Repindex - index descriptions and view filters for replicated objects
//!
//! Repindex compiles the definitions of tables, views, materialized views,
//! and virtual tables into:
//! - `CREATE TABLE` statements for their index tables
//! - benefactor columns for row-level access filtering
//! - identity columns to splice into generated SELECT lists
//! - table hashes that change whenever anything upstream changes
//!
//! and compiles view scopes into parameterized SQL predicates.
//!
//! # Example
//!
//! ```rust
//! use repindex::{IdAndVersion, ReplicaIndex, TableType};
//!
//! let index = ReplicaIndex::new();
//! let view = IdAndVersion::current(1);
//! index.catalog().create_view(view, TableType::EntityView).unwrap();
//! index.catalog().record_change(&view).unwrap();
//!
//! let sql = index.create_index_sql(&view).unwrap();
//! assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS T1("));
//! assert_eq!(index.table_hash(&view).unwrap().len(), 32);
//! ```

pub use repindex_catalog as catalog;
pub use repindex_common as common;
pub use repindex_description as description;
pub use repindex_filter as filter;
pub use repindex_parser as parser;

pub use repindex_catalog::{Catalog, Definition};
pub use repindex_common::{
    Error, IdAndVersion, ReplicationType, Result, SqlContext, SubType, TableType,
};
pub use repindex_description::{
    BenefactorDescription, ColumnToAdd, IndexDescription, IndexDescriptionLookup,
};
pub use repindex_filter::{FilterScope, ParameterMap, ParameterValue, ViewFilter};

use std::sync::Arc;

/// Compiles index artifacts for the objects registered in a catalog
pub struct ReplicaIndex {
    catalog: Arc<Catalog>,
}

impl ReplicaIndex {
    /// Create an index over a new, empty catalog
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(Catalog::new()))
    }

    /// Create an index over a shared catalog
    pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
        ReplicaIndex { catalog }
    }

    /// Get the catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve an object into its full description graph
    pub fn describe(&self, id_and_version: &IdAndVersion) -> Result<IndexDescription> {
        self.catalog.get_index_description(id_and_version)
    }

    /// The `CREATE TABLE` statement for an object's index table
    pub fn create_index_sql(&self, id_and_version: &IdAndVersion) -> Result<String> {
        self.describe(id_and_version)?.get_create_or_update_index_sql()
    }

    /// Columns to add to a generated SELECT over an object
    pub fn select_columns(
        &self,
        id_and_version: &IdAndVersion,
        context: SqlContext,
        include_etag: bool,
        is_aggregate: bool,
    ) -> Result<Vec<ColumnToAdd>> {
        self.describe(id_and_version)?
            .get_column_names_to_add_to_select(context, include_etag, is_aggregate)
    }

    pub fn benefactors(&self, id_and_version: &IdAndVersion) -> Result<Vec<BenefactorDescription>> {
        Ok(self.describe(id_and_version)?.get_benefactors())
    }

    /// Hash over the change numbers of an object and everything upstream
    pub fn table_hash(&self, id_and_version: &IdAndVersion) -> Result<String> {
        let hash = self.describe(id_and_version)?.get_table_hash();
        tracing::debug!(object = %id_and_version, hash = %hash, "computed table hash");
        Ok(hash)
    }

    /// Rewrite a query against an object before translation
    pub fn preprocess_query(&self, id_and_version: &IdAndVersion, sql: &str) -> Result<String> {
        Ok(self.describe(id_and_version)?.preprocess_query(sql))
    }
}

impl Default for ReplicaIndex {
    fn default() -> Self {
        Self::new()
    }
}
