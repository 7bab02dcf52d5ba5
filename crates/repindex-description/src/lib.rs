//! Repindex Description - compiling table-like objects into index SQL
//!
//! An [`IndexDescription`] describes one table, view, materialized view, or
//! virtual table. From it callers get:
//! - the `CREATE TABLE` statement for the object's index table
//! - the benefactor columns used for ACL-scoped row filtering
//! - the identity columns to splice into a generated SELECT
//! - a hash over the dependency graph that changes whenever any upstream
//!   object changes, used to invalidate cached query results
//!
//! Descriptions are immutable values. Nothing here executes SQL.

mod benefactor;
mod column;
mod dependency;
mod hash;
mod materialized_view;
mod table;
mod view;
mod virtual_table;

pub use benefactor::BenefactorDescription;
pub use column::{ColumnToAdd, ROW_BENEFACTOR, ROW_ETAG, ROW_ID, ROW_VERSION};
pub use dependency::TableDependency;
pub use hash::table_hash_input;
pub use materialized_view::{dependency_alias, MaterializedViewIndexDescription};
pub use table::TableIndexDescription;
pub use view::ViewIndexDescription;
pub use virtual_table::{
    VirtualTableIndexDescription, JOIN_NOT_SUPPORTED_IN_THIS_CONTEXT_MESSAGE,
    NO_SOURCE_TABLE_MESSAGE, SELF_REFERENCE_MESSAGE,
};

use repindex_common::{Error, IdAndVersion, Result, SqlContext, TableType};

/// Resolves an identifier to its index description
pub trait IndexDescriptionLookup {
    fn get_index_description(&self, id_and_version: &IdAndVersion) -> Result<IndexDescription>;
}

impl<F> IndexDescriptionLookup for F
where
    F: Fn(&IdAndVersion) -> Result<IndexDescription>,
{
    fn get_index_description(&self, id_and_version: &IdAndVersion) -> Result<IndexDescription> {
        self(id_and_version)
    }
}

/// Description of a table-like object's index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexDescription {
    Table(TableIndexDescription),
    View(ViewIndexDescription),
    MaterializedView(MaterializedViewIndexDescription),
    VirtualTable(VirtualTableIndexDescription),
}

impl IndexDescription {
    pub fn table(id_and_version: IdAndVersion) -> Self {
        IndexDescription::Table(TableIndexDescription::new(id_and_version))
    }

    pub fn view(id_and_version: IdAndVersion, view_kind: TableType) -> Result<Self> {
        ViewIndexDescription::new(id_and_version, view_kind).map(IndexDescription::View)
    }

    pub fn materialized_view(
        id_and_version: IdAndVersion,
        dependencies: Vec<IndexDescription>,
    ) -> Self {
        IndexDescription::MaterializedView(MaterializedViewIndexDescription::new(
            id_and_version,
            dependencies,
        ))
    }

    pub fn virtual_table(
        id_and_version: IdAndVersion,
        defining_sql: impl Into<String>,
        lookup: &dyn IndexDescriptionLookup,
    ) -> Result<Self> {
        VirtualTableIndexDescription::new(id_and_version, defining_sql, lookup)
            .map(IndexDescription::VirtualTable)
    }

    pub fn get_id_and_version(&self) -> IdAndVersion {
        match self {
            IndexDescription::Table(table) => table.id_and_version(),
            IndexDescription::View(view) => view.id_and_version(),
            IndexDescription::MaterializedView(view) => view.id_and_version(),
            IndexDescription::VirtualTable(table) => table.id_and_version(),
        }
    }

    pub fn get_table_type(&self) -> TableType {
        match self {
            IndexDescription::Table(_) => TableType::Table,
            IndexDescription::View(view) => view.view_kind(),
            IndexDescription::MaterializedView(_) => TableType::MaterializedView,
            IndexDescription::VirtualTable(_) => TableType::VirtualTable,
        }
    }

    /// The `CREATE TABLE IF NOT EXISTS` statement for this object's index.
    ///
    /// Fails for a virtual table, which has no index of its own.
    pub fn get_create_or_update_index_sql(&self) -> Result<String> {
        match self {
            IndexDescription::Table(table) => Ok(table.create_or_update_index_sql()),
            IndexDescription::View(view) => Ok(view.create_or_update_index_sql()),
            IndexDescription::MaterializedView(view) => Ok(view.create_or_update_index_sql()),
            IndexDescription::VirtualTable(table) => Err(Error::UnsupportedOperation(format!(
                "Virtual table {} does not have an index",
                table.id_and_version()
            ))),
        }
    }

    pub fn get_benefactors(&self) -> Vec<BenefactorDescription> {
        match self {
            IndexDescription::Table(_) | IndexDescription::VirtualTable(_) => Vec::new(),
            IndexDescription::View(view) => vec![view.benefactor().clone()],
            IndexDescription::MaterializedView(view) => view.benefactors().to_vec(),
        }
    }

    /// Columns to add to a generated SELECT over this object
    pub fn get_column_names_to_add_to_select(
        &self,
        context: SqlContext,
        include_etag: bool,
        is_aggregate: bool,
    ) -> Result<Vec<ColumnToAdd>> {
        match self {
            IndexDescription::Table(table) => {
                table.column_names_to_add_to_select(context, is_aggregate)
            }
            IndexDescription::View(view) => {
                view.column_names_to_add_to_select(context, include_etag, is_aggregate)
            }
            IndexDescription::MaterializedView(view) => {
                Ok(view.column_names_to_add_to_select(context, is_aggregate))
            }
            IndexDescription::VirtualTable(_) => Ok(Vec::new()),
        }
    }

    pub fn get_dependencies(&self) -> &[IndexDescription] {
        match self {
            IndexDescription::Table(_) | IndexDescription::View(_) => &[],
            IndexDescription::MaterializedView(view) => view.dependencies(),
            IndexDescription::VirtualTable(table) => std::slice::from_ref(table.source()),
        }
    }

    pub fn get_last_table_change_number(&self) -> Option<i64> {
        match self {
            IndexDescription::Table(table) => table.last_change_number(),
            IndexDescription::View(view) => view.last_change_number(),
            IndexDescription::MaterializedView(view) => view.last_change_number(),
            IndexDescription::VirtualTable(table) => table.last_change_number(),
        }
    }

    /// A copy of this description that reports `change_number` as its last change
    pub fn with_last_change_number(mut self, change_number: i64) -> Self {
        match &mut self {
            IndexDescription::Table(table) => table.set_last_change_number(change_number),
            IndexDescription::View(view) => view.set_last_change_number(change_number),
            IndexDescription::MaterializedView(view) => view.set_last_change_number(change_number),
            IndexDescription::VirtualTable(table) => table.set_last_change_number(change_number),
        }
        self
    }

    /// MD5 over the change numbers of this object and everything it depends on
    pub fn get_table_hash(&self) -> String {
        hash::table_hash(self)
    }

    /// Rewrites a query against this object before translation
    pub fn preprocess_query(&self, sql: &str) -> String {
        match self {
            IndexDescription::VirtualTable(table) => table.preprocess_query(sql),
            _ => sql.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repindex_common::ObjectType;

    fn id(id: i64) -> IdAndVersion {
        IdAndVersion::current(id)
    }

    fn entity_view(view_id: i64) -> IndexDescription {
        IndexDescription::view(id(view_id), TableType::EntityView).unwrap()
    }

    fn sql_of(columns: &[ColumnToAdd]) -> Vec<&str> {
        columns.iter().map(|c| c.sql.as_str()).collect()
    }

    /// Every lookup resolves to a plain table with the requested id
    fn table_lookup(id_and_version: &IdAndVersion) -> Result<IndexDescription> {
        Ok(IndexDescription::table(*id_and_version))
    }

    // ============================================
    // Table
    // ============================================

    #[test]
    fn test_table_create_sql() {
        let table = IndexDescription::table(id(999));
        assert_eq!(
            table.get_create_or_update_index_sql().unwrap(),
            "CREATE TABLE IF NOT EXISTS T999( ROW_ID BIGINT NOT NULL, ROW_VERSION BIGINT NOT NULL, PRIMARY KEY (ROW_ID))"
        );
    }

    #[test]
    fn test_table_create_sql_with_version() {
        let table = IndexDescription::table(IdAndVersion::versioned(999, 3));
        assert_eq!(
            table.get_create_or_update_index_sql().unwrap(),
            "CREATE TABLE IF NOT EXISTS T999_3( ROW_ID BIGINT NOT NULL, ROW_VERSION BIGINT NOT NULL, PRIMARY KEY (ROW_ID))"
        );
    }

    #[test]
    fn test_table_basics() {
        let table = IndexDescription::table(id(1));
        assert_eq!(table.get_table_type(), TableType::Table);
        assert!(table.get_benefactors().is_empty());
        assert!(table.get_dependencies().is_empty());
        assert_eq!(table.get_last_table_change_number(), None);
        assert_eq!(table.preprocess_query("select * from syn1"), "select * from syn1");
    }

    #[test]
    fn test_table_query_columns() {
        let table = IndexDescription::table(id(1));
        let columns = table
            .get_column_names_to_add_to_select(SqlContext::Query, true, false)
            .unwrap();
        assert_eq!(
            columns,
            vec![
                ColumnToAdd::new(id(1), ROW_ID),
                ColumnToAdd::new(id(1), ROW_VERSION),
            ]
        );
    }

    #[test]
    fn test_table_query_columns_aggregate() {
        let table = IndexDescription::table(id(1));
        let columns = table
            .get_column_names_to_add_to_select(SqlContext::Query, false, true)
            .unwrap();
        assert!(columns.is_empty());
    }

    #[test]
    fn test_table_build_columns_unsupported() {
        let table = IndexDescription::table(id(1));
        for (etag, aggregate) in [(false, false), (true, false), (false, true), (true, true)] {
            let result = table.get_column_names_to_add_to_select(SqlContext::Build, etag, aggregate);
            assert!(matches!(result, Err(Error::UnsupportedOperation(_))));
        }
    }

    // ============================================
    // View
    // ============================================

    #[test]
    fn test_view_create_sql() {
        let view = entity_view(999);
        assert_eq!(
            view.get_create_or_update_index_sql().unwrap(),
            "CREATE TABLE IF NOT EXISTS T999( ROW_ID BIGINT NOT NULL, ROW_VERSION BIGINT NOT NULL, \
             ROW_ETAG varchar(36) NOT NULL, ROW_BENEFACTOR BIGINT NOT NULL, PRIMARY KEY (ROW_ID), \
             UNIQUE KEY `IDX_ETAG` (ROW_ETAG), KEY `IDX_BENEFACTOR` (ROW_BENEFACTOR))"
        );
    }

    #[test]
    fn test_view_benefactors() {
        let view = entity_view(1);
        assert_eq!(
            view.get_benefactors(),
            vec![BenefactorDescription::new("ROW_BENEFACTOR", ObjectType::Entity)]
        );

        let submission_view = IndexDescription::view(id(2), TableType::SubmissionView).unwrap();
        assert_eq!(
            submission_view.get_benefactors(),
            vec![BenefactorDescription::new("ROW_BENEFACTOR", ObjectType::Evaluation)]
        );
        assert_eq!(submission_view.get_table_type(), TableType::SubmissionView);
    }

    #[test]
    fn test_view_rejects_non_view_kind() {
        for kind in [TableType::Table, TableType::MaterializedView, TableType::VirtualTable] {
            let result = IndexDescription::view(id(1), kind);
            assert!(matches!(result, Err(Error::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_view_query_columns() {
        let view = entity_view(1);
        let with_etag = view
            .get_column_names_to_add_to_select(SqlContext::Query, true, false)
            .unwrap();
        assert_eq!(sql_of(&with_etag), vec!["ROW_ID", "ROW_VERSION", "ROW_ETAG"]);

        let without_etag = view
            .get_column_names_to_add_to_select(SqlContext::Query, false, false)
            .unwrap();
        assert_eq!(sql_of(&without_etag), vec!["ROW_ID", "ROW_VERSION"]);

        let aggregate = view
            .get_column_names_to_add_to_select(SqlContext::Query, true, true)
            .unwrap();
        assert!(aggregate.is_empty());
    }

    #[test]
    fn test_view_build_columns_unsupported() {
        let view = entity_view(1);
        let result = view.get_column_names_to_add_to_select(SqlContext::Build, false, false);
        assert!(matches!(result, Err(Error::UnsupportedOperation(_))));
    }

    // ============================================
    // Materialized view
    // ============================================

    #[test]
    fn test_materialized_view_over_table() {
        let view = IndexDescription::materialized_view(id(3), vec![IndexDescription::table(id(1))]);
        assert!(view.get_benefactors().is_empty());
        assert_eq!(
            view.get_create_or_update_index_sql().unwrap(),
            "CREATE TABLE IF NOT EXISTS T3( ROW_ID BIGINT NOT NULL AUTO_INCREMENT, ROW_VERSION BIGINT NOT NULL DEFAULT 0, PRIMARY KEY (ROW_ID))"
        );
        assert_eq!(view.get_table_type(), TableType::MaterializedView);
    }

    #[test]
    fn test_materialized_view_over_two_views() {
        let view = IndexDescription::materialized_view(id(3), vec![entity_view(1), entity_view(2)]);
        assert_eq!(
            view.get_benefactors(),
            vec![
                BenefactorDescription::new("ROW_BENEFACTOR_A0", ObjectType::Entity),
                BenefactorDescription::new("ROW_BENEFACTOR_A1", ObjectType::Entity),
            ]
        );
        assert_eq!(
            view.get_create_or_update_index_sql().unwrap(),
            "CREATE TABLE IF NOT EXISTS T3( ROW_ID BIGINT NOT NULL AUTO_INCREMENT, ROW_VERSION BIGINT NOT NULL DEFAULT 0, \
             ROW_BENEFACTOR_A0 BIGINT NOT NULL, ROW_BENEFACTOR_A1 BIGINT NOT NULL, PRIMARY KEY (ROW_ID), \
             KEY (ROW_BENEFACTOR_A0), KEY (ROW_BENEFACTOR_A1))"
        );
    }

    #[test]
    fn test_materialized_view_over_nested_materialized_view() {
        let inner = IndexDescription::materialized_view(id(3), vec![entity_view(1), entity_view(2)]);
        let outer = IndexDescription::materialized_view(id(4), vec![inner]);
        let names: Vec<String> = outer
            .get_benefactors()
            .into_iter()
            .map(|b| b.column_name)
            .collect();
        assert_eq!(names, vec!["ROW_BENEFACTOR_A0_A0", "ROW_BENEFACTOR_A1_A0"]);
    }

    #[test]
    fn test_materialized_view_benefactor_count_matches_dependencies() {
        let submission_view = IndexDescription::view(id(5), TableType::SubmissionView).unwrap();
        let view = IndexDescription::materialized_view(
            id(6),
            vec![IndexDescription::table(id(1)), entity_view(2), submission_view],
        );
        let expected: usize = view
            .get_dependencies()
            .iter()
            .map(|d| d.get_benefactors().len())
            .sum();
        let benefactors = view.get_benefactors();
        assert_eq!(benefactors.len(), expected);
        assert_eq!(
            benefactors,
            vec![
                BenefactorDescription::new("ROW_BENEFACTOR_A1", ObjectType::Entity),
                BenefactorDescription::new("ROW_BENEFACTOR_A2", ObjectType::Evaluation),
            ]
        );
    }

    #[test]
    fn test_materialized_view_query_columns() {
        let view = IndexDescription::materialized_view(id(3), vec![entity_view(1)]);
        let columns = view
            .get_column_names_to_add_to_select(SqlContext::Query, true, false)
            .unwrap();
        assert_eq!(
            columns,
            vec![
                ColumnToAdd::new(id(3), ROW_ID),
                ColumnToAdd::new(id(3), ROW_VERSION),
            ]
        );
    }

    #[test]
    fn test_materialized_view_build_columns() {
        let view = IndexDescription::materialized_view(
            id(3),
            vec![entity_view(1), IndexDescription::table(id(7)), entity_view(2)],
        );
        let columns = view
            .get_column_names_to_add_to_select(SqlContext::Build, false, false)
            .unwrap();
        assert_eq!(
            columns,
            vec![
                ColumnToAdd::new(id(1), "IFNULL(_A0.ROW_BENEFACTOR,-1)"),
                ColumnToAdd::new(id(2), "IFNULL(_A2.ROW_BENEFACTOR,-1)"),
            ]
        );
    }

    #[test]
    fn test_materialized_view_build_columns_default_missing_benefactor() {
        let view = IndexDescription::materialized_view(
            id(3),
            vec![IndexDescription::table(id(1)), entity_view(2)],
        );
        assert_eq!(
            view.get_column_names_to_add_to_select(SqlContext::Build, false, false)
                .unwrap(),
            vec![ColumnToAdd::new(id(2), "IFNULL(_A1.ROW_BENEFACTOR,-1)")]
        );
    }

    #[test]
    fn test_materialized_view_table_dependencies() {
        let view = IndexDescription::materialized_view(id(3), vec![entity_view(1), entity_view(2)]);
        let IndexDescription::MaterializedView(inner) = &view else {
            panic!("expected a materialized view");
        };
        let aliases: Vec<Option<String>> = inner
            .table_dependencies()
            .into_iter()
            .map(|d| d.alias)
            .collect();
        assert_eq!(aliases, vec![Some("_A0".to_string()), Some("_A1".to_string())]);
    }

    // ============================================
    // Virtual table
    // ============================================

    #[test]
    fn test_virtual_table_preprocess_query() {
        let sql = "select foo, sum(bar) from syn1 group by foo";
        let table = IndexDescription::virtual_table(id(2), sql, &table_lookup).unwrap();
        assert_eq!(
            table.preprocess_query("select * from syn2 where foo > 2"),
            format!("WITH syn2 AS ({}) select * from syn2 where foo > 2", sql)
        );
    }

    #[test]
    fn test_virtual_table_dependencies() {
        let table =
            IndexDescription::virtual_table(id(2), "select foo from syn1", &table_lookup).unwrap();
        assert_eq!(table.get_dependencies(), &[IndexDescription::table(id(1))]);
        assert_eq!(table.get_table_type(), TableType::VirtualTable);
        assert!(table.get_benefactors().is_empty());
    }

    #[test]
    fn test_virtual_table_has_no_index() {
        let table =
            IndexDescription::virtual_table(id(2), "select foo from syn1", &table_lookup).unwrap();
        let result = table.get_create_or_update_index_sql();
        assert!(matches!(result, Err(Error::UnsupportedOperation(_))));
    }

    #[test]
    fn test_virtual_table_columns_always_empty() {
        let table =
            IndexDescription::virtual_table(id(2), "select foo from syn1", &table_lookup).unwrap();
        for context in [SqlContext::Query, SqlContext::Build] {
            let columns = table
                .get_column_names_to_add_to_select(context, true, false)
                .unwrap();
            assert!(columns.is_empty());
        }
    }

    #[test]
    fn test_virtual_table_self_reference() {
        let result = IndexDescription::virtual_table(id(2), "select foo from syn2", &table_lookup);
        assert_eq!(
            result.unwrap_err(),
            Error::InvalidArgument(SELF_REFERENCE_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_virtual_table_unquoted_versioned_source() {
        let table = IndexDescription::virtual_table(id(9), "select * from syn1.3", &table_lookup)
            .unwrap();
        assert_eq!(
            table.get_dependencies(),
            &[IndexDescription::table(IdAndVersion::versioned(1, 3))]
        );
        assert_eq!(
            table.preprocess_query("select * from syn9"),
            "WITH syn9 AS (select * from syn1.3) select * from syn9"
        );
    }

    #[test]
    fn test_virtual_table_versioned_self_reference() {
        let result = IndexDescription::virtual_table(
            IdAndVersion::versioned(1, 3),
            "select * from syn1.3",
            &table_lookup,
        );
        assert_eq!(
            result.unwrap_err(),
            Error::InvalidArgument(SELF_REFERENCE_MESSAGE.to_string())
        );

        // A different version of the same table is a valid source
        let table = IndexDescription::virtual_table(
            IdAndVersion::versioned(1, 4),
            "select * from syn1.3",
            &table_lookup,
        )
        .unwrap();
        assert_eq!(
            table.get_dependencies()[0].get_id_and_version(),
            IdAndVersion::versioned(1, 3)
        );
    }

    #[test]
    fn test_virtual_table_join() {
        let result = IndexDescription::virtual_table(
            id(3),
            "select * from syn1 a join syn2 b on a.foo = b.foo",
            &table_lookup,
        );
        assert_eq!(
            result.unwrap_err(),
            Error::InvalidArgument(JOIN_NOT_SUPPORTED_IN_THIS_CONTEXT_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_virtual_table_no_source() {
        let result = IndexDescription::virtual_table(id(3), "select 1", &table_lookup);
        assert_eq!(
            result.unwrap_err(),
            Error::InvalidArgument(NO_SOURCE_TABLE_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_virtual_table_blank_sql() {
        let result = IndexDescription::virtual_table(id(3), "  ", &table_lookup);
        assert_eq!(result.unwrap_err(), Error::required("definingSql"));
    }

    #[test]
    fn test_virtual_table_unparseable_sql() {
        let result = IndexDescription::virtual_table(id(3), "select * from", &table_lookup);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_virtual_table_lookup_called_once() {
        let calls = std::cell::Cell::new(0);
        let lookup = |id_and_version: &IdAndVersion| -> Result<IndexDescription> {
            calls.set(calls.get() + 1);
            IndexDescription::view(*id_and_version, TableType::EntityView)
        };
        let table = IndexDescription::virtual_table(
            id(2),
            "select foo from syn1 union select foo from syn1",
            &lookup,
        )
        .unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(table.get_dependencies()[0].get_table_type(), TableType::EntityView);
    }

    #[test]
    fn test_virtual_table_lookup_error_propagates() {
        let lookup = |id_and_version: &IdAndVersion| -> Result<IndexDescription> {
            Err(Error::TableNotFound(id_and_version.to_string()))
        };
        let result = IndexDescription::virtual_table(id(2), "select foo from syn1", &lookup);
        assert_eq!(result.unwrap_err(), Error::TableNotFound("syn1".to_string()));
    }

    // ============================================
    // Table hash
    // ============================================

    /// md5("")
    const EMPTY_HASH: &str = "d41d8cd98f00b204e9800998ecf8427e";

    fn graph(
        table_change: Option<i64>,
        view_change: Option<i64>,
        mv_change: Option<i64>,
    ) -> IndexDescription {
        let mut table = IndexDescription::table(id(1));
        if let Some(n) = table_change {
            table = table.with_last_change_number(n);
        }
        let mut view = entity_view(2);
        if let Some(n) = view_change {
            view = view.with_last_change_number(n);
        }
        let mut mv = IndexDescription::materialized_view(id(3), vec![table, view]);
        if let Some(n) = mv_change {
            mv = mv.with_last_change_number(n);
        }
        mv
    }

    #[test]
    fn test_hash_without_change_numbers() {
        assert_eq!(IndexDescription::table(id(1)).get_table_hash(), EMPTY_HASH);
        assert_eq!(graph(None, None, None).get_table_hash(), EMPTY_HASH);
    }

    #[test]
    fn test_hash_single_table() {
        let table = IndexDescription::table(id(123)).with_last_change_number(12);
        assert_eq!(table_hash_input(&table), "+syn123-12");
        // md5("+syn123-12")
        assert_eq!(table.get_table_hash(), "eba2b28a5929d6d5dd166d052bf6e0b4");
    }

    #[test]
    fn test_hash_input_order() {
        let root = graph(Some(10), Some(20), Some(30));
        assert_eq!(table_hash_input(&root), "+syn3-30+syn1-10+syn2-20");
    }

    #[test]
    fn test_hash_recurses_through_node_without_change_number() {
        let root = graph(Some(10), None, None);
        assert_eq!(table_hash_input(&root), "+syn1-10");
        assert_ne!(root.get_table_hash(), EMPTY_HASH);
    }

    #[test]
    fn test_hash_deterministic() {
        let first = graph(Some(1), Some(2), Some(3));
        let second = graph(Some(1), Some(2), Some(3));
        assert_eq!(first.get_table_hash(), second.get_table_hash());
        assert_eq!(first.get_table_hash(), first.get_table_hash());
    }

    #[test]
    fn test_hash_changes_for_ancestors_only() {
        let before_table = IndexDescription::table(id(1)).with_last_change_number(1);
        let after_table = IndexDescription::table(id(1)).with_last_change_number(2);
        let sibling = entity_view(2).with_last_change_number(5);

        let before =
            IndexDescription::materialized_view(id(3), vec![before_table.clone(), sibling.clone()]);
        let after = IndexDescription::materialized_view(id(3), vec![after_table.clone(), sibling]);
        assert_ne!(before.get_table_hash(), after.get_table_hash());
        assert_ne!(before_table.get_table_hash(), after_table.get_table_hash());

        // The sibling does not depend on the table
        let sibling_before = before.get_dependencies()[1].get_table_hash();
        let sibling_after = after.get_dependencies()[1].get_table_hash();
        assert_eq!(sibling_before, sibling_after);
    }

    #[test]
    fn test_hash_through_virtual_table() {
        let lookup = |id_and_version: &IdAndVersion| -> Result<IndexDescription> {
            Ok(IndexDescription::table(*id_and_version).with_last_change_number(4))
        };
        let table = IndexDescription::virtual_table(id(2), "select foo from syn1", &lookup).unwrap();
        assert_eq!(table_hash_input(&table), "+syn1-4");
    }

    #[test]
    fn test_with_last_change_number_keeps_original() {
        let original = IndexDescription::table(id(1));
        let changed = original.clone().with_last_change_number(7);
        assert_eq!(original.get_last_table_change_number(), None);
        assert_eq!(changed.get_last_table_change_number(), Some(7));
    }
}
