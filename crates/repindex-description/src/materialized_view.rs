//! Index description of a materialized view
//!
//! A materialized view joins one or more dependencies. Dependency `i` is
//! addressed as `_A{i}` in the maintenance query, and every benefactor column
//! it carries is copied into the view under the same suffix:
//!
//! ```text
//! dependency 0: view              ROW_BENEFACTOR            -> ROW_BENEFACTOR_A0
//! dependency 1: view              ROW_BENEFACTOR            -> ROW_BENEFACTOR_A1
//! dependency 0: mv of two views   ROW_BENEFACTOR_A0, _A1    -> ROW_BENEFACTOR_A0_A0, ROW_BENEFACTOR_A1_A0
//! ```

use crate::benefactor::BenefactorDescription;
use crate::column::{row_identity_columns, ColumnToAdd};
use crate::dependency::TableDependency;
use crate::IndexDescription;
use repindex_common::{IdAndVersion, SqlContext};

/// Alias of the dependency at `index` in a materialized view's defining query
pub fn dependency_alias(index: usize) -> String {
    format!("_A{}", index)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedViewIndexDescription {
    id_and_version: IdAndVersion,
    dependencies: Vec<IndexDescription>,
    benefactors: Vec<BenefactorDescription>,
    last_change_number: Option<i64>,
}

impl MaterializedViewIndexDescription {
    /// The benefactor columns are derived here, once, from the dependencies
    pub fn new(id_and_version: IdAndVersion, dependencies: Vec<IndexDescription>) -> Self {
        let benefactors: Vec<BenefactorDescription> = dependencies
            .iter()
            .enumerate()
            .flat_map(|(index, dependency)| {
                let alias = dependency_alias(index);
                dependency
                    .get_benefactors()
                    .into_iter()
                    .map(move |benefactor| {
                        BenefactorDescription::new(
                            format!("{}{}", benefactor.column_name, alias),
                            benefactor.object_type,
                        )
                    })
            })
            .collect();

        tracing::debug!(
            view = %id_and_version,
            dependencies = dependencies.len(),
            benefactors = benefactors.len(),
            "described materialized view"
        );

        MaterializedViewIndexDescription {
            id_and_version,
            dependencies,
            benefactors,
            last_change_number: None,
        }
    }

    pub fn id_and_version(&self) -> IdAndVersion {
        self.id_and_version
    }

    pub fn dependencies(&self) -> &[IndexDescription] {
        &self.dependencies
    }

    pub fn benefactors(&self) -> &[BenefactorDescription] {
        &self.benefactors
    }

    pub fn last_change_number(&self) -> Option<i64> {
        self.last_change_number
    }

    pub(crate) fn set_last_change_number(&mut self, change_number: i64) {
        self.last_change_number = Some(change_number);
    }

    /// The dependencies paired with the alias each one has in the defining query
    pub fn table_dependencies(&self) -> Vec<TableDependency> {
        self.dependencies
            .iter()
            .enumerate()
            .map(|(index, dependency)| {
                TableDependency::with_alias(dependency.clone(), dependency_alias(index))
            })
            .collect()
    }

    pub fn create_or_update_index_sql(&self) -> String {
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {}( ROW_ID BIGINT NOT NULL AUTO_INCREMENT, ROW_VERSION BIGINT NOT NULL DEFAULT 0, ",
            self.id_and_version.table_name()
        );
        for benefactor in &self.benefactors {
            sql.push_str(&benefactor.column_name);
            sql.push_str(" BIGINT NOT NULL, ");
        }
        sql.push_str("PRIMARY KEY (ROW_ID)");
        for benefactor in &self.benefactors {
            sql.push_str(", KEY (");
            sql.push_str(&benefactor.column_name);
            sql.push(')');
        }
        sql.push(')');
        sql
    }

    pub fn column_names_to_add_to_select(
        &self,
        context: SqlContext,
        is_aggregate: bool,
    ) -> Vec<ColumnToAdd> {
        match context {
            // Etags are not carried by a materialized view
            SqlContext::Query => row_identity_columns(self.id_and_version, false, is_aggregate),
            // Benefactor columns are NOT NULL; rows missing from an outer join get -1
            SqlContext::Build => self
                .dependencies
                .iter()
                .enumerate()
                .flat_map(|(index, dependency)| {
                    let alias = dependency_alias(index);
                    let owner = dependency.get_id_and_version();
                    dependency
                        .get_benefactors()
                        .into_iter()
                        .map(move |benefactor| {
                            ColumnToAdd::new(
                                owner,
                                format!("IFNULL({}.{},-1)", alias, benefactor.column_name),
                            )
                        })
                })
                .collect(),
        }
    }
}
