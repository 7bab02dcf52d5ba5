//! Index description of a view over replicated objects

use crate::benefactor::BenefactorDescription;
use crate::column::{row_identity_columns, ColumnToAdd, ROW_BENEFACTOR};
use repindex_common::{Error, IdAndVersion, Result, SqlContext, TableType};

/// A view whose rows are copied from the replicated-object table.
///
/// Every row records the benefactor that governs it in `ROW_BENEFACTOR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewIndexDescription {
    id_and_version: IdAndVersion,
    view_kind: TableType,
    benefactor: BenefactorDescription,
    last_change_number: Option<i64>,
}

impl ViewIndexDescription {
    pub fn new(id_and_version: IdAndVersion, view_kind: TableType) -> Result<Self> {
        if !view_kind.is_view() {
            return Err(Error::InvalidArgument(format!(
                "{} is not a view type",
                view_kind
            )));
        }
        Ok(ViewIndexDescription {
            id_and_version,
            view_kind,
            benefactor: BenefactorDescription::new(
                ROW_BENEFACTOR,
                view_kind.benefactor_object_type(),
            ),
            last_change_number: None,
        })
    }

    pub fn id_and_version(&self) -> IdAndVersion {
        self.id_and_version
    }

    pub fn view_kind(&self) -> TableType {
        self.view_kind
    }

    pub fn benefactor(&self) -> &BenefactorDescription {
        &self.benefactor
    }

    pub fn last_change_number(&self) -> Option<i64> {
        self.last_change_number
    }

    pub(crate) fn set_last_change_number(&mut self, change_number: i64) {
        self.last_change_number = Some(change_number);
    }

    pub fn create_or_update_index_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {}( ROW_ID BIGINT NOT NULL, ROW_VERSION BIGINT NOT NULL, \
             ROW_ETAG varchar(36) NOT NULL, ROW_BENEFACTOR BIGINT NOT NULL, PRIMARY KEY (ROW_ID), \
             UNIQUE KEY `IDX_ETAG` (ROW_ETAG), KEY `IDX_BENEFACTOR` (ROW_BENEFACTOR))",
            self.id_and_version.table_name()
        )
    }

    pub fn column_names_to_add_to_select(
        &self,
        context: SqlContext,
        include_etag: bool,
        is_aggregate: bool,
    ) -> Result<Vec<ColumnToAdd>> {
        match context {
            SqlContext::Query => Ok(row_identity_columns(
                self.id_and_version,
                include_etag,
                is_aggregate,
            )),
            SqlContext::Build => Err(Error::UnsupportedOperation(format!(
                "Only the query context is supported for view {}",
                self.id_and_version
            ))),
        }
    }
}
