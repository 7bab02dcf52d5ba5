//! Index description of a plain table

use crate::column::{row_identity_columns, ColumnToAdd};
use repindex_common::{Error, IdAndVersion, Result, SqlContext};

/// A table whose rows are written directly by users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIndexDescription {
    id_and_version: IdAndVersion,
    last_change_number: Option<i64>,
}

impl TableIndexDescription {
    pub fn new(id_and_version: IdAndVersion) -> Self {
        TableIndexDescription {
            id_and_version,
            last_change_number: None,
        }
    }

    pub fn id_and_version(&self) -> IdAndVersion {
        self.id_and_version
    }

    pub fn last_change_number(&self) -> Option<i64> {
        self.last_change_number
    }

    pub(crate) fn set_last_change_number(&mut self, change_number: i64) {
        self.last_change_number = Some(change_number);
    }

    pub fn create_or_update_index_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {}( ROW_ID BIGINT NOT NULL, ROW_VERSION BIGINT NOT NULL, PRIMARY KEY (ROW_ID))",
            self.id_and_version.table_name()
        )
    }

    pub fn column_names_to_add_to_select(
        &self,
        context: SqlContext,
        is_aggregate: bool,
    ) -> Result<Vec<ColumnToAdd>> {
        match context {
            SqlContext::Query => Ok(row_identity_columns(
                self.id_and_version,
                false,
                is_aggregate,
            )),
            SqlContext::Build => Err(Error::UnsupportedOperation(format!(
                "Only the query context is supported for table {}",
                self.id_and_version
            ))),
        }
    }
}
