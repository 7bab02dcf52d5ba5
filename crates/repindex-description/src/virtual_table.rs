//! Index description of a virtual table
//!
//! A virtual table stores nothing. Queries against it are rewritten to inline
//! its defining SQL as a common table expression over exactly one source.

use crate::{IndexDescription, IndexDescriptionLookup};
use repindex_common::{Error, IdAndVersion, Result};

pub const JOIN_NOT_SUPPORTED_IN_THIS_CONTEXT_MESSAGE: &str =
    "The JOIN keyword is not supported in this context";
pub const SELF_REFERENCE_MESSAGE: &str = "A virtual table cannot reference itself";
pub const NO_SOURCE_TABLE_MESSAGE: &str = "The defining SQL must reference a table";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualTableIndexDescription {
    id_and_version: IdAndVersion,
    defining_sql: String,
    source: Box<IndexDescription>,
    last_change_number: Option<i64>,
}

impl VirtualTableIndexDescription {
    /// Binds the virtual table to the single table its defining SQL reads.
    ///
    /// The lookup is called exactly once, for that table.
    pub fn new(
        id_and_version: IdAndVersion,
        defining_sql: impl Into<String>,
        lookup: &dyn IndexDescriptionLookup,
    ) -> Result<Self> {
        let defining_sql = defining_sql.into();
        if defining_sql.trim().is_empty() {
            return Err(Error::required("definingSql"));
        }

        let references = repindex_parser::table_references(&defining_sql).map_err(|e| match e {
            Error::Parse(message) => {
                Error::InvalidArgument(format!("Invalid defining SQL: {}", message))
            }
            other => other,
        })?;

        let source_id = match references.as_slice() {
            [single] => *single,
            [] => return Err(Error::InvalidArgument(NO_SOURCE_TABLE_MESSAGE.to_string())),
            _ => {
                return Err(Error::InvalidArgument(
                    JOIN_NOT_SUPPORTED_IN_THIS_CONTEXT_MESSAGE.to_string(),
                ))
            }
        };

        if source_id == id_and_version {
            return Err(Error::InvalidArgument(SELF_REFERENCE_MESSAGE.to_string()));
        }

        let source = lookup.get_index_description(&source_id)?;
        tracing::debug!(
            virtual_table = %id_and_version,
            source = %source_id,
            "bound virtual table to source"
        );

        Ok(VirtualTableIndexDescription {
            id_and_version,
            defining_sql,
            source: Box::new(source),
            last_change_number: None,
        })
    }

    pub fn id_and_version(&self) -> IdAndVersion {
        self.id_and_version
    }

    pub fn defining_sql(&self) -> &str {
        &self.defining_sql
    }

    pub fn source(&self) -> &IndexDescription {
        &self.source
    }

    pub fn last_change_number(&self) -> Option<i64> {
        self.last_change_number
    }

    pub(crate) fn set_last_change_number(&mut self, change_number: i64) {
        self.last_change_number = Some(change_number);
    }

    pub fn preprocess_query(&self, sql: &str) -> String {
        format!("WITH {} AS ({}) {}", self.id_and_version, self.defining_sql, sql)
    }
}
