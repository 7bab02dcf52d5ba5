//! Reserved row columns and columns spliced into generated SELECT lists

use repindex_common::IdAndVersion;

pub const ROW_ID: &str = "ROW_ID";
pub const ROW_VERSION: &str = "ROW_VERSION";
pub const ROW_ETAG: &str = "ROW_ETAG";
pub const ROW_BENEFACTOR: &str = "ROW_BENEFACTOR";

/// A column or expression to add to a generated SELECT, tagged with the
/// table-like object it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnToAdd {
    pub owner: IdAndVersion,
    pub sql: String,
}

impl ColumnToAdd {
    pub fn new(owner: IdAndVersion, sql: impl Into<String>) -> Self {
        ColumnToAdd {
            owner,
            sql: sql.into(),
        }
    }
}

/// Per-row identity columns of a query result.
///
/// Aggregate queries collapse rows, so they carry no identity columns at all.
pub(crate) fn row_identity_columns(
    owner: IdAndVersion,
    include_etag: bool,
    is_aggregate: bool,
) -> Vec<ColumnToAdd> {
    if is_aggregate {
        return Vec::new();
    }
    let mut columns = vec![
        ColumnToAdd::new(owner, ROW_ID),
        ColumnToAdd::new(owner, ROW_VERSION),
    ];
    if include_etag {
        columns.push(ColumnToAdd::new(owner, ROW_ETAG));
    }
    columns
}
