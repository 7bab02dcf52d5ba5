//! Benefactor columns

use repindex_common::ObjectType;

/// A physical column holding, per row, the id of the object whose ACL
/// governs that row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BenefactorDescription {
    pub column_name: String,
    pub object_type: ObjectType,
}

impl BenefactorDescription {
    pub fn new(column_name: impl Into<String>, object_type: ObjectType) -> Self {
        BenefactorDescription {
            column_name: column_name.into(),
            object_type,
        }
    }
}
