//! Closed domain enums shared by the description and filter crates
//!
//! Text forms match the values stored in the replication tables, so they are
//! part of the SQL/parameter contract and must not change.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a table-like object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    Table,
    EntityView,
    Dataset,
    DatasetCollection,
    SubmissionView,
    MaterializedView,
    VirtualTable,
}

impl TableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::Table => "table",
            TableType::EntityView => "entityview",
            TableType::Dataset => "dataset",
            TableType::DatasetCollection => "datasetcollection",
            TableType::SubmissionView => "submissionview",
            TableType::MaterializedView => "materializedview",
            TableType::VirtualTable => "virtualtable",
        }
    }

    /// True for the kinds whose rows are replicated from source objects
    pub fn is_view(&self) -> bool {
        matches!(
            self,
            TableType::EntityView
                | TableType::Dataset
                | TableType::DatasetCollection
                | TableType::SubmissionView
        )
    }

    /// The object type whose ACL governs the rows of a view of this kind
    pub fn benefactor_object_type(&self) -> ObjectType {
        match self {
            TableType::SubmissionView => ObjectType::Evaluation,
            _ => ObjectType::Entity,
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(TableType::Table),
            "entityview" => Ok(TableType::EntityView),
            "dataset" => Ok(TableType::Dataset),
            "datasetcollection" => Ok(TableType::DatasetCollection),
            "submissionview" => Ok(TableType::SubmissionView),
            "materializedview" => Ok(TableType::MaterializedView),
            "virtualtable" => Ok(TableType::VirtualTable),
            _ => Err(Error::InvalidArgument(format!("Unknown table type: {}", s))),
        }
    }
}

/// The type of object an ACL is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Entity,
    Evaluation,
    EntityContainer,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectType::Entity => write!(f, "ENTITY"),
            ObjectType::Evaluation => write!(f, "EVALUATION"),
            ObjectType::EntityContainer => write!(f, "ENTITY_CONTAINER"),
        }
    }
}

/// Replication category of the rows in the replicated-object table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationType {
    Entity,
    Submission,
}

impl fmt::Display for ReplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplicationType::Entity => write!(f, "ENTITY"),
            ReplicationType::Submission => write!(f, "SUBMISSION"),
        }
    }
}

impl FromStr for ReplicationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "ENTITY" => Ok(ReplicationType::Entity),
            "SUBMISSION" => Ok(ReplicationType::Submission),
            _ => Err(Error::InvalidArgument(format!(
                "Unknown replication type: {}",
                s
            ))),
        }
    }
}

/// Sub-type of a replicated object within its replication category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubType {
    File,
    Folder,
    Project,
    Table,
    EntityView,
    Dataset,
    DatasetCollection,
    MaterializedView,
    VirtualTable,
    SubmissionView,
    DockerRepo,
    Submission,
}

impl SubType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubType::File => "file",
            SubType::Folder => "folder",
            SubType::Project => "project",
            SubType::Table => "table",
            SubType::EntityView => "entityview",
            SubType::Dataset => "dataset",
            SubType::DatasetCollection => "datasetcollection",
            SubType::MaterializedView => "materializedview",
            SubType::VirtualTable => "virtualtable",
            SubType::SubmissionView => "submissionview",
            SubType::DockerRepo => "dockerrepo",
            SubType::Submission => "submission",
        }
    }
}

impl fmt::Display for SubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "file" => Ok(SubType::File),
            "folder" => Ok(SubType::Folder),
            "project" => Ok(SubType::Project),
            "table" => Ok(SubType::Table),
            "entityview" => Ok(SubType::EntityView),
            "dataset" => Ok(SubType::Dataset),
            "datasetcollection" => Ok(SubType::DatasetCollection),
            "materializedview" => Ok(SubType::MaterializedView),
            "virtualtable" => Ok(SubType::VirtualTable),
            "submissionview" => Ok(SubType::SubmissionView),
            "dockerrepo" => Ok(SubType::DockerRepo),
            "submission" => Ok(SubType::Submission),
            _ => Err(Error::InvalidArgument(format!("Unknown sub type: {}", s))),
        }
    }
}

/// Kind of change carried by a `ChangeMessage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Create,
    Update,
    Delete,
}

/// Notification that an object changed and dependants may need re-deriving
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeMessage {
    pub object_id: i64,
    pub object_type: ObjectType,
    pub change_type: ChangeType,
}

impl ChangeMessage {
    /// The "entity container changed" message for one container
    pub fn container_changed(container_id: i64) -> Self {
        ChangeMessage {
            object_id: container_id,
            object_type: ObjectType::EntityContainer,
            change_type: ChangeType::Update,
        }
    }
}

/// Whether columns are requested while building an index or answering a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlContext {
    Build,
    Query,
}

impl fmt::Display for SqlContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlContext::Build => write!(f, "build"),
            SqlContext::Query => write!(f, "query"),
        }
    }
}
