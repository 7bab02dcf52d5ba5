//! Identifier of a table-like object, optionally pinned to a version

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SYN_PREFIX: &str = "syn";

/// Identifies a table, view, materialized view, or virtual table.
///
/// Ordering is by `id`, then by `version`, with the unversioned form sorting
/// before any pinned version of the same object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdAndVersion {
    pub id: i64,
    pub version: Option<i64>,
}

impl IdAndVersion {
    pub fn new(id: i64, version: Option<i64>) -> Self {
        IdAndVersion { id, version }
    }

    /// An identifier that always refers to the current version
    pub fn current(id: i64) -> Self {
        IdAndVersion { id, version: None }
    }

    pub fn versioned(id: i64, version: i64) -> Self {
        IdAndVersion {
            id,
            version: Some(version),
        }
    }

    /// Name of the physical index table backing this object
    pub fn table_name(&self) -> String {
        match self.version {
            Some(version) => format!("T{}_{}", self.id, version),
            None => format!("T{}", self.id),
        }
    }
}

impl fmt::Display for IdAndVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(version) => write!(f, "{}{}.{}", SYN_PREFIX, self.id, version),
            None => write!(f, "{}{}", SYN_PREFIX, self.id),
        }
    }
}

impl FromStr for IdAndVersion {
    type Err = Error;

    /// Accepts `syn123`, `123`, and `syn123.4` (prefix is case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || Error::InvalidArgument(format!("Invalid table identifier: '{}'", s));

        let body = if trimmed
            .get(..SYN_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SYN_PREFIX))
        {
            &trimmed[SYN_PREFIX.len()..]
        } else {
            trimmed
        };

        let (id_part, version_part) = match body.split_once('.') {
            Some((id, version)) => (id, Some(version)),
            None => (body, None),
        };

        let parse_number = |part: &str| -> Result<i64> {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<i64>().map_err(|_| invalid())
        };

        let id = parse_number(id_part)?;
        let version = version_part.map(parse_number).transpose()?;
        Ok(IdAndVersion { id, version })
    }
}

impl From<i64> for IdAndVersion {
    fn from(id: i64) -> Self {
        IdAndVersion::current(id)
    }
}
