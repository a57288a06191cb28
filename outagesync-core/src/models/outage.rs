//! Outage records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time::parse_timestamp;
use crate::error::CoreError;

/// Outage as it appears on the wire: `{id, begin, end}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageRecord {
    /// Device identifier the outage belongs to.
    pub id: String,
    /// Start of the outage, ISO-8601.
    pub begin: String,
    /// End of the outage, ISO-8601.
    pub end: String,
}

/// A device downtime window.
///
/// The original `begin`/`end` strings are kept untouched so they can be
/// posted back exactly as received; `begin_at`/`end_at` hold the parsed
/// instants used for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OutageRecord", into = "OutageRecord")]
pub struct Outage {
    /// Device identifier.
    pub id: String,
    /// Raw begin timestamp.
    pub begin: String,
    /// Raw end timestamp.
    pub end: String,
    /// Parsed begin timestamp.
    pub begin_at: DateTime<Utc>,
    /// Parsed end timestamp.
    pub end_at: DateTime<Utc>,
}

impl Outage {
    /// Builds an outage from raw strings, validating both timestamps.
    pub fn new(
        id: impl Into<String>,
        begin: impl Into<String>,
        end: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Self::try_from(OutageRecord {
            id: id.into(),
            begin: begin.into(),
            end: end.into(),
        })
    }
}

impl TryFrom<OutageRecord> for Outage {
    type Error = CoreError;

    fn try_from(record: OutageRecord) -> Result<Self, Self::Error> {
        if record.id.is_empty() {
            return Err(CoreError::InvalidData("outage id is empty".to_string()));
        }
        let begin_at = parse_timestamp("begin", &record.begin)?;
        let end_at = parse_timestamp("end", &record.end)?;

        Ok(Self {
            id: record.id,
            begin: record.begin,
            end: record.end,
            begin_at,
            end_at,
        })
    }
}

impl From<Outage> for OutageRecord {
    fn from(outage: Outage) -> Self {
        Self {
            id: outage.id,
            begin: outage.begin,
            end: outage.end,
        }
    }
}
