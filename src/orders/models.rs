use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use validator::Validate;

// ========== INBOUND (SHOPIFY) ==========

/// Order record as posted by the order source
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocalOrder {
    #[validate(length(min = 1, message = "order name must not be empty"))]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound webhook body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderBatch {
    #[validate]
    pub orders: Vec<LocalOrder>,
}

impl OrderBatch {
    /// First order name that appears more than once, if any
    pub fn duplicate_name(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::with_capacity(self.orders.len());
        self.orders
            .iter()
            .map(|order| order.name.as_str())
            .find(|name| !seen.insert(*name))
    }
}

// ========== REMOTE (CIN7) ==========

/// Cin7 sales order identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteOrderId(pub i64);

impl fmt::Display for RemoteOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subset of a Cin7 sales order needed for matching
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOrder {
    pub id: RemoteOrderId,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub dispatched_date: Option<DateTime<Utc>>,
}

impl RemoteOrder {
    pub fn is_dispatched(&self) -> bool {
        self.dispatched_date.is_some()
    }
}

/// Dispatch update for a single Cin7 sales order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub id: RemoteOrderId,
    #[serde(serialize_with = "serialize_timestamp")]
    pub dispatched_date: DateTime<Utc>,
}

/// An update the platform did not apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUpdate {
    pub id: RemoteOrderId,
    pub reason: String,
}

/// Per-item result of submitting a set of updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub updated: Vec<RemoteOrderId>,
    pub failed: Vec<FailedUpdate>,
}

impl UpdateReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn merge(&mut self, other: UpdateReport) {
        self.updated.extend(other.updated);
        self.failed.extend(other.failed);
    }
}

// ========== TIMESTAMP FORMATS ==========

/// Second-precision UTC timestamp, e.g. `2024-01-10T00:00:00Z`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

/// Parses RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` taken as UTC
pub fn parse_remote_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_remote_timestamp(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", value))),
    }
}
