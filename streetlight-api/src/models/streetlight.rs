use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

use super::StreetlightId;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightStatus {
    /// Lamp is lit
    On,
    /// Lamp is dark
    #[default]
    Off,
}

impl From<&str> for LightStatus {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("on") {
            LightStatus::On
        } else {
            LightStatus::Off
        }
    }
}

impl From<bool> for LightStatus {
    fn from(on: bool) -> Self {
        if on { LightStatus::On } else { LightStatus::Off }
    }
}

impl core::fmt::Display for LightStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            LightStatus::On => write!(f, "on"),
            LightStatus::Off => write!(f, "off"),
        }
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightMode {
    /// Device decides from its darkness and motion sensors
    #[default]
    Automatic,
    /// Device follows the operator's manual state
    Manual,
}

impl From<&str> for LightMode {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("manual") {
            LightMode::Manual
        } else {
            LightMode::Automatic
        }
    }
}

impl core::fmt::Display for LightMode {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            LightMode::Automatic => write!(f, "automatic"),
            LightMode::Manual => write!(f, "manual"),
        }
    }
}

/// One device as read from the realtime database.
///
/// Every field except `id` is optional in the stored payload. Missing or
/// malformed values fall back to the defaults of [`StreetlightRecord::new`]
/// instead of failing the whole snapshot.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetlightRecord {
    /// Device identifier
    pub id: StreetlightId,
    /// Current lamp state
    pub status: LightStatus,
    /// Control mode
    pub mode: LightMode,
    /// Ambient light sensor reports darkness
    pub is_dark: bool,
    /// Motion sensor triggered
    pub motion_detected: bool,
    /// Device reported connectivity recently
    pub online: bool,
    /// Last report time as written by the device (ISO-8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    /// Last report time in epoch milliseconds
    pub timestamp: i64,
    /// Operator override written by manual control
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_state: Option<bool>,
}

impl StreetlightRecord {
    pub fn new(id: impl Into<StreetlightId>) -> Self {
        Self {
            id: id.into(),
            status: LightStatus::Off,
            mode: LightMode::Automatic,
            is_dark: false,
            motion_detected: false,
            online: false,
            last_update: None,
            timestamp: 0,
            manual_state: None,
        }
    }

    /// Builds a record from one `<id> → payload` entry of the device collection.
    pub fn from_entry(id: impl Into<StreetlightId>, value: &Value) -> Self {
        let mut record = Self::new(id);

        let Some(fields) = value.as_object() else {
            return record;
        };

        if let Some(status) = fields.get("status").and_then(lenient_status) {
            record.status = status;
        }
        if let Some(mode) = fields.get("mode").and_then(Value::as_str) {
            record.mode = LightMode::from(mode);
        }
        record.is_dark = flag(fields, "isDark");
        record.motion_detected = flag(fields, "motionDetected");
        record.online = flag(fields, "online");
        record.last_update = fields
            .get("lastUpdate")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned);
        record.timestamp = fields.get("timestamp").and_then(lenient_i64).unwrap_or(0);
        record.manual_state = fields.get("manualState").and_then(lenient_bool);

        record
    }

    /// `lastUpdate` parsed as a point in time. Offset-less timestamps are read as UTC.
    pub fn last_update_at(&self) -> Option<OffsetDateTime> {
        let raw = self.last_update.as_deref()?;

        OffsetDateTime::parse(raw, &Rfc3339)
            .or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
            .or_else(|_| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(|dt| dt.assume_utc()))
            .ok()
    }

    pub fn is_on(&self) -> bool {
        self.status == LightStatus::On
    }
}

/// Normalizes the whole device collection into records.
///
/// The database answers `null` for an empty collection and may answer with an
/// array when every key is a small integer; both are handled, and array holes
/// are skipped.
pub fn records_from_collection(value: &Value) -> Vec<StreetlightRecord> {
    match value {
        Value::Object(entries) => entries
            .iter()
            .map(|(id, payload)| StreetlightRecord::from_entry(id.as_str(), payload))
            .collect(),
        Value::Array(entries) => entries
            .iter()
            .enumerate()
            .filter(|(_, payload)| !payload.is_null())
            .map(|(index, payload)| StreetlightRecord::from_entry(index.to_string(), payload))
            .collect(),
        _ => Vec::new(),
    }
}

fn flag(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).and_then(lenient_bool).unwrap_or(false)
}

fn lenient_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim() {
            t if t.eq_ignore_ascii_case("true") || t == "1" => Some(true),
            t if t.eq_ignore_ascii_case("false") || t == "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn lenient_status(value: &Value) -> Option<LightStatus> {
    match value {
        Value::String(s) => Some(LightStatus::from(s.as_str())),
        Value::Bool(b) => Some(LightStatus::from(*b)),
        _ => None,
    }
}

fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotState {
    /// No refresh cycle has completed yet
    Pending,
    /// Latest snapshot holds at least one device
    Ready,
    /// Latest snapshot succeeded but the collection is empty
    Empty,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshFailure {
    /// Error reported by the last failed refresh cycle
    pub message: String,
    /// Time of the failed cycle
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    /// Snapshot availability
    pub state: SnapshotState,
    /// Devices of the latest successful refresh
    pub records: Vec<StreetlightRecord>,
    /// Time of the latest successful refresh
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub fetched_at: Option<OffsetDateTime>,
    /// Set when the most recent refresh failed; the records are then stale
    #[serde(default)]
    pub last_error: Option<RefreshFailure>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreetlightDetailResponse {
    /// Device data
    #[serde(flatten)]
    pub record: StreetlightRecord,
    /// `lastUpdate` when it parses as a timestamp
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_update_at: Option<OffsetDateTime>,
    /// Manual on/off is only offered while the device is in manual mode
    pub manual_control: bool,
}
