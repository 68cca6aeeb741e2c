use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::{LightMode, LightStatus, StreetlightId};

/// A count out of a total, with the derived percentage.
///
/// `percentage` is `None` when `total` is zero; display code must not
/// present it as `0%`.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    /// Matching devices
    pub count: usize,
    /// Devices in the snapshot
    pub total: usize,
    /// `count / total * 100`, absent for an empty snapshot
    pub percentage: Option<f64>,
}

impl Ratio {
    pub fn new(count: usize, total: usize) -> Self {
        Self {
            count,
            total,
            percentage: crate::analytics::percentage(count, total),
        }
    }
}

impl core::fmt::Display for Ratio {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.percentage {
            Some(percentage) => write!(f, "{} ({:.1}%)", self.count, percentage),
            None => write!(f, "{} (n/a)", self.count),
        }
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UptimeHealth {
    /// More than 80% of the fleet is online
    Good,
    /// 80% or less of the fleet is online
    NeedsAttention,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewResponse {
    /// Devices in the snapshot
    pub total: usize,
    /// Lit devices
    pub lights_on: Ratio,
    /// Dark devices
    pub lights_off: Ratio,
    /// Devices reporting connectivity
    pub online: Ratio,
    /// Device count per lamp state
    pub status_distribution: BTreeMap<LightStatus, usize>,
    /// Device count per control mode
    pub mode_distribution: BTreeMap<LightMode, usize>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Device identifier
    pub id: StreetlightId,
    /// Lamp state at the reported time
    pub status: LightStatus,
    /// Report time in epoch milliseconds
    pub timestamp: i64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    /// Devices in the snapshot
    pub total: usize,
    /// Devices ordered by report time
    pub timeline: Vec<TimelineEntry>,
    /// Devices sensing darkness
    pub dark: Ratio,
    /// Devices sensing daylight
    pub bright: Ratio,
    /// Devices sensing motion
    pub motion: Ratio,
    /// Devices sensing no motion
    pub no_motion: Ratio,
    /// Devices in automatic mode
    pub automatic_mode: Ratio,
    /// Online devices
    pub uptime: Ratio,
    /// Health label for the uptime rate, absent for an empty snapshot
    pub uptime_health: Option<UptimeHealth>,
    /// Devices off while it is bright
    pub energy_efficient: Ratio,
}
