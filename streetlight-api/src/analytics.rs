//! Aggregations over one snapshot of the fleet.
//!
//! Every function here is pure: the same records, in any order, give the
//! same result.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::models::{
    AnalyticsResponse, LightMode, LightStatus, OverviewResponse, Ratio, StreetlightRecord,
    TimelineEntry, UptimeHealth,
};

/// Uptime rates strictly above this percentage are reported as healthy.
pub const HEALTHY_UPTIME_PERCENTAGE: f64 = 80.0;

pub fn count_by<F>(records: &[StreetlightRecord], predicate: F) -> usize
where
    F: Fn(&StreetlightRecord) -> bool,
{
    records.iter().filter(|record| predicate(record)).count()
}

/// `count / total * 100`, or `None` for an empty total.
pub fn percentage(count: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }

    Some(count as f64 / total as f64 * 100.0)
}

pub fn ratio_by<F>(records: &[StreetlightRecord], predicate: F) -> Ratio
where
    F: Fn(&StreetlightRecord) -> bool,
{
    Ratio::new(count_by(records, predicate), records.len())
}

pub fn status_distribution(records: &[StreetlightRecord]) -> BTreeMap<LightStatus, usize> {
    let mut distribution = BTreeMap::new();
    for record in records {
        *distribution.entry(record.status).or_insert(0) += 1;
    }
    distribution
}

pub fn mode_distribution(records: &[StreetlightRecord]) -> BTreeMap<LightMode, usize> {
    let mut distribution = BTreeMap::new();
    for record in records {
        *distribution.entry(record.mode).or_insert(0) += 1;
    }
    distribution
}

/// Devices that are off while their sensor reports daylight.
pub fn energy_efficient(records: &[StreetlightRecord]) -> Ratio {
    ratio_by(records, |r| r.status == LightStatus::Off && !r.is_dark)
}

/// Percentage of online devices, `None` for an empty snapshot.
pub fn uptime_rate(records: &[StreetlightRecord]) -> Option<f64> {
    percentage(count_by(records, |r| r.online), records.len())
}

pub fn uptime_health(rate: f64) -> UptimeHealth {
    if rate > HEALTHY_UPTIME_PERCENTAGE {
        UptimeHealth::Good
    } else {
        UptimeHealth::NeedsAttention
    }
}

/// Devices ordered by report time; ties are broken by id so the order does
/// not depend on the input order.
pub fn timeline(records: &[StreetlightRecord]) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = records
        .iter()
        .map(|record| TimelineEntry {
            id: record.id.clone(),
            status: record.status,
            timestamp: record.timestamp,
        })
        .collect();

    entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
    entries
}

pub fn overview(records: &[StreetlightRecord]) -> OverviewResponse {
    let total = records.len();
    let lights_on = count_by(records, StreetlightRecord::is_on);

    OverviewResponse {
        total,
        lights_on: Ratio::new(lights_on, total),
        lights_off: Ratio::new(total - lights_on, total),
        online: ratio_by(records, |r| r.online),
        status_distribution: status_distribution(records),
        mode_distribution: mode_distribution(records),
    }
}

pub fn analytics(records: &[StreetlightRecord]) -> AnalyticsResponse {
    let total = records.len();
    let dark = count_by(records, |r| r.is_dark);
    let motion = count_by(records, |r| r.motion_detected);

    AnalyticsResponse {
        total,
        timeline: timeline(records),
        dark: Ratio::new(dark, total),
        bright: Ratio::new(total - dark, total),
        motion: Ratio::new(motion, total),
        no_motion: Ratio::new(total - motion, total),
        automatic_mode: ratio_by(records, |r| r.mode == LightMode::Automatic),
        uptime: ratio_by(records, |r| r.online),
        uptime_health: uptime_rate(records).map(uptime_health),
        energy_efficient: energy_efficient(records),
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::ToString;

    use super::*;

    fn light(id: usize, on: bool, online: bool) -> StreetlightRecord {
        let mut record = StreetlightRecord::new(format!("light-{id:02}"));
        record.status = LightStatus::from(on);
        record.online = online;
        record
    }

    /// Ten devices: six lit, three offline.
    fn fleet() -> Vec<StreetlightRecord> {
        (0..10).map(|i| light(i, i < 6, !(4..7).contains(&i))).collect()
    }

    #[test]
    fn test_overview_metrics() {
        let overview = overview(&fleet());

        assert_eq!(overview.total, 10);
        assert_eq!(overview.lights_on.to_string(), "6 (60.0%)");
        assert_eq!(overview.lights_off.to_string(), "4 (40.0%)");
        assert_eq!(overview.online.to_string(), "7 (70.0%)");
        assert_eq!(overview.status_distribution[&LightStatus::On], 6);
        assert_eq!(overview.status_distribution[&LightStatus::Off], 4);
        assert_eq!(overview.mode_distribution[&LightMode::Automatic], 10);
    }

    #[test]
    fn test_status_counts_cover_snapshot() {
        for size in [0usize, 1, 7, 10] {
            let records: Vec<_> = fleet().into_iter().take(size).collect();
            let on = count_by(&records, |r| r.status == LightStatus::On);
            let off = count_by(&records, |r| r.status == LightStatus::Off);
            assert_eq!(on + off, records.len());
        }
    }

    #[test]
    fn test_empty_snapshot_has_undefined_percentages() {
        let overview = overview(&[]);
        assert_eq!(overview.total, 0);
        assert_eq!(overview.lights_on.percentage, None);
        assert_eq!(overview.online.percentage, None);
        assert_eq!(overview.lights_on.to_string(), "0 (n/a)");
        assert!(overview.status_distribution.is_empty());

        let analytics = analytics(&[]);
        assert_eq!(analytics.uptime.percentage, None);
        assert_eq!(analytics.uptime_health, None);
        assert_eq!(analytics.energy_efficient.percentage, None);
        assert!(analytics.timeline.is_empty());

        assert_eq!(percentage(0, 0), None);
        assert_eq!(uptime_rate(&[]), None);
    }

    #[test]
    fn test_energy_efficiency() {
        let mut records = fleet();
        // light-06..light-09 are off; mark two of them as dark.
        records[6].is_dark = true;
        records[7].is_dark = true;
        // A lit device in daylight is never efficient.
        records[0].is_dark = false;

        let ratio = energy_efficient(&records);
        assert_eq!(ratio.count, 2);
        assert_eq!(ratio.percentage, Some(20.0));
    }

    #[test]
    fn test_uptime_health() {
        assert_eq!(uptime_rate(&fleet()), Some(70.0));
        assert_eq!(uptime_health(70.0), UptimeHealth::NeedsAttention);
        assert_eq!(uptime_health(80.0), UptimeHealth::NeedsAttention);
        assert_eq!(uptime_health(80.1), UptimeHealth::Good);
    }

    #[test]
    fn test_analytics_is_order_independent() {
        let mut records = fleet();
        for (i, record) in records.iter_mut().enumerate() {
            record.timestamp = (i as i64 % 3) * 1000;
            record.is_dark = i % 2 == 0;
            record.motion_detected = i % 3 == 0;
        }
        let forward = analytics(&records);

        records.reverse();
        let backward = analytics(&records);

        assert_eq!(forward, backward);
        assert_eq!(forward.dark.count + forward.bright.count, 10);
        assert_eq!(forward.motion.count, 4);
        assert_eq!(forward.timeline.first().map(|e| e.id.as_str()), Some("light-00"));
        assert!(forward
            .timeline
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
    }
}
