//! Selection of outages that belong to a site.
//!
//! An outage is kept when its `id` names one of the site's devices and it
//! begins on or after the cutoff. Everything else is dropped silently; the
//! drop counts are reported in [`FilterStats`] so callers can surface them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Device, Outage, SiteOutage};

/// Counters describing one filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Outages examined.
    pub total: usize,
    /// Outages kept.
    pub kept: usize,
    /// Outages whose id is not a device of the site.
    pub unknown_device: usize,
    /// Outages of a known device that begin before the cutoff.
    pub before_cutoff: usize,
}

impl FilterStats {
    /// Total number of outages dropped.
    pub fn dropped(&self) -> usize {
        self.unknown_device + self.before_cutoff
    }
}

/// Result of [`filter_outages`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Records ready to post, in input order.
    pub outages: Vec<SiteOutage>,
    /// Counters for the pass.
    pub stats: FilterStats,
}

/// Filters `outages` down to the given devices and cutoff, attaching names.
pub fn filter_outages(
    outages: &[Outage],
    devices: &[Device],
    cutoff: DateTime<Utc>,
) -> FilterOutcome {
    let names: HashMap<&str, &str> = devices
        .iter()
        .map(|d| (d.id.as_str(), d.name.as_str()))
        .collect();

    let mut stats = FilterStats {
        total: outages.len(),
        ..FilterStats::default()
    };

    let kept: Vec<SiteOutage> = outages
        .iter()
        .filter_map(|outage| {
            let Some(name) = names.get(outage.id.as_str()) else {
                stats.unknown_device += 1;
                return None;
            };
            if outage.begin_at < cutoff {
                stats.before_cutoff += 1;
                return None;
            }
            Some(SiteOutage {
                id: outage.id.clone(),
                name: (*name).to_string(),
                begin: outage.begin.clone(),
                end: outage.end.clone(),
            })
        })
        .collect();

    stats.kept = kept.len();
    FilterOutcome {
        outages: kept,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    fn outage(id: &str, begin: &str, end: &str) -> Outage {
        Outage::new(id, begin, end).unwrap()
    }

    fn cutoff(value: &str) -> DateTime<Utc> {
        parse_timestamp("cutoff", value).unwrap()
    }

    #[test]
    fn test_keeps_known_device_after_cutoff() {
        let outages = vec![outage("A", "2022-02-01T00:00:00Z", "2022-02-02T00:00:00Z")];
        let devices = vec![Device::new("A", "X")];

        let result = filter_outages(&outages, &devices, cutoff("2022-01-01T00:00:00Z"));

        assert_eq!(
            result.outages,
            vec![SiteOutage {
                id: "A".to_string(),
                name: "X".to_string(),
                begin: "2022-02-01T00:00:00Z".to_string(),
                end: "2022-02-02T00:00:00Z".to_string(),
            }]
        );
        assert_eq!(result.stats.kept, 1);
    }

    #[test]
    fn test_drops_before_cutoff() {
        let outages = vec![outage("A", "2021-12-31T23:59:59Z", "2022-01-02T00:00:00Z")];
        let devices = vec![Device::new("A", "X")];

        let result = filter_outages(&outages, &devices, cutoff("2022-01-01T00:00:00Z"));

        assert!(result.outages.is_empty());
        assert_eq!(result.stats.before_cutoff, 1);
    }

    #[test]
    fn test_begin_equal_to_cutoff_is_kept() {
        let outages = vec![outage("A", "2022-01-01T00:00:00.000Z", "2022-01-02T00:00:00Z")];
        let devices = vec![Device::new("A", "X")];

        let result = filter_outages(&outages, &devices, cutoff("2022-01-01T00:00:00Z"));

        assert_eq!(result.outages.len(), 1);
    }

    #[test]
    fn test_drops_unknown_device() {
        let outages = vec![outage("B", "2022-02-01T00:00:00Z", "2022-02-02T00:00:00Z")];
        let devices = vec![Device::new("A", "X")];

        let result = filter_outages(&outages, &devices, cutoff("2022-01-01T00:00:00Z"));

        assert!(result.outages.is_empty());
        assert_eq!(result.stats.unknown_device, 1);
    }

    #[test]
    fn test_unknown_and_early_counts_as_unknown() {
        let outages = vec![outage("B", "2020-02-01T00:00:00Z", "2020-02-02T00:00:00Z")];

        let result = filter_outages(&outages, &[], cutoff("2022-01-01T00:00:00Z"));

        assert_eq!(result.stats.unknown_device, 1);
        assert_eq!(result.stats.before_cutoff, 0);
    }

    #[test]
    fn test_offsets_compared_as_instants() {
        // 00:30 at +01:00 is 23:30 UTC on the previous day
        let outages = vec![outage("A", "2022-01-01T00:30:00+01:00", "2022-01-02T00:00:00Z")];
        let devices = vec![Device::new("A", "X")];

        let result = filter_outages(&outages, &devices, cutoff("2022-01-01T00:00:00Z"));

        assert!(result.outages.is_empty());
    }

    #[test]
    fn test_order_preserved_and_stats_add_up() {
        let outages = vec![
            outage("A", "2022-03-01T00:00:00Z", "2022-03-02T00:00:00Z"),
            outage("C", "2022-03-01T00:00:00Z", "2022-03-02T00:00:00Z"),
            outage("B", "2022-02-01T00:00:00Z", "2022-02-02T00:00:00Z"),
            outage("A", "2021-01-01T00:00:00Z", "2021-01-02T00:00:00Z"),
            outage("A", "2022-01-15T00:00:00Z", "2022-01-16T00:00:00Z"),
        ];
        let devices = vec![Device::new("A", "Alpha"), Device::new("B", "Beta")];

        let result = filter_outages(&outages, &devices, cutoff("2022-01-01T00:00:00Z"));

        let ids: Vec<_> = result.outages.iter().map(|o| o.begin.as_str()).collect();
        assert_eq!(
            ids,
            vec!["2022-03-01T00:00:00Z", "2022-02-01T00:00:00Z", "2022-01-15T00:00:00Z"]
        );
        assert_eq!(result.outages[1].name, "Beta");
        assert_eq!(
            result.stats,
            FilterStats {
                total: 5,
                kept: 3,
                unknown_device: 1,
                before_cutoff: 1,
            }
        );
        assert_eq!(result.stats.kept + result.stats.dropped(), result.stats.total);
    }

    #[test]
    fn test_empty_inputs() {
        let result = filter_outages(&[], &[], cutoff("2022-01-01T00:00:00Z"));
        assert_eq!(result, FilterOutcome::default());
    }
}
