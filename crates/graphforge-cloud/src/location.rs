//! Zone and region selection
//!
//! A zone is a coarse geography ("europe") grouping several concrete
//! regions ("fsn1"). Capacity rejections are common on small instance
//! types, so the selector hands the orchestrator the preferred region
//! followed by every sibling region in the same zone as fallbacks.

/// Static zone table. Order within a zone is the fallback order.
const ZONES: &[(&str, &[&str])] = &[
    ("europe", &["fsn1", "nbg1", "hel1"]),
    ("asia", &["sin1"]),
    ("us", &["ash", "hil"]),
];

pub const DEFAULT_ZONE: &str = "europe";
pub const DEFAULT_REGION: &str = "fsn1";

/// Resolved placement plan: a zone and a non-empty, duplicate-free list of
/// candidate regions, preferred region first. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPlan {
    pub zone: String,
    pub candidates: Vec<String>,
}

impl RegionPlan {
    pub fn preferred(&self) -> &str {
        &self.candidates[0]
    }
}

fn zone_regions(zone: &str) -> Option<&'static [&'static str]> {
    ZONES.iter().find(|(z, _)| *z == zone).map(|(_, r)| *r)
}

fn zone_of_region(region: &str) -> Option<&'static str> {
    ZONES
        .iter()
        .find(|(_, regions)| regions.contains(&region))
        .map(|(z, _)| *z)
}

/// Compute the candidate region list for a workflow run.
///
/// With no explicit region: an unknown or missing zone falls back to the
/// default zone, and the candidates are that zone's regions in table order.
/// With an explicit region the behavior depends on `pin`:
///
/// - `pin = true` (current behavior): the region is tried alone, no
///   fallbacks.
/// - `pin = false`: the region is tried first, then the remaining regions
///   of its zone (or of the explicitly given zone when the region is not in
///   the table).
///
/// Pure function; never fails.
pub fn select_regions(zone: Option<&str>, region: Option<&str>, pin: bool) -> RegionPlan {
    if let Some(region) = region {
        let zone = zone
            .filter(|z| zone_regions(z).is_some())
            .or_else(|| zone_of_region(region))
            .unwrap_or(DEFAULT_ZONE);

        if pin {
            return RegionPlan {
                zone: zone.to_string(),
                candidates: vec![region.to_string()],
            };
        }

        let mut candidates = vec![region.to_string()];
        if let Some(regions) = zone_regions(zone) {
            candidates.extend(
                regions
                    .iter()
                    .filter(|r| **r != region)
                    .map(|r| r.to_string()),
            );
        }
        return RegionPlan {
            zone: zone.to_string(),
            candidates,
        };
    }

    let (zone, regions) = match zone.and_then(|z| zone_regions(z).map(|r| (z, r))) {
        Some((z, r)) => (z, r),
        None => (DEFAULT_ZONE, zone_regions(DEFAULT_ZONE).unwrap()),
    };

    RegionPlan {
        zone: zone.to_string(),
        candidates: regions.iter().map(|r| r.to_string()).collect(),
    }
}
