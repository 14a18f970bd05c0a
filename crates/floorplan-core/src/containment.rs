//! Point-in-zone resolution.

use crate::geometry::{clamp_position, clamp_rect};
use crate::plan::{FloorPlan, ZoneId};

/// Find the zone containing a point.
///
/// Zones are scanned in stored (insertion) order and the first match wins,
/// so where zones overlap the oldest one is reported.
pub fn resolve(plan: &FloorPlan, x: f64, y: f64) -> Option<ZoneId> {
    plan.zones
        .iter()
        .find(|zone| zone.contains(x, y))
        .map(|zone| zone.id.clone())
}

/// Recompute `zone_id` for every stored asset position.
///
/// Returns the number of positions whose zone changed.
pub fn reresolve_all(plan: &mut FloorPlan) -> usize {
    let resolved: Vec<_> = plan
        .asset_positions
        .iter()
        .map(|(id, pos)| (id.clone(), resolve(plan, pos.x, pos.y)))
        .collect();

    let mut changed = 0;
    for (id, zone_id) in resolved {
        if let Some(pos) = plan.asset_positions.get_mut(&id) {
            if pos.zone_id != zone_id {
                pos.zone_id = zone_id;
                changed += 1;
            }
        }
    }
    changed
}

/// Bring a plan read from storage back within the invariants: zone
/// geometry clamped, asset positions clamped, zone references recomputed.
///
/// Returns whether anything was adjusted.
pub fn normalize(plan: &mut FloorPlan) -> bool {
    let mut adjusted = false;
    for zone in &mut plan.zones {
        let rect = clamp_rect(zone.x, zone.y, zone.width, zone.height);
        if rect != zone.rect() {
            zone.set_rect(rect);
            adjusted = true;
        }
    }
    for pos in plan.asset_positions.values_mut() {
        let (x, y) = clamp_position(pos.x, pos.y);
        if (x, y) != (pos.x, pos.y) {
            pos.x = x;
            pos.y = y;
            adjusted = true;
        }
    }
    reresolve_all(plan) > 0 || adjusted
}
