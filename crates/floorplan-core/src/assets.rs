//! Read-only dashboard inputs: assets and maintenance calls.
//!
//! The editor never changes these; it only uses them to decide how asset
//! markers are labelled and emphasised.

use crate::plan::{AssetId, FloorPlan, ZoneId};
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Icons handed out to asset types, cycling when types outnumber icons.
pub const ASSET_ICONS: [&str; 10] = ["🔧", "🖥️", "🔌", "💡", "🛠️", "📱", "💻", "🖨️", "🔋", "📶"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssetStatus {
    #[default]
    #[serde(rename = "Operational", alias = "operational")]
    Operational,
    #[serde(rename = "Under Maintenance", alias = "maintenance")]
    Maintenance,
    #[serde(rename = "Out of Service", alias = "outOfService")]
    OutOfService,
}

/// A physical asset as supplied by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(default)]
    pub status: AssetStatus,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    Open,
    InProgress,
    Completed,
    Closed,
}

/// A maintenance call raised against an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: String,
    pub asset_id: AssetId,
    pub status: CallStatus,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub call_time: String,
}

impl Call {
    /// Anything not closed still needs attention.
    pub fn is_active(&self) -> bool {
        self.status != CallStatus::Closed
    }
}

/// Calls against one asset that are not closed.
pub fn active_calls<'a>(calls: &'a [Call], asset_id: &'a str) -> impl Iterator<Item = &'a Call> + 'a {
    calls
        .iter()
        .filter(move |call| call.asset_id == asset_id && call.is_active())
}

/// Count of active calls per asset.
pub fn active_call_counts(calls: &[Call]) -> HashMap<AssetId, usize> {
    let mut counts = HashMap::new();
    for call in calls.iter().filter(|call| call.is_active()) {
        *counts.entry(call.asset_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// How strongly a marker should stand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerEmphasis {
    /// Open calls: red and pulsing, with a count badge.
    Alert { active_calls: usize },
    /// Asset under maintenance: amber.
    Maintenance,
    Normal,
}

impl MarkerEmphasis {
    pub fn for_asset(asset: &Asset, active_calls: usize) -> Self {
        if active_calls > 0 {
            MarkerEmphasis::Alert { active_calls }
        } else if asset.status == AssetStatus::Maintenance {
            MarkerEmphasis::Maintenance
        } else {
            MarkerEmphasis::Normal
        }
    }

    pub fn fill_color(self) -> Color {
        match self {
            MarkerEmphasis::Alert { .. } => Color::from_rgba8(0xef, 0x44, 0x44, 255),
            MarkerEmphasis::Maintenance => Color::from_rgba8(0xf5, 0x9e, 0x0b, 255),
            MarkerEmphasis::Normal => Color::from_rgba8(0x3b, 0x82, 0xf6, 255),
        }
    }

    pub fn border_color(self) -> Color {
        match self {
            MarkerEmphasis::Alert { .. } => Color::from_rgba8(0xdc, 0x26, 0x26, 255),
            MarkerEmphasis::Maintenance => Color::from_rgba8(0xd9, 0x77, 0x06, 255),
            MarkerEmphasis::Normal => Color::from_rgba8(0x25, 0x63, 0xeb, 255),
        }
    }

    pub fn pulses(self) -> bool {
        matches!(self, MarkerEmphasis::Alert { .. })
    }
}

/// Give each distinct asset type an icon, cycling through [`ASSET_ICONS`].
///
/// Types are ordered alphabetically so the mapping does not depend on the
/// order assets arrive in.
pub fn asset_type_icons(assets: &[Asset]) -> HashMap<String, &'static str> {
    let types: BTreeSet<&str> = assets.iter().map(|asset| asset.asset_type.as_str()).collect();
    types
        .into_iter()
        .enumerate()
        .map(|(i, ty)| (ty.to_string(), ASSET_ICONS[i % ASSET_ICONS.len()]))
        .collect()
}

/// Short label drawn inside a marker: the type icon, or the name's initial.
pub fn marker_label(asset: &Asset, icons: &HashMap<String, &'static str>) -> String {
    match icons.get(&asset.asset_type) {
        Some(icon) => (*icon).to_string(),
        None => asset.name.chars().next().map(String::from).unwrap_or_default(),
    }
}

/// Everything needed to draw one asset marker.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetMarker {
    pub asset_id: AssetId,
    /// Position in percent of the plan.
    pub position: Point,
    pub zone_id: Option<ZoneId>,
    pub emphasis: MarkerEmphasis,
    pub label: String,
}

/// Build markers for every asset, placing unpositioned ones at the default.
pub fn markers(plan: &FloorPlan, assets: &[Asset], calls: &[Call]) -> Vec<AssetMarker> {
    let counts = active_call_counts(calls);
    let icons = asset_type_icons(assets);
    assets
        .iter()
        .map(|asset| {
            let pos = plan.position_or_default(&asset.id);
            let active = counts.get(&asset.id).copied().unwrap_or(0);
            AssetMarker {
                asset_id: asset.id.clone(),
                position: Point::new(pos.x, pos.y),
                zone_id: pos.zone_id,
                emphasis: MarkerEmphasis::for_asset(asset, active),
                label: marker_label(asset, &icons),
            }
        })
        .collect()
}
