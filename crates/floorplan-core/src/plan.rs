//! Floor-plan document types.

use crate::geometry::ZoneRect;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a zone, unique within its floor plan.
pub type ZoneId = String;

/// Identifier of an asset, owned by the dashboard domain.
pub type AssetId = String;

/// External identifier of a floor (e.g. `"ground"`).
pub type FloorId = String;

/// Every floor of a tenant, keyed by floor id.
pub type FloorPlans = BTreeMap<FloorId, FloorPlan>;

/// Floor id used when nothing has been persisted yet.
pub const DEFAULT_FLOOR_ID: &str = "ground";

/// Colours handed out to new zones, in order.
pub const ZONE_PALETTE: [&str; 4] = ["#3b82f6", "#10b981", "#f59e0b", "#6366f1"];

/// Where an asset is drawn when it has no stored position.
pub const DEFAULT_ASSET_POSITION: (f64, f64) = (10.0, 10.0);

/// Kind of space a zone represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ZoneType {
    #[default]
    Office,
    Storage,
    Lab,
    Utility,
    Hallway,
    Meeting,
    Restroom,
}

impl ZoneType {
    pub const ALL: [ZoneType; 7] = [
        ZoneType::Office,
        ZoneType::Storage,
        ZoneType::Lab,
        ZoneType::Utility,
        ZoneType::Hallway,
        ZoneType::Meeting,
        ZoneType::Restroom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ZoneType::Office => "Office",
            ZoneType::Storage => "Storage",
            ZoneType::Lab => "Lab",
            ZoneType::Utility => "Utility",
            ZoneType::Hallway => "Hallway",
            ZoneType::Meeting => "Meeting",
            ZoneType::Restroom => "Restroom",
        }
    }

    /// Badge shown in the corner of a zone.
    pub fn icon(self) -> &'static str {
        match self {
            ZoneType::Office => "🖥️",
            ZoneType::Storage => "📦",
            ZoneType::Lab => "🔬",
            ZoneType::Utility => "⚙️",
            ZoneType::Hallway => "🚶",
            ZoneType::Meeting => "👥",
            ZoneType::Restroom => "🚻",
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named, typed rectangular region of a floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Hex colour, e.g. `#3b82f6`.
    pub color: String,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Zone {
    pub fn rect(&self) -> ZoneRect {
        ZoneRect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: ZoneRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.rect().contains(x, y)
    }

    /// Border colour, fully opaque.
    pub fn border_color(&self) -> Color {
        let (r, g, b) = parse_hex_color(&self.color).unwrap_or((0x3b, 0x82, 0xf6));
        Color::from_rgba8(r, g, b, 255)
    }

    /// Fill colour with the zone opacity applied as alpha.
    pub fn fill_color(&self) -> Color {
        let (r, g, b) = parse_hex_color(&self.color).unwrap_or((0x3b, 0x82, 0xf6));
        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).floor() as u8;
        Color::from_rgba8(r, g, b, alpha)
    }
}

/// Parse `#rrggbb` or `#rgb`.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.is_ascii() {
        return None;
    }
    match digits.len() {
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&digits[0..1], 16).ok()?;
            let g = u8::from_str_radix(&digits[1..2], 16).ok()?;
            let b = u8::from_str_radix(&digits[2..3], 16).ok()?;
            Some((r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

/// Placement of an asset on a floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPosition {
    pub x: f64,
    pub y: f64,
    /// Zone currently containing the position. Weak reference.
    pub zone_id: Option<ZoneId>,
}

impl AssetPosition {
    pub fn new(x: f64, y: f64, zone_id: Option<ZoneId>) -> Self {
        Self { x, y, zone_id }
    }
}

impl Default for AssetPosition {
    fn default() -> Self {
        let (x, y) = DEFAULT_ASSET_POSITION;
        Self::new(x, y, None)
    }
}

/// The document for one floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlan {
    pub name: String,
    /// Background image reference.
    pub image: String,
    /// Intrinsic width in pixels. Display hint only.
    pub width: f64,
    /// Intrinsic height in pixels. Display hint only.
    pub height: f64,
    /// Zones in insertion order.
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub asset_positions: BTreeMap<AssetId, AssetPosition>,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self {
            name: "Ground Floor".to_string(),
            image: "/floor-plans/ground-floor.png".to_string(),
            width: 800.0,
            height: 600.0,
            zones: Vec::new(),
            asset_positions: BTreeMap::new(),
        }
    }
}

impl FloorPlan {
    /// Create the default empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    pub fn zone_mut(&mut self, id: &str) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|zone| zone.id == id)
    }

    pub fn has_zone(&self, id: &str) -> bool {
        self.zone(id).is_some()
    }

    /// Stored position of an asset, or the default placement.
    pub fn position_or_default(&self, asset_id: &str) -> AssetPosition {
        self.asset_positions
            .get(asset_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Assets currently resolved into the given zone.
    pub fn assets_in_zone<'a>(&'a self, zone_id: &'a str) -> impl Iterator<Item = &'a AssetId> + 'a {
        self.asset_positions
            .iter()
            .filter(move |(_, pos)| pos.zone_id.as_deref() == Some(zone_id))
            .map(|(id, _)| id)
    }

    /// Intrinsic size as a kurbo size.
    pub fn content_size(&self) -> kurbo::Size {
        kurbo::Size::new(self.width, self.height)
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_zone() -> Zone {
        Zone {
            id: "zone-1".to_string(),
            name: "Lab A".to_string(),
            x: 10.0,
            y: 10.0,
            width: 20.0,
            height: 15.0,
            color: "#10b981".to_string(),
            zone_type: ZoneType::Lab,
            opacity: 0.5,
        }
    }

    #[test]
    fn test_default_plan() {
        let plan = FloorPlan::new();
        assert_eq!(plan.name, "Ground Floor");
        assert!(plan.zones.is_empty());
        assert!(plan.asset_positions.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut plan = FloorPlan::new();
        plan.zones.push(sample_zone());
        plan.asset_positions.insert(
            "asset-1".to_string(),
            AssetPosition::new(15.0, 15.0, Some("zone-1".to_string())),
        );

        let value: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
        assert_eq!(value["zones"][0]["type"], "Lab");
        assert_eq!(value["zones"][0]["color"], "#10b981");
        assert_eq!(value["assetPositions"]["asset-1"]["zoneId"], "zone-1");

        let back = FloorPlan::from_json(&plan.to_json().unwrap()).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let json = r#"{"name":"Basement","image":"b.png","width":400,"height":300}"#;
        let plan = FloorPlan::from_json(json).unwrap();
        assert_eq!(plan.name, "Basement");
        assert!(plan.zones.is_empty());
    }

    #[test]
    fn test_position_or_default() {
        let plan = FloorPlan::new();
        let pos = plan.position_or_default("unknown");
        assert_eq!((pos.x, pos.y), DEFAULT_ASSET_POSITION);
        assert!(pos.zone_id.is_none());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#3b82f6"), Some((0x3b, 0x82, 0xf6)));
        assert_eq!(parse_hex_color("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("blue"), None);
    }

    #[test]
    fn test_fill_color_uses_opacity() {
        let zone = sample_zone();
        let rgba = zone.fill_color().to_rgba8();
        assert_eq!((rgba.r, rgba.g, rgba.b), (0x10, 0xb9, 0x81));
        assert_eq!(rgba.a, 127);
    }
}
