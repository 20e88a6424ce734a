//! Marker styling for earthquake events.
//!
//! Pure mappings from event attributes to visual attributes: magnitude
//! drives the circle radius, depth picks one of six fill colors, and each
//! event gets an HTML popup describing it.

use std::fmt::{self, Display};

use chrono::TimeZone;
use serde::{Serialize, Serializer};

use crate::models::EventRecord;

/// Radius multiplier applied to the magnitude.
const RADIUS_PER_MAGNITUDE: f64 = 5.0;

/// Outline color shared by every marker.
const STROKE_COLOR: &str = "black";
const STROKE_WEIGHT: f64 = 0.5;
const FILL_OPACITY: f64 = 0.75;

/// Fill color of a marker, one per depth bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthColor {
    Teal,
    DarkGreen,
    LightGreen,
    Yellow,
    Orange,
    Red,
}

/// Brackets in strictly descending threshold order. A depth falls into
/// the first bracket whose threshold it exceeds; thresholds are exclusive.
const DEPTH_BRACKETS: [(f64, DepthColor); 5] = [
    (90.0, DepthColor::Red),
    (70.0, DepthColor::Orange),
    (50.0, DepthColor::Yellow),
    (30.0, DepthColor::LightGreen),
    (10.0, DepthColor::DarkGreen),
];

/// Color for depths that exceed no threshold, including negative depths.
const SHALLOW_COLOR: DepthColor = DepthColor::Teal;

impl DepthColor {
    /// Every color, shallowest bracket first.
    pub const ALL: [Self; 6] = [
        Self::Teal,
        Self::DarkGreen,
        Self::LightGreen,
        Self::Yellow,
        Self::Orange,
        Self::Red,
    ];

    /// CSS hex code.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Teal => "#20B2AA",
            Self::DarkGreen => "#4d9900",
            Self::LightGreen => "#b3ff66",
            Self::Yellow => "#ffdb4d",
            Self::Orange => "#ff9933",
            Self::Red => "#ff0000",
        }
    }

    /// Depth range covered by this color, in km.
    #[must_use]
    pub const fn depth_label(self) -> &'static str {
        match self {
            Self::Teal => "-10-10",
            Self::DarkGreen => "10-30",
            Self::LightGreen => "30-50",
            Self::Yellow => "50-70",
            Self::Orange => "70-90",
            Self::Red => "90+",
        }
    }
}

impl Display for DepthColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

impl Serialize for DepthColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

/// Circle radius for a magnitude. Not clamped: zero or negative
/// magnitudes give zero or negative radii.
#[must_use]
pub fn marker_size(magnitude: f64) -> f64 {
    magnitude * RADIUS_PER_MAGNITUDE
}

/// Fill color for a depth in km.
#[must_use]
pub fn marker_color(depth: f64) -> DepthColor {
    DEPTH_BRACKETS
        .iter()
        .find(|(threshold, _)| depth > *threshold)
        .map_or(SHALLOW_COLOR, |&(_, color)| color)
}

/// Popup HTML for an event, with the time shown in `tz`.
///
/// The place name is interpolated verbatim. The feed is trusted; any
/// markup in a place name reaches the popup as-is.
#[must_use]
pub fn describe_event<Tz>(event: &EventRecord, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let magnitude = display_or_null(event.magnitude);
    let depth = display_or_null(event.depth_km());

    let time = event.time().map_or_else(
        || "Invalid Date".to_string(),
        |t| {
            t.with_timezone(tz)
                .format("%a %b %d %Y %H:%M:%S GMT%z")
                .to_string()
        },
    );

    format!(
        "<h2>{place}</h2><hr><h4>Magnitude: {magnitude}</h4><hr><h4>Depth: {depth}km</h4><hr><p>{time}</p>",
        place = event.place,
    )
}

/// Missing values print as `null`, the way the popup has always shown them.
fn display_or_null(value: Option<f64>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}

/// Leaflet path options for one circle marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: DepthColor,
    pub color: &'static str,
    pub fill_opacity: f64,
    pub stroke: bool,
    pub weight: f64,
}

impl MarkerStyle {
    /// Style for an event of the given magnitude and depth.
    #[must_use]
    pub fn for_event(magnitude: f64, depth: f64) -> Self {
        Self::new(marker_size(magnitude), marker_color(depth))
    }

    fn new(radius: f64, fill_color: DepthColor) -> Self {
        Self {
            radius,
            fill_color,
            color: STROKE_COLOR,
            fill_opacity: FILL_OPACITY,
            stroke: true,
            weight: STROKE_WEIGHT,
        }
    }
}

/// Everything needed to draw one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub latitude: f64,
    pub longitude: f64,
    pub style: MarkerStyle,
    pub popup: String,
}

/// Build the marker for a single event.
///
/// A missing magnitude sizes the marker as magnitude zero; a missing depth
/// gets the shallow color.
#[must_use]
pub fn style_event<Tz>(event: &EventRecord, tz: &Tz) -> MarkerSpec
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    MarkerSpec {
        latitude: event.coordinates.latitude,
        longitude: event.coordinates.longitude,
        style: MarkerStyle::new(
            marker_size(event.magnitude.unwrap_or(0.0)),
            event.depth_km().map_or(SHALLOW_COLOR, marker_color),
        ),
        popup: describe_event(event, tz),
    }
}

/// Build one marker per event, in input order.
#[must_use]
pub fn style_events<Tz>(events: &[EventRecord], tz: &Tz) -> Vec<MarkerSpec>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    events.iter().map(|event| style_event(event, tz)).collect()
}
