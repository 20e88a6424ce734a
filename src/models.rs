//! Data models for the USGS earthquake feed.
//!
//! The wire structures match the GeoJSON summary feeds. `EventRecord` is
//! the trimmed, validated form the rest of the pipeline works on.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::errors::QuakemapError;

/// Top-level GeoJSON response from USGS feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// Always "FeatureCollection"
    #[serde(rename = "type")]
    pub type_: String,

    /// Earthquake events
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Validate the response structure.
    pub fn validate(&self) -> Result<(), QuakemapError> {
        if self.type_ != "FeatureCollection" {
            return Err(QuakemapError::InvalidResponse(format!(
                "expected type 'FeatureCollection', got '{}'",
                self.type_
            )));
        }
        Ok(())
    }

    /// Convert every well-formed feature into an event record.
    ///
    /// Malformed features are logged and skipped; the relative order of
    /// the remaining ones is kept.
    #[must_use]
    pub fn into_events(self) -> Vec<EventRecord> {
        let total = self.features.len();
        let events: Vec<EventRecord> = self
            .features
            .into_iter()
            .filter_map(|feature| match EventRecord::try_from(feature) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!("skipping feature: {e}");
                    None
                }
            })
            .collect();

        if events.len() != total {
            warn!("kept {} of {} features", events.len(), total);
        }
        events
    }
}

/// A single earthquake feature as delivered by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Event ID
    #[serde(default)]
    pub id: String,

    /// Geographic location; GeoJSON allows `null`
    pub geometry: Option<Geometry>,

    /// Event properties; GeoJSON allows `null`
    pub properties: Option<Properties>,
}

/// Geographic geometry for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Coordinates: [longitude, latitude, depth_km], any of which may be null
    #[serde(default)]
    pub coordinates: Vec<Option<f64>>,
}

/// The subset of USGS event properties the map uses.
#[derive(Debug, Clone, Deserialize)]
pub struct Properties {
    /// Magnitude value
    pub mag: Option<f64>,

    /// Human-readable place description
    pub place: Option<String>,

    /// Event time (ms since epoch)
    pub time: Option<i64>,
}

/// Longitude, latitude and depth of an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
    /// Depth in kilometers (positive down), `None` when the feed has none
    pub depth_km: Option<f64>,
}

/// One earthquake, ready to be styled.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub place: String,
    /// `None` when the feed reports no magnitude.
    pub magnitude: Option<f64>,
    /// Event time (ms since epoch)
    pub time: i64,
    pub coordinates: Coordinates,
}

/// Shown when the feed carries no place name.
pub const UNKNOWN_PLACE: &str = "Unknown location";

impl EventRecord {
    /// Get the event time as a `DateTime<Utc>`.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.time).single()
    }

    /// Get depth in kilometers.
    #[must_use]
    pub fn depth_km(&self) -> Option<f64> {
        self.coordinates.depth_km
    }
}

impl TryFrom<Feature> for EventRecord {
    type Error = QuakemapError;

    fn try_from(feature: Feature) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| {
            QuakemapError::Validation(format!("event '{}': {reason}", feature.id))
        };

        let geometry = feature.geometry.as_ref().ok_or_else(|| invalid("no geometry"))?;
        let [Some(longitude), Some(latitude), depth_km] = geometry.coordinates[..] else {
            return Err(invalid(&format!(
                "expected 3 coordinates with a position, got {:?}",
                geometry.coordinates
            )));
        };

        let properties = feature.properties.as_ref().ok_or_else(|| invalid("no properties"))?;
        let time = properties.time.ok_or_else(|| invalid("no time"))?;

        Ok(Self {
            place: properties
                .place
                .clone()
                .unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
            magnitude: properties.mag,
            time,
            coordinates: Coordinates {
                longitude,
                latitude,
                depth_km,
            },
        })
    }
}
