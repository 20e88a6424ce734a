//! Map layers and controls.
//!
//! The composer only ever deals with this closed set of variants. Each one
//! renders itself into a [`Rendered`] instruction that the page bootstrap
//! hands to Leaflet, so nothing here depends on the rendering library's
//! own types.

use serde::Serialize;

use crate::config::AccessToken;
use crate::legend::{Legend, Position};
use crate::style::MarkerSpec;

/// Mapbox styles API tile endpoint. Leaflet fills `{id}` and `{accessToken}`
/// from the layer options.
const MAPBOX_TILE_URL: &str =
    "https://api.mapbox.com/styles/v1/{id}/tiles/{z}/{x}/{y}?access_token={accessToken}";

const MAPBOX_ATTRIBUTION: &str = "© <a href='https://www.mapbox.com/about/maps/'>Mapbox</a> \
     © <a href='http://www.openstreetmap.org/copyright'>OpenStreetMap</a> \
     <strong><a href='https://www.mapbox.com/map-feedback/' target='_blank'>Improve this map</a></strong>";

const TILE_SIZE: u32 = 512;
const MAX_ZOOM: u8 = 18;
const ZOOM_OFFSET: i8 = -1;

/// Name of the earthquake overlay in the layer control.
pub const EARTHQUAKES: &str = "Earthquakes";

/// Capability shared by every layer and control on the map.
pub trait MapComponent {
    /// Label used by the layer control.
    fn name(&self) -> &str;

    /// Instruction for the rendering surface.
    fn render(&self) -> Rendered;

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);
}

/// Background tile styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseStyle {
    Satellite,
    Greyscale,
    Outdoors,
}

impl BaseStyle {
    /// Order in which the layer control lists the styles.
    pub const ALL: [Self; 3] = [Self::Satellite, Self::Greyscale, Self::Outdoors];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Satellite => "Satellite",
            Self::Greyscale => "Greyscale",
            Self::Outdoors => "Outdoors",
        }
    }

    /// Mapbox style identifier.
    #[must_use]
    pub const fn style_id(self) -> &'static str {
        match self {
            Self::Satellite => "mapbox/satellite-v9",
            Self::Greyscale => "mapbox/light-v10",
            Self::Outdoors => "mapbox/outdoors-v11",
        }
    }
}

/// Leaflet tile layer options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileOptions {
    pub attribution: &'static str,
    pub tile_size: u32,
    pub max_zoom: u8,
    pub zoom_offset: i8,
    pub id: &'static str,
    pub access_token: String,
}

/// A full-map background tile layer.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseLayer {
    pub style: BaseStyle,
    pub options: TileOptions,
    visible: bool,
}

impl BaseLayer {
    /// Tile layer for `style`, hidden until selected.
    #[must_use]
    pub fn new(style: BaseStyle, token: &AccessToken) -> Self {
        Self {
            style,
            options: TileOptions {
                attribution: MAPBOX_ATTRIBUTION,
                tile_size: TILE_SIZE,
                max_zoom: MAX_ZOOM,
                zoom_offset: ZOOM_OFFSET,
                id: style.style_id(),
                access_token: token.as_str().to_string(),
            },
            visible: false,
        }
    }
}

/// The togglable earthquake markers.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    pub name: String,
    pub markers: Vec<MarkerSpec>,
    visible: bool,
}

impl OverlayLayer {
    /// Overlay holding `markers`, visible by default.
    #[must_use]
    pub fn new(name: impl Into<String>, markers: Vec<MarkerSpec>) -> Self {
        Self {
            name: name.into(),
            markers,
            visible: true,
        }
    }

    /// The earthquake overlay.
    #[must_use]
    pub fn earthquakes(markers: Vec<MarkerSpec>) -> Self {
        Self::new(EARTHQUAKES, markers)
    }
}

/// Anything that draws onto the map.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Base(BaseLayer),
    Overlay(OverlayLayer),
}

/// Layer selection widget.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerControl {
    pub position: Position,
    pub collapsed: bool,
    pub base_layers: Vec<String>,
    pub overlays: Vec<String>,
    visible: bool,
}

impl LayerControl {
    /// Control listing the given layers, permanently expanded.
    #[must_use]
    pub fn expanded(base_layers: Vec<String>, overlays: Vec<String>) -> Self {
        Self {
            position: Position::TopRight,
            collapsed: false,
            base_layers,
            overlays,
            visible: true,
        }
    }
}

/// Widgets drawn over the map.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Layers(LayerControl),
    Legend { legend: Legend, visible: bool },
}

impl From<Legend> for Control {
    fn from(legend: Legend) -> Self {
        Self::Legend {
            legend,
            visible: true,
        }
    }
}

/// Serialized form of a component, consumed by the page bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Rendered {
    #[serde(rename_all = "camelCase")]
    TileLayer {
        name: String,
        url_template: &'static str,
        options: TileOptions,
        visible: bool,
    },
    #[serde(rename_all = "camelCase")]
    CircleMarkers {
        name: String,
        markers: Vec<MarkerSpec>,
        visible: bool,
    },
    #[serde(rename_all = "camelCase")]
    LayerControl {
        position: Position,
        collapsed: bool,
        base_layers: Vec<String>,
        overlays: Vec<String>,
        visible: bool,
    },
    Legend {
        #[serde(flatten)]
        legend: Legend,
        visible: bool,
    },
}

impl MapComponent for Layer {
    fn name(&self) -> &str {
        match self {
            Self::Base(base) => base.style.name(),
            Self::Overlay(overlay) => &overlay.name,
        }
    }

    fn render(&self) -> Rendered {
        match self {
            Self::Base(base) => Rendered::TileLayer {
                name: base.style.name().to_string(),
                url_template: MAPBOX_TILE_URL,
                options: base.options.clone(),
                visible: base.visible,
            },
            Self::Overlay(overlay) => Rendered::CircleMarkers {
                name: overlay.name.clone(),
                markers: overlay.markers.clone(),
                visible: overlay.visible,
            },
        }
    }

    fn is_visible(&self) -> bool {
        match self {
            Self::Base(base) => base.visible,
            Self::Overlay(overlay) => overlay.visible,
        }
    }

    fn set_visible(&mut self, visible: bool) {
        match self {
            Self::Base(base) => base.visible = visible,
            Self::Overlay(overlay) => overlay.visible = visible,
        }
    }
}

impl MapComponent for Control {
    fn name(&self) -> &str {
        match self {
            Self::Layers(_) => "layers",
            Self::Legend { .. } => "legend",
        }
    }

    fn render(&self) -> Rendered {
        match self {
            Self::Layers(control) => Rendered::LayerControl {
                position: control.position,
                collapsed: control.collapsed,
                base_layers: control.base_layers.clone(),
                overlays: control.overlays.clone(),
                visible: control.visible,
            },
            Self::Legend { legend, visible } => Rendered::Legend {
                legend: legend.clone(),
                visible: *visible,
            },
        }
    }

    fn is_visible(&self) -> bool {
        match self {
            Self::Layers(control) => control.visible,
            Self::Legend { visible, .. } => *visible,
        }
    }

    fn set_visible(&mut self, visible: bool) {
        match self {
            Self::Layers(control) => control.visible = visible,
            Self::Legend { visible: v, .. } => *v = visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::build_legend;

    fn token() -> AccessToken {
        AccessToken::new("pk.test").unwrap()
    }

    #[test]
    fn test_base_layers_share_tiling_parameters() {
        for style in BaseStyle::ALL {
            let layer = BaseLayer::new(style, &token());
            assert_eq!(layer.options.tile_size, 512);
            assert_eq!(layer.options.max_zoom, 18);
            assert_eq!(layer.options.zoom_offset, -1);
            assert_eq!(layer.options.id, style.style_id());
            assert_eq!(layer.options.access_token, "pk.test");
        }
    }

    #[test]
    fn test_tile_layer_renders_leaflet_options() {
        let layer = Layer::Base(BaseLayer::new(BaseStyle::Outdoors, &token()));
        let json = serde_json::to_value(layer.render()).unwrap();

        assert_eq!(json["kind"], "tileLayer");
        assert_eq!(json["name"], "Outdoors");
        assert_eq!(json["urlTemplate"], MAPBOX_TILE_URL);
        assert_eq!(json["options"]["tileSize"], 512);
        assert_eq!(json["options"]["zoomOffset"], -1);
        assert_eq!(json["options"]["id"], "mapbox/outdoors-v11");
        assert_eq!(json["options"]["accessToken"], "pk.test");
        assert_eq!(json["visible"], false);
    }

    #[test]
    fn test_toggle_visibility() {
        let mut overlay = Layer::Overlay(OverlayLayer::earthquakes(Vec::new()));
        assert!(overlay.is_visible());
        assert_eq!(overlay.name(), EARTHQUAKES);

        overlay.set_visible(false);
        assert!(!overlay.is_visible());
        assert!(matches!(
            overlay.render(),
            Rendered::CircleMarkers { visible: false, .. }
        ));
    }

    #[test]
    fn test_legend_control_renders_flat() {
        let control = Control::from(build_legend());
        let json = serde_json::to_value(control.render()).unwrap();

        assert_eq!(json["kind"], "legend");
        assert_eq!(json["position"], "bottomright");
        assert_eq!(json["entries"].as_array().unwrap().len(), 6);
        assert_eq!(json["entries"][0]["color"], "#20B2AA");
        assert_eq!(json["entries"][0]["label"], "-10-10");
    }

    #[test]
    fn test_layer_control_is_expanded() {
        let control = Control::Layers(LayerControl::expanded(
            vec!["Satellite".into()],
            vec![EARTHQUAKES.into()],
        ));
        let json = serde_json::to_value(control.render()).unwrap();

        assert_eq!(json["kind"], "layerControl");
        assert_eq!(json["collapsed"], false);
        assert_eq!(json["baseLayers"][0], "Satellite");
        assert_eq!(json["overlays"][0], "Earthquakes");
    }
}
