//! Map composition.
//!
//! A [`ViewHandle`] owns every layer and control of one rendered map. It is
//! built by [`MapComposer::build_view`] and passed explicitly to whatever
//! attaches more controls to it.

use std::fmt::Display;

use chrono::TimeZone;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::AccessToken;
use crate::errors::QuakemapError;
use crate::layers::{
    BaseLayer, BaseStyle, Control, Layer, LayerControl, MapComponent, OverlayLayer, Rendered,
};
use crate::legend::{Legend, build_legend};
use crate::models::EventRecord;
use crate::style::style_events;

/// Element id the map is mounted into.
pub const CONTAINER_ID: &str = "mapid";

/// Initial map center (latitude, longitude): the contiguous United States.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 37.09,
    lng: -95.71,
};

pub const DEFAULT_ZOOM: u8 = 5;

/// Banner shown when the feed could not be loaded. The cause goes to the log.
pub const FEED_NOTICE: &str = "Earthquake data is unavailable right now; showing the map without markers.";

/// Base style active on load.
const DEFAULT_BASE: BaseStyle = BaseStyle::Satellite;

/// Geographic point, serialized as Leaflet's `[lat, lng]` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl Serialize for LatLng {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.lat, self.lng].serialize(serializer)
    }
}

/// One composed map view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewHandle {
    container: String,
    center: LatLng,
    zoom: u8,
    layers: Vec<Layer>,
    controls: Vec<Control>,
    notice: Option<String>,
}

/// Everything the page bootstrap needs to instantiate a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub container: String,
    pub center: LatLng,
    pub zoom: u8,
    pub layers: Vec<Rendered>,
    pub controls: Vec<Rendered>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ViewHandle {
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Show a non-fatal message above the map.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Add a control to the view.
    pub fn attach(&mut self, control: impl Into<Control>) {
        self.controls.push(control.into());
    }

    /// Add the depth legend to the view.
    pub fn attach_legend(&mut self, legend: Legend) {
        self.attach(legend);
    }

    /// The active base layer.
    #[must_use]
    pub fn active_base(&self) -> Option<BaseStyle> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Base(base) if layer.is_visible() => Some(base.style),
            _ => None,
        })
    }

    /// Make `style` the only visible base layer.
    ///
    /// Returns `false` if the view has no such base layer, leaving the
    /// current selection untouched.
    pub fn select_base(&mut self, style: BaseStyle) -> bool {
        let registered = self
            .layers
            .iter()
            .any(|layer| matches!(layer, Layer::Base(base) if base.style == style));
        if !registered {
            return false;
        }

        for layer in &mut self.layers {
            if matches!(layer, Layer::Base(_)) {
                let active = matches!(&*layer, Layer::Base(base) if base.style == style);
                layer.set_visible(active);
            }
        }
        true
    }

    /// Show or hide the overlay called `name`.
    ///
    /// Returns `false` if there is no such overlay.
    pub fn set_overlay_visible(&mut self, name: &str, visible: bool) -> bool {
        let mut found = false;
        for layer in &mut self.layers {
            if matches!(layer, Layer::Overlay(_)) && layer.name() == name {
                layer.set_visible(visible);
                found = true;
            }
        }
        found
    }

    /// Serializable description of the view.
    #[must_use]
    pub fn scene(&self) -> Scene {
        Scene {
            container: self.container.clone(),
            center: self.center,
            zoom: self.zoom,
            layers: self.layers.iter().map(MapComponent::render).collect(),
            controls: self.controls.iter().map(MapComponent::render).collect(),
            notice: self.notice.clone(),
        }
    }
}

/// Builds map views with a fixed set of credentialed base layers.
#[derive(Debug, Clone)]
pub struct MapComposer {
    token: AccessToken,
}

impl MapComposer {
    #[must_use]
    pub fn new(token: AccessToken) -> Self {
        Self { token }
    }

    /// Compose a view around `overlay`.
    ///
    /// The view starts on the satellite base layer with the overlay shown,
    /// and carries an always-expanded layer control.
    #[must_use]
    pub fn build_view(&self, overlay: OverlayLayer) -> ViewHandle {
        let mut layers: Vec<Layer> = BaseStyle::ALL
            .iter()
            .map(|&style| Layer::Base(BaseLayer::new(style, &self.token)))
            .collect();
        let overlay_name = overlay.name.clone();
        layers.push(Layer::Overlay(overlay));

        let control = LayerControl::expanded(
            BaseStyle::ALL.iter().map(|s| s.name().to_string()).collect(),
            vec![overlay_name],
        );

        let mut view = ViewHandle {
            container: CONTAINER_ID.to_string(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            layers,
            controls: vec![Control::Layers(control)],
            notice: None,
        };
        view.select_base(DEFAULT_BASE);
        view
    }

    /// Run one render pass over the outcome of a feed load.
    ///
    /// A failed load still yields a map: base layers, an empty overlay and
    /// a notice. Other errors are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns any error that is not a recoverable feed failure.
    pub fn compose<Tz>(
        &self,
        loaded: Result<Vec<EventRecord>, QuakemapError>,
        tz: &Tz,
    ) -> Result<ViewHandle, QuakemapError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let (markers, notice) = match loaded {
            Ok(events) => (style_events(&events, tz), None),
            Err(e) if e.is_recoverable() => {
                warn!("rendering map without earthquakes: {e}");
                (Vec::new(), Some(FEED_NOTICE.to_string()))
            }
            Err(e) => return Err(e),
        };

        debug!("composing view with {} markers", markers.len());

        let mut view = self.build_view(OverlayLayer::earthquakes(markers));
        if let Some(notice) = notice {
            view.set_notice(notice);
        }
        view.attach_legend(build_legend());
        Ok(view)
    }
}
