//! HTML page for a composed view.
//!
//! The page mounts Leaflet into the `#mapid` container and instantiates
//! whatever the embedded scene lists. The bootstrap script is generic: all
//! styling and composition decisions are already in the scene.

use crate::errors::QuakemapError;
use crate::view::ViewHandle;

/// Placeholder replaced by the scene JSON.
const SCENE_SLOT: &str = "__SCENE_JSON__";

/// Placeholder replaced by the notice banner, if any.
const NOTICE_SLOT: &str = "__NOTICE__";

/// Placeholder replaced by the map container id.
const CONTAINER_SLOT: &str = "__CONTAINER__";

/// Render `view` as a standalone HTML document.
///
/// # Errors
///
/// Returns an error if the scene cannot be serialized.
pub fn render_page(view: &ViewHandle) -> Result<String, QuakemapError> {
    let scene = scene_json(view)?;
    let notice = view
        .notice()
        .map(|n| format!(r#"<div class="notice" role="alert">{}</div>"#, escape_text(n)))
        .unwrap_or_default();

    Ok(PAGE_HTML
        .replacen(CONTAINER_SLOT, &escape_text(view.container()), 1)
        .replacen(NOTICE_SLOT, &notice, 1)
        .replacen(SCENE_SLOT, &scene, 1))
}

/// Scene JSON, safe to embed inside a `<script>` element.
///
/// # Errors
///
/// Returns an error if the scene cannot be serialized.
pub fn scene_json(view: &ViewHandle) -> Result<String, QuakemapError> {
    let json = serde_json::to_string(&view.scene())?;
    // `<\/` is the same string to a JSON parser but cannot close the element.
    Ok(json.replace("</", r"<\/"))
}

/// Escape text placed in element content.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ============================================================================
// HTML Template (embedded for single-binary deployment)
// ============================================================================

const PAGE_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Earthquake Map</title>

    <!-- Leaflet -->
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>

    <style>
        html, body, .map {
            height: 100%;
            margin: 0;
            padding: 0;
        }

        .notice {
            position: absolute;
            top: 10px;
            left: 50%;
            transform: translateX(-50%);
            z-index: 1000;
            padding: 8px 16px;
            border-radius: 6px;
            background: #fff3cd;
            color: #664d03;
            font: 14px/1.4 -apple-system, BlinkMacSystemFont, sans-serif;
            box-shadow: 0 1px 4px rgba(0, 0, 0, 0.3);
        }

        .info.legend {
            padding: 6px 8px;
            background: rgba(255, 255, 255, 0.9);
            border-radius: 5px;
            box-shadow: 0 0 15px rgba(0, 0, 0, 0.2);
            font: 14px/16px Arial, Helvetica, sans-serif;
        }

        .info.legend li {
            list-style: none;
            padding: 2px 8px;
            margin: 0;
        }
    </style>
</head>
<body>
    __NOTICE__
    <div id="__CONTAINER__" class="map"></div>

    <script type="application/json" id="scene">__SCENE_JSON__</script>
    <script>
    (function () {
        var scene = JSON.parse(document.getElementById('scene').textContent);
        var map = L.map(scene.container, { center: scene.center, zoom: scene.zoom });
        var baseMaps = {};
        var overlayMaps = {};

        scene.layers.forEach(function (spec) {
            var layer;
            if (spec.kind === 'tileLayer') {
                layer = L.tileLayer(spec.urlTemplate, spec.options);
                baseMaps[spec.name] = layer;
            } else if (spec.kind === 'circleMarkers') {
                layer = L.layerGroup(spec.markers.map(function (m) {
                    return L.circleMarker([m.latitude, m.longitude], m.style).bindPopup(m.popup);
                }));
                overlayMaps[spec.name] = layer;
            }
            if (layer && spec.visible) {
                layer.addTo(map);
            }
        });

        scene.controls.forEach(function (spec) {
            if (!spec.visible) {
                return;
            }
            if (spec.kind === 'layerControl') {
                var bases = {};
                spec.baseLayers.forEach(function (name) { bases[name] = baseMaps[name]; });
                var overlays = {};
                spec.overlays.forEach(function (name) { overlays[name] = overlayMaps[name]; });
                L.control.layers(bases, overlays, {
                    collapsed: spec.collapsed,
                    position: spec.position
                }).addTo(map);
            } else if (spec.kind === 'legend') {
                var legend = L.control({ position: spec.position });
                legend.onAdd = function () {
                    var div = L.DomUtil.create('div', 'info legend');
                    spec.entries.forEach(function (entry) {
                        var li = document.createElement('li');
                        li.style.backgroundColor = entry.color;
                        li.textContent = entry.label;
                        div.appendChild(li);
                    });
                    return div;
                };
                legend.addTo(map);
            }
        });
    })();
    </script>
</body>
</html>
"##;
