//! Static depth legend.

use serde::Serialize;

use crate::style::DepthColor;

/// Corner of the map a control is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    TopRight,
    BottomRight,
}

/// One swatch of the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub color: DepthColor,
    pub label: &'static str,
}

/// The depth key shown in the map corner. Built once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub position: Position,
    pub entries: Vec<LegendEntry>,
}

/// Build the legend: one entry per depth bracket, shallowest first.
#[must_use]
pub fn build_legend() -> Legend {
    Legend {
        position: Position::BottomRight,
        entries: DepthColor::ALL
            .iter()
            .map(|&color| LegendEntry {
                color,
                label: color.depth_label(),
            })
            .collect(),
    }
}
