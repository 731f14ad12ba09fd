use serde::{Deserialize, Serialize};

use crate::core::{FieldSelection, ScaleKind};
use crate::error::{ChartError, ChartResult};
use crate::marks::{BarOrientation, SortMode, TilingMethod};

use super::{AxisConfig, AxisPlacement, LegendConfig};

pub const DEFAULT_PALETTE_ID: &str = "category10";

/// Chart type selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Line,
    Scatter,
    #[default]
    Bar,
    DivergingBar,
    Pie,
    Donut,
    PolarArea,
    RadialBar,
    Treemap,
}

impl ChartKind {
    /// Whether the chart draws x/y axes around a rectangular plot.
    #[must_use]
    pub fn is_cartesian(self) -> bool {
        matches!(
            self,
            Self::Line | Self::Scatter | Self::Bar | Self::DivergingBar
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarSettings {
    pub orientation: BarOrientation,
    /// Fraction of each band left empty between grouped series bars.
    pub group_padding: f64,
}

impl Default for BarSettings {
    fn default() -> Self {
        Self {
            orientation: BarOrientation::Vertical,
            group_padding: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DivergingSettings {
    pub sort_mode: SortMode,
    /// Use `[-m, m]` as the value domain so zero sits in the middle.
    pub symmetric_domain: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarSettings {
    pub pad_angle_deg: f64,
    /// Inner radius as a fraction of the outer radius (donut hole).
    pub inner_radius_ratio: f64,
    pub start_angle_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreemapSettings {
    pub tiling: TilingMethod,
    pub padding_inner: f64,
    pub padding_outer: f64,
    /// Optional parent field; rows sharing a value are nested under it.
    pub group_field: Option<String>,
}

impl Default for TreemapSettings {
    fn default() -> Self {
        Self {
            tiling: TilingMethod::Squarify,
            padding_inner: 2.0,
            padding_outer: 2.0,
            group_field: None,
        }
    }
}

/// Persisted chart configuration: everything needed to rebuild the scene
/// from a row set and a canvas size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDocument {
    #[serde(default)]
    pub kind: ChartKind,
    pub fields: FieldSelection,
    #[serde(default = "AxisConfig::category_x")]
    pub x_axis: AxisConfig,
    #[serde(default = "AxisConfig::value_y")]
    pub y_axis: AxisConfig,
    #[serde(default)]
    pub legend: LegendConfig,
    #[serde(default = "default_palette_id")]
    pub palette_id: String,
    #[serde(default)]
    pub color_palette_extend: bool,
    #[serde(default)]
    pub bar: BarSettings,
    #[serde(default)]
    pub diverging: DivergingSettings,
    #[serde(default)]
    pub polar: PolarSettings,
    #[serde(default)]
    pub treemap: TreemapSettings,
}

fn default_palette_id() -> String {
    DEFAULT_PALETTE_ID.to_owned()
}

impl ChartDocument {
    /// Creates a document with per-kind axis defaults.
    #[must_use]
    pub fn new(kind: ChartKind, fields: FieldSelection) -> Self {
        let (x_axis, y_axis) = match kind {
            ChartKind::Line => (
                AxisConfig::category_x().with_scale_kind(ScaleKind::OrdinalPoint),
                AxisConfig::value_y(),
            ),
            ChartKind::Scatter => (
                AxisConfig::default().with_scale_kind(ScaleKind::Linear),
                AxisConfig {
                    force_zero: false,
                    ..AxisConfig::value_y()
                },
            ),
            ChartKind::Bar => (AxisConfig::category_x(), AxisConfig::value_y()),
            ChartKind::DivergingBar => (
                AxisConfig {
                    placement: AxisPlacement::Bottom,
                    force_zero: true,
                    show_grid: true,
                    ..AxisConfig::default()
                },
                AxisConfig::category_x().with_placement(AxisPlacement::Left),
            ),
            ChartKind::Pie
            | ChartKind::Donut
            | ChartKind::PolarArea
            | ChartKind::RadialBar
            | ChartKind::Treemap => (AxisConfig::hidden(), AxisConfig::hidden()),
        };

        let polar = match kind {
            ChartKind::Donut => PolarSettings {
                inner_radius_ratio: 0.5,
                ..PolarSettings::default()
            },
            ChartKind::RadialBar => PolarSettings {
                inner_radius_ratio: 0.2,
                ..PolarSettings::default()
            },
            _ => PolarSettings::default(),
        };

        Self {
            kind,
            fields,
            x_axis,
            y_axis,
            legend: LegendConfig::default(),
            palette_id: default_palette_id(),
            color_palette_extend: false,
            bar: BarSettings::default(),
            diverging: DivergingSettings::default(),
            polar,
            treemap: TreemapSettings::default(),
        }
    }

    #[must_use]
    pub fn with_x_axis(mut self, axis: AxisConfig) -> Self {
        self.x_axis = axis;
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, axis: AxisConfig) -> Self {
        self.y_axis = axis;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: LegendConfig) -> Self {
        self.legend = legend;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette_id: impl Into<String>, extend: bool) -> Self {
        self.palette_id = palette_id.into();
        self.color_palette_extend = extend;
        self
    }

    #[must_use]
    pub fn with_diverging(mut self, diverging: DivergingSettings) -> Self {
        self.diverging = diverging;
        self
    }

    #[must_use]
    pub fn with_polar(mut self, polar: PolarSettings) -> Self {
        self.polar = polar;
        self
    }

    #[must_use]
    pub fn with_treemap(mut self, treemap: TreemapSettings) -> Self {
        self.treemap = treemap;
        self
    }

    /// Replaces the bar settings. Switching a bar chart's orientation
    /// moves the category and value scale settings to the other axis, so
    /// categories stay on the band axis.
    #[must_use]
    pub fn with_bar(mut self, bar: BarSettings) -> Self {
        if self.kind == ChartKind::Bar && bar.orientation != self.bar.orientation {
            self.x_axis.swap_scale_settings(&mut self.y_axis);
        }
        self.bar = bar;
        self
    }

    /// Checks that cartesian axes sit on an edge matching their direction:
    /// x on top/bottom, y on left/right. Hidden axes always pass.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.kind.is_cartesian() {
            return Ok(());
        }
        if let Some(edge) = self.x_axis.edge().filter(|edge| !edge.is_horizontal()) {
            return Err(ChartError::InvalidAxisPlacement(format!(
                "x axis must sit on the top or bottom edge, got {edge:?}"
            )));
        }
        if let Some(edge) = self.y_axis.edge().filter(|edge| edge.is_horizontal()) {
            return Err(ChartError::InvalidAxisPlacement(format!(
                "y axis must sit on the left or right edge, got {edge:?}"
            )));
        }
        Ok(())
    }
}
