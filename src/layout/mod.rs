//! Layout calculator: reserves guide space around the plotting rectangle.
//!
//! The margin on each edge is the sum of the legend allowance (when the
//! legend sits on that edge) and the extents of every axis placed there.
//! Top and bottom then receive a constant edge padding. The inner rectangle
//! is whatever remains, clamped at zero.

pub mod text_metrics;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{AxisConfig, Breakpoint, Edge, LegendConfig};
use crate::core::{Rect, Viewport};

use text_metrics::{
    DEFAULT_CHAR_WIDTH_RATIO, estimate_width_for_chars, line_height_px, non_negative,
    rotated_extent,
};

/// Constants that shape the margin box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    /// Cosmetic breathing room added to the top and bottom margins.
    pub edge_padding_px: f64,
    /// Minimum height reserved for a legend on the top/bottom edge.
    pub legend_band_px: f64,
    /// Width reserved for a legend on the left/right edge.
    pub legend_column_px: f64,
    /// Reserved on the legend edge when the legend is hidden and an axis
    /// sits there, so edge labels are not clipped by the canvas.
    pub min_axis_allowance_px: f64,
    pub char_width_ratio: f64,
    /// Label length assumed for vertical axes when no estimate is given.
    pub default_label_chars: usize,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            edge_padding_px: 16.0,
            legend_band_px: 32.0,
            legend_column_px: 120.0,
            min_axis_allowance_px: 12.0,
            char_width_ratio: DEFAULT_CHAR_WIDTH_RATIO,
            default_label_chars: 6,
        }
    }
}

/// An axis plus an optional estimate of its longest tick label.
#[derive(Debug, Clone, Copy)]
pub struct AxisLayoutInput<'a> {
    pub axis: &'a AxisConfig,
    pub max_label_chars: Option<usize>,
}

impl<'a> AxisLayoutInput<'a> {
    #[must_use]
    pub fn new(axis: &'a AxisConfig) -> Self {
        Self {
            axis,
            max_label_chars: None,
        }
    }

    #[must_use]
    pub fn with_label_chars(mut self, max_label_chars: usize) -> Self {
        self.max_label_chars = Some(max_label_chars);
        self
    }
}

/// Margins and inner plotting area for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub canvas: Viewport,
    pub breakpoint: Breakpoint,
    /// Space reserved for the legend, outside the inner rectangle.
    pub legend_band: Option<Rect>,
}

impl LayoutBox {
    #[must_use]
    pub fn inner_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.inner_width, self.inner_height)
    }

    #[must_use]
    pub fn margin(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Margins {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl Margins {
    fn add(&mut self, edge: Edge, amount: f64) {
        let amount = non_negative(amount);
        match edge {
            Edge::Top => self.top += amount,
            Edge::Right => self.right += amount,
            Edge::Bottom => self.bottom += amount,
            Edge::Left => self.left += amount,
        }
    }
}

/// Computes the layout with default tuning and label estimates.
#[must_use]
pub fn compute_layout(canvas: Viewport, legend: &LegendConfig, axes: &[&AxisConfig]) -> LayoutBox {
    let inputs: Vec<AxisLayoutInput<'_>> = axes.iter().map(|axis| AxisLayoutInput::new(axis)).collect();
    compute_layout_tuned(canvas, legend, &inputs, LayoutTuning::default())
}

/// Computes the margin box for `canvas`. Never fails; oversized guides
/// shrink the inner rectangle down to zero.
#[must_use]
pub fn compute_layout_tuned(
    canvas: Viewport,
    legend: &LegendConfig,
    axes: &[AxisLayoutInput<'_>],
    tuning: LayoutTuning,
) -> LayoutBox {
    let breakpoint = Breakpoint::for_width(canvas.width);
    let width = canvas.width_px();
    let height = canvas.height_px();
    let mut margins = Margins::default();

    let legend_edge = legend.edge();
    let legend_allowance = legend
        .visible
        .then(|| legend_allowance(legend, breakpoint, tuning));
    match legend_allowance {
        Some(allowance) => margins.add(legend_edge, allowance + non_negative(legend.gap)),
        None => {
            let axis_on_legend_edge = axes
                .iter()
                .any(|input| input.axis.edge() == Some(legend_edge));
            if axis_on_legend_edge {
                margins.add(legend_edge, tuning.min_axis_allowance_px);
            }
        }
    }

    for input in axes {
        if let Some(edge) = input.axis.edge() {
            margins.add(edge, axis_extent(input, breakpoint, tuning));
        }
    }

    let edge_padding = non_negative(tuning.edge_padding_px);
    margins.top += edge_padding;
    margins.bottom += edge_padding;

    let inner_width = (width - margins.left - margins.right).max(0.0);
    let inner_height = (height - margins.top - margins.bottom).max(0.0);

    let legend_band = legend_allowance.map(|allowance| {
        legend_band_rect(legend_edge, allowance, &margins, canvas, edge_padding, inner_width, inner_height)
    });

    trace!(
        top = margins.top,
        right = margins.right,
        bottom = margins.bottom,
        left = margins.left,
        inner_width,
        inner_height,
        "computed layout"
    );

    LayoutBox {
        top: margins.top,
        right: margins.right,
        bottom: margins.bottom,
        left: margins.left,
        inner_width,
        inner_height,
        canvas,
        breakpoint,
        legend_band,
    }
}

/// Thickness reserved for a visible legend on its edge (excluding the gap).
#[must_use]
pub fn legend_allowance(legend: &LegendConfig, breakpoint: Breakpoint, tuning: LayoutTuning) -> f64 {
    if legend.edge().is_horizontal() {
        let text = line_height_px(legend.font_size_for(breakpoint), 0.0);
        let row = text.max(non_negative(legend.swatch_size)) + 2.0 * non_negative(legend.padding);
        non_negative(tuning.legend_band_px).max(row)
    } else {
        non_negative(tuning.legend_column_px)
    }
}

/// Space an axis needs on its edge: tick, gap, labels and optional title.
#[must_use]
pub fn axis_extent(input: &AxisLayoutInput<'_>, breakpoint: Breakpoint, tuning: LayoutTuning) -> f64 {
    let axis = input.axis;
    let Some(edge) = axis.edge() else {
        return 0.0;
    };

    let font_size = axis.font_size(breakpoint);
    let label_height = line_height_px(font_size, axis.typography.line_height);
    let chars = input.max_label_chars.unwrap_or(tuning.default_label_chars);
    let label_width = estimate_width_for_chars(chars, font_size, tuning.char_width_ratio);
    let (horizontal, vertical) = if axis.label_rotation_deg == 0.0 {
        (label_width, label_height)
    } else {
        rotated_extent(label_width, label_height, axis.label_rotation_deg)
    };
    let label_extent = if edge.is_horizontal() { vertical } else { horizontal };

    let title_extent = if axis.has_title() {
        non_negative(axis.label_title_gap) + non_negative(axis.title_font_size)
    } else {
        0.0
    };

    non_negative(axis.tick_length) + non_negative(axis.tick_label_gap) + label_extent + title_extent
}

fn legend_band_rect(
    edge: Edge,
    allowance: f64,
    margins: &Margins,
    canvas: Viewport,
    edge_padding: f64,
    inner_width: f64,
    inner_height: f64,
) -> Rect {
    let width = canvas.width_px();
    let height = canvas.height_px();
    match edge {
        Edge::Top => Rect::new(margins.left, edge_padding, inner_width, allowance),
        Edge::Bottom => Rect::new(
            margins.left,
            (height - edge_padding - allowance).max(0.0),
            inner_width,
            allowance,
        ),
        Edge::Left => Rect::new(0.0, margins.top, allowance.min(width), inner_height),
        Edge::Right => Rect::new(
            (width - allowance).max(0.0),
            margins.top,
            allowance.min(width),
            inner_height,
        ),
    }
}
