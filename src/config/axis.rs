use serde::{Deserialize, Serialize};

use crate::core::{ScaleKind, ScaleOptions};
use crate::core::scale::{DEFAULT_BAND_PADDING, DEFAULT_NICE_COUNT};

use super::{Breakpoint, BreakpointSizes, Edge};

const MIN_TICKS: usize = 2;
const MAX_TICKS: usize = 20;

/// Where an axis is drawn; `Hidden` removes it from layout entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisPlacement {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
    Hidden,
}

impl AxisPlacement {
    #[must_use]
    pub fn edge(self) -> Option<Edge> {
        match self {
            Self::Top => Some(Edge::Top),
            Self::Right => Some(Edge::Right),
            Self::Bottom => Some(Edge::Bottom),
            Self::Left => Some(Edge::Left),
            Self::Hidden => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickDensity {
    Sparse,
    #[default]
    Normal,
    Dense,
}

impl TickDensity {
    /// Target pixel distance between ticks.
    #[must_use]
    pub fn target_spacing_px(self, horizontal: bool) -> f64 {
        match (self, horizontal) {
            (Self::Sparse, true) => 140.0,
            (Self::Normal, true) => 90.0,
            (Self::Dense, true) => 55.0,
            (Self::Sparse, false) => 90.0,
            (Self::Normal, false) => 55.0,
            (Self::Dense, false) => 35.0,
        }
    }
}

/// How many ticks an axis asks its scale for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TickPolicy {
    Count { count: usize },
    Density { density: TickDensity },
}

impl Default for TickPolicy {
    fn default() -> Self {
        Self::Density {
            density: TickDensity::Normal,
        }
    }
}

impl TickPolicy {
    /// Resolves the policy to a tick count for an axis spanning `axis_span_px`.
    #[must_use]
    pub fn target_count(self, axis_span_px: f64, horizontal: bool) -> usize {
        match self {
            Self::Count { count } => count.clamp(1, MAX_TICKS * 3),
            Self::Density { density } => axis_tick_target_count(
                axis_span_px,
                density.target_spacing_px(horizontal),
                MIN_TICKS,
                MAX_TICKS,
            ),
        }
    }
}

pub(crate) fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Tick label typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisTypography {
    pub font_size: BreakpointSizes,
    pub font_weight: u16,
    pub color: String,
    pub line_height: f64,
}

impl Default for AxisTypography {
    fn default() -> Self {
        Self {
            font_size: BreakpointSizes::new(10.0, 11.0, 12.0),
            font_weight: 400,
            color: "#4b5563".to_owned(),
            line_height: 1.2,
        }
    }
}

/// Per-axis configuration as edited by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub visible: bool,
    pub placement: AxisPlacement,
    pub scale_kind: ScaleKind,
    pub domain_min: Option<f64>,
    pub domain_max: Option<f64>,
    pub nice: bool,
    pub force_zero: bool,
    pub reverse: bool,
    pub band_padding: f64,
    pub tick_policy: TickPolicy,
    pub typography: AxisTypography,
    pub tick_length: f64,
    pub tick_label_gap: f64,
    pub label_title_gap: f64,
    pub label_rotation_deg: f64,
    pub title: Option<String>,
    pub title_font_size: f64,
    pub show_grid: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            visible: true,
            placement: AxisPlacement::Bottom,
            scale_kind: ScaleKind::Linear,
            domain_min: None,
            domain_max: None,
            nice: true,
            force_zero: false,
            reverse: false,
            band_padding: DEFAULT_BAND_PADDING,
            tick_policy: TickPolicy::default(),
            typography: AxisTypography::default(),
            tick_length: 6.0,
            tick_label_gap: 4.0,
            label_title_gap: 8.0,
            label_rotation_deg: 0.0,
            title: None,
            title_font_size: 13.0,
            show_grid: false,
        }
    }
}

impl AxisConfig {
    /// Category axis along the bottom edge.
    #[must_use]
    pub fn category_x() -> Self {
        Self {
            placement: AxisPlacement::Bottom,
            scale_kind: ScaleKind::OrdinalBand,
            nice: false,
            ..Self::default()
        }
    }

    /// Value axis along the left edge, including zero.
    #[must_use]
    pub fn value_y() -> Self {
        Self {
            placement: AxisPlacement::Left,
            scale_kind: ScaleKind::Linear,
            force_zero: true,
            show_grid: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: false,
            placement: AxisPlacement::Hidden,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_placement(mut self, placement: AxisPlacement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn with_scale_kind(mut self, scale_kind: ScaleKind) -> Self {
        self.scale_kind = scale_kind;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_font_size(mut self, font_size: BreakpointSizes) -> Self {
        self.typography.font_size = font_size;
        self
    }

    #[must_use]
    pub fn with_label_rotation(mut self, degrees: f64) -> Self {
        self.label_rotation_deg = degrees;
        self
    }

    #[must_use]
    pub fn with_domain(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.domain_min = min;
        self.domain_max = max;
        self
    }

    #[must_use]
    pub fn with_tick_policy(mut self, tick_policy: TickPolicy) -> Self {
        self.tick_policy = tick_policy;
        self
    }

    #[must_use]
    pub fn with_force_zero(mut self, force_zero: bool) -> Self {
        self.force_zero = force_zero;
        self
    }

    /// Exchanges what the scale encodes with `other`, keeping placement
    /// and typography where they are.
    pub fn swap_scale_settings(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.scale_kind, &mut other.scale_kind);
        std::mem::swap(&mut self.domain_min, &mut other.domain_min);
        std::mem::swap(&mut self.domain_max, &mut other.domain_max);
        std::mem::swap(&mut self.nice, &mut other.nice);
        std::mem::swap(&mut self.force_zero, &mut other.force_zero);
        std::mem::swap(&mut self.reverse, &mut other.reverse);
        std::mem::swap(&mut self.band_padding, &mut other.band_padding);
        std::mem::swap(&mut self.show_grid, &mut other.show_grid);
        std::mem::swap(&mut self.title, &mut other.title);
    }

    /// Edge the axis occupies, or `None` when it takes no space.
    #[must_use]
    pub fn edge(&self) -> Option<Edge> {
        if self.visible { self.placement.edge() } else { None }
    }

    #[must_use]
    pub fn is_displayed(&self) -> bool {
        self.edge().is_some()
    }

    #[must_use]
    pub fn font_size(&self, breakpoint: Breakpoint) -> f64 {
        self.typography.font_size.resolve(breakpoint)
    }

    #[must_use]
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|title| !title.trim().is_empty())
    }

    #[must_use]
    pub fn scale_options(&self) -> ScaleOptions {
        ScaleOptions {
            nice: self.nice,
            nice_count: DEFAULT_NICE_COUNT,
            force_zero: self.force_zero,
            domain_min: self.domain_min,
            domain_max: self.domain_max,
            padding: self.band_padding,
            reverse: self.reverse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_count_grows_with_span() {
        let policy = TickPolicy::default();
        assert_eq!(policy.target_count(0.0, true), MIN_TICKS);
        assert_eq!(policy.target_count(450.0, true), 6);
        assert_eq!(policy.target_count(100_000.0, true), MAX_TICKS);
    }

    #[test]
    fn hidden_placement_occupies_no_edge() {
        let axis = AxisConfig::default().with_placement(AxisPlacement::Hidden);
        assert_eq!(axis.edge(), None);
        let axis = AxisConfig {
            visible: false,
            ..AxisConfig::value_y()
        };
        assert!(!axis.is_displayed());
    }
}
