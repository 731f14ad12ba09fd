use serde::{Deserialize, Serialize};

use super::{Breakpoint, BreakpointSizes, Edge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPlacement {
    Top,
    #[default]
    Right,
    Bottom,
    Left,
}

impl LegendPlacement {
    #[must_use]
    pub fn edge(self) -> Edge {
        match self {
            Self::Top => Edge::Top,
            Self::Right => Edge::Right,
            Self::Bottom => Edge::Bottom,
            Self::Left => Edge::Left,
        }
    }
}

/// Distribution of legend entries along the legend band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendAlignment {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub visible: bool,
    pub placement: LegendPlacement,
    pub alignment: LegendAlignment,
    pub font_size: f64,
    pub font_size_multipliers: BreakpointSizes,
    /// Distance between the legend band and the axis/plot next to it.
    pub gap: f64,
    /// Inset of entries inside the legend band.
    pub padding: f64,
    pub swatch_size: f64,
    pub item_spacing: f64,
    pub show_values: bool,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            visible: true,
            placement: LegendPlacement::Right,
            alignment: LegendAlignment::Center,
            font_size: 12.0,
            font_size_multipliers: BreakpointSizes::new(0.85, 1.0, 1.1),
            gap: 8.0,
            padding: 4.0,
            swatch_size: 12.0,
            item_spacing: 16.0,
            show_values: false,
        }
    }
}

impl LegendConfig {
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_placement(mut self, placement: LegendPlacement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: LegendAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_show_values(mut self, show_values: bool) -> Self {
        self.show_values = show_values;
        self
    }

    #[must_use]
    pub fn edge(&self) -> Edge {
        self.placement.edge()
    }

    #[must_use]
    pub fn font_size_for(&self, breakpoint: Breakpoint) -> f64 {
        let base = if self.font_size.is_finite() {
            self.font_size.max(0.0)
        } else {
            0.0
        };
        base * self.font_size_multipliers.resolve(breakpoint)
    }
}
