//! Editable chart configuration.
//!
//! These types are plain data owned by the editing session. The engine only
//! reads them; every field has a serde default so partially specified
//! documents load.

mod axis;
mod document;
mod legend;

use serde::{Deserialize, Serialize};

pub use axis::{AxisConfig, AxisPlacement, AxisTypography, TickDensity, TickPolicy};
pub use document::{
    BarSettings, ChartDocument, ChartKind, DEFAULT_PALETTE_ID, DivergingSettings, PolarSettings,
    TreemapSettings,
};
pub use legend::{LegendAlignment, LegendConfig, LegendPlacement};

pub const SMALL_BREAKPOINT_MAX_WIDTH: u32 = 640;
pub const MEDIUM_BREAKPOINT_MAX_WIDTH: u32 = 1024;

/// Canvas-width class used to pick responsive font sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Small,
    Medium,
    Large,
}

impl Breakpoint {
    #[must_use]
    pub fn for_width(width: u32) -> Self {
        if width < SMALL_BREAKPOINT_MAX_WIDTH {
            Self::Small
        } else if width < MEDIUM_BREAKPOINT_MAX_WIDTH {
            Self::Medium
        } else {
            Self::Large
        }
    }
}

/// One value per breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakpointSizes {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

impl BreakpointSizes {
    #[must_use]
    pub const fn new(small: f64, medium: f64, large: f64) -> Self {
        Self {
            small,
            medium,
            large,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Value for `breakpoint`; negative or non-finite entries resolve to 0.
    #[must_use]
    pub fn resolve(self, breakpoint: Breakpoint) -> f64 {
        let value = match breakpoint {
            Breakpoint::Small => self.small,
            Breakpoint::Medium => self.medium,
            Breakpoint::Large => self.large,
        };
        if value.is_finite() { value.max(0.0) } else { 0.0 }
    }
}

/// Canvas edge a guide is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// `true` for top/bottom edges, whose guides run horizontally.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}
