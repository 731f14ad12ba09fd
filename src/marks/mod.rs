//! Mark positioners, one module per chart family.
//!
//! Every positioner is a pure function of scales, the inner plotting
//! rectangle and the rows. Rows that cannot be placed are skipped rather
//! than reported.

pub mod cartesian;
pub mod diverging;
pub mod polar;
pub mod treemap;

use serde::{Deserialize, Serialize};

pub use cartesian::{
    BarGeometry, PointGeometry, SeriesPath, position_bars, position_lines, position_points,
};
pub use diverging::{
    SortMode, ordered_labels, position_diverging_bars, sort_permutation, symmetric_domain,
};
pub use polar::{
    ArcGeometry, PolarLayout, polar_to_cartesian, position_pie, position_polar_area,
    position_radial_bars,
};
pub use treemap::{TilingMethod, TreeNode, TreemapCell, build_tree, position_treemap, tile};

/// Direction bars grow in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarOrientation {
    /// Columns rising from a horizontal baseline.
    #[default]
    Vertical,
    Horizontal,
}

/// Positioned mark of any family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkGeometry {
    Point(PointGeometry),
    Bar(BarGeometry),
    Line(SeriesPath),
    Arc(ArcGeometry),
    TreemapCell(TreemapCell),
}

impl MarkGeometry {
    /// Key used to look up the mark's colour in the colour assignment.
    #[must_use]
    pub fn color_key(&self) -> &str {
        match self {
            Self::Point(point) => &point.series,
            Self::Bar(bar) => &bar.series,
            Self::Line(path) => &path.series,
            Self::Arc(arc) => &arc.label,
            Self::TreemapCell(cell) => cell.color_key(),
        }
    }
}

impl From<PointGeometry> for MarkGeometry {
    fn from(value: PointGeometry) -> Self {
        Self::Point(value)
    }
}

impl From<BarGeometry> for MarkGeometry {
    fn from(value: BarGeometry) -> Self {
        Self::Bar(value)
    }
}

impl From<SeriesPath> for MarkGeometry {
    fn from(value: SeriesPath) -> Self {
        Self::Line(value)
    }
}

impl From<ArcGeometry> for MarkGeometry {
    fn from(value: ArcGeometry) -> Self {
        Self::Arc(value)
    }
}

impl From<TreemapCell> for MarkGeometry {
    fn from(value: TreemapCell) -> Self {
        Self::TreemapCell(value)
    }
}
