pub mod axis;
mod frame;
pub mod legend;
mod null_renderer;
pub mod palette;
mod primitives;

pub use axis::{AxisGeometry, AxisTickGeometry, AxisTitleGeometry, Segment, build_axis};
pub use frame::RenderFrame;
pub use legend::{LegendEntry, LegendGeometry, build_legend};
pub use null_renderer::NullRenderer;
pub use palette::{BuiltinPalettes, ColorAssignment, CustomPalettes, PaletteSource, resolve_palette};
pub use primitives::{
    ArcPrimitive, CirclePrimitive, Color, LinePrimitive, PolylinePrimitive, RectPrimitive,
    TextHAlign, TextPrimitive, TextVAlign,
};

use crate::error::ChartResult;

/// Contract implemented by any drawing surface.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from scale and layout math.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
