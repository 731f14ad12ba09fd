use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ArcPrimitive, CirclePrimitive, LinePrimitive, PolylinePrimitive, RectPrimitive, TextPrimitive,
};

/// Backend-agnostic scene for one chart draw pass.
///
/// Primitive lists are drawn in field order: rects, arcs, polylines,
/// circles, lines, texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub rects: Vec<RectPrimitive>,
    pub arcs: Vec<ArcPrimitive>,
    pub polylines: Vec<PolylinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: Vec::new(),
            arcs: Vec::new(),
            polylines: Vec::new(),
            circles: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_arc(mut self, arc: ArcPrimitive) -> Self {
        self.arcs.push(arc);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for rect in &self.rects {
            rect.validate()?;
        }
        for arc in &self.arcs {
            arc.validate()?;
        }
        for polyline in &self.polylines {
            polyline.validate()?;
        }
        for circle in &self.circles {
            circle.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.rects.len()
            + self.arcs.len()
            + self.polylines.len()
            + self.circles.len()
            + self.lines.len()
            + self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}
