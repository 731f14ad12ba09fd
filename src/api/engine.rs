use tracing::debug;

use crate::config::ChartDocument;
use crate::core::{DataSet, Row, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::layout::LayoutTuning;
use crate::render::{CustomPalettes, PaletteSource, Renderer};

use super::{ChartEngineConfig, ChartScene, build_scene_tuned};

/// Holds the editing session's document and rows, and renders scenes
/// built from them through a `Renderer`.
///
/// Every scene is rebuilt from scratch; the engine keeps no derived
/// geometry between renders.
pub struct ChartEngine<R: Renderer> {
    renderer: R,
    viewport: Viewport,
    document: ChartDocument,
    dataset: DataSet,
    palettes: CustomPalettes,
    layout: LayoutTuning,
}

impl<R: Renderer> ChartEngine<R> {
    pub fn new(renderer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        validate_viewport(config.viewport)?;
        Ok(Self {
            renderer,
            viewport: config.viewport,
            document: config.document,
            dataset: DataSet::default(),
            palettes: CustomPalettes::default(),
            layout: config.layout,
        })
    }

    #[must_use]
    pub fn with_palettes(mut self, palettes: CustomPalettes) -> Self {
        self.palettes = palettes;
        self
    }

    pub fn set_data(&mut self, rows: Vec<Row>) {
        let dataset = DataSet::from_rows(rows);
        debug!(
            rows = dataset.len(),
            fields = dataset.fields().len(),
            "set chart rows"
        );
        self.dataset = dataset;
    }

    pub fn set_dataset(&mut self, dataset: DataSet) {
        self.dataset = dataset;
    }

    pub fn set_document(&mut self, document: ChartDocument) {
        debug!(kind = ?document.kind, "set chart document");
        self.document = document;
    }

    /// Applies an in-place edit to the document.
    pub fn update_document(&mut self, edit: impl FnOnce(&mut ChartDocument)) {
        edit(&mut self.document);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        validate_viewport(viewport)?;
        self.viewport = viewport;
        Ok(())
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn document(&self) -> &ChartDocument {
        &self.document
    }

    #[must_use]
    pub fn dataset(&self) -> &DataSet {
        &self.dataset
    }

    #[must_use]
    pub fn palettes(&self) -> &dyn PaletteSource {
        &self.palettes
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Builds the scene for the current document, rows and viewport.
    pub fn scene(&self) -> ChartResult<ChartScene> {
        build_scene_tuned(
            &self.document,
            &self.dataset,
            self.viewport,
            &self.palettes,
            self.layout,
        )
    }

    /// Builds the scene and hands its frame to the renderer.
    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.scene()?.to_render_frame();
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

fn validate_viewport(viewport: Viewport) -> ChartResult<()> {
    if viewport.is_valid() {
        Ok(())
    } else {
        Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        })
    }
}
