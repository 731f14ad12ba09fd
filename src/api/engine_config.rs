use serde::{Deserialize, Serialize};

use crate::config::ChartDocument;
use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::layout::LayoutTuning;

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can persist a chart setup next to the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    pub document: ChartDocument,
    #[serde(default)]
    pub layout: LayoutTuning,
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport, document: ChartDocument) -> Self {
        Self {
            viewport,
            document,
            layout: LayoutTuning::default(),
        }
    }

    #[must_use]
    pub fn with_layout_tuning(mut self, layout: LayoutTuning) -> Self {
        self.layout = layout;
        self
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize engine config: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse engine config: {e}")))
    }
}
