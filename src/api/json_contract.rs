use serde::{Deserialize, Serialize};

use crate::config::ChartDocument;
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::ChartEngine;

pub const CHART_DOCUMENT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDocumentJsonContractV1 {
    pub schema_version: u32,
    pub document: ChartDocument,
}

impl ChartDocument {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart document json: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartDocumentJsonContractV1 {
            schema_version: CHART_DOCUMENT_JSON_SCHEMA_V1,
            document: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart document contract v1: {e}"))
        })
    }

    /// Reads either a bare document or a versioned envelope.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(document) = serde_json::from_str::<ChartDocument>(input) {
            document.validate()?;
            return Ok(document);
        }
        let payload: ChartDocumentJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse chart document json payload: {e}"))
        })?;
        if payload.schema_version != CHART_DOCUMENT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported chart document schema version: {}",
                payload.schema_version
            )));
        }
        payload.document.validate()?;
        Ok(payload.document)
    }
}

impl<R: Renderer> ChartEngine<R> {
    pub fn document_json_contract_v1_pretty(&self) -> ChartResult<String> {
        self.document().to_json_contract_v1_pretty()
    }

    /// Replaces the document with one read by `from_json_compat_str`.
    pub fn load_document_json(&mut self, input: &str) -> ChartResult<()> {
        let document = ChartDocument::from_json_compat_str(input)?;
        self.set_document(document);
        Ok(())
    }
}
