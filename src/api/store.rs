//! Persistence seam for chart documents.
//!
//! Storage itself belongs to the host; this module only fixes the contract
//! and ships an in-memory store that keeps the versioned JSON form, so a
//! save/load cycle exercises the same path a real backend would.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ChartDocument;
use crate::error::ChartResult;

/// Opaque identifier of a saved chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartId(String);

impl ChartId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChartId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

pub trait ChartDocumentStore {
    fn load(&self, id: &ChartId) -> ChartResult<Option<ChartDocument>>;

    fn save(&mut self, id: &ChartId, document: &ChartDocument) -> ChartResult<()>;

    /// Returns whether a document was stored under `id`.
    fn remove(&mut self, id: &ChartId) -> ChartResult<bool>;

    fn ids(&self) -> Vec<ChartId>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryChartStore {
    documents: IndexMap<ChartId, String>,
}

impl InMemoryChartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ChartDocumentStore for InMemoryChartStore {
    fn load(&self, id: &ChartId) -> ChartResult<Option<ChartDocument>> {
        self.documents
            .get(id)
            .map(|json| ChartDocument::from_json_compat_str(json))
            .transpose()
    }

    fn save(&mut self, id: &ChartId, document: &ChartDocument) -> ChartResult<()> {
        let json = document.to_json_contract_v1_pretty()?;
        debug!(chart_id = %id, bytes = json.len(), "saved chart document");
        self.documents.insert(id.clone(), json);
        Ok(())
    }

    fn remove(&mut self, id: &ChartId) -> ChartResult<bool> {
        Ok(self.documents.shift_remove(id).is_some())
    }

    fn ids(&self) -> Vec<ChartId> {
        self.documents.keys().cloned().collect()
    }
}
