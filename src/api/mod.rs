//! Public entry points: scene building, the engine and document I/O.

mod engine;
mod engine_config;
mod json_contract;
mod scene;
mod store;

pub use engine::ChartEngine;
pub use engine_config::ChartEngineConfig;
pub use json_contract::{CHART_DOCUMENT_JSON_SCHEMA_V1, ChartDocumentJsonContractV1};
pub use scene::{ChartScene, build_scene, build_scene_tuned};
pub use store::{ChartDocumentStore, ChartId, InMemoryChartStore};
