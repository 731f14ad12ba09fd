//! chart-geometry: turns rows plus user-edited chart configuration into
//! pixel geometry.
//!
//! The pipeline is a chain of pure functions. [`core::create_scale`] maps
//! domain values to pixels, [`layout::compute_layout`] carves the plotting
//! rectangle out of the canvas, the [`marks`] positioners place bars,
//! points, arcs and treemap cells, and [`render`] builds axis and legend
//! geometry from the same scales. [`api::build_scene`] runs the whole
//! chain for a [`config::ChartDocument`]; [`ChartEngine`] wraps it for an
//! editing session with a [`render::Renderer`].

pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod layout;
pub mod marks;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig, ChartScene, build_scene};
pub use config::{ChartDocument, ChartKind};
pub use error::{ChartError, ChartResult};
