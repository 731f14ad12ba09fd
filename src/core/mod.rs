pub mod dataset;
pub mod primitives;
pub mod scale;
pub mod types;
pub mod value;

pub use dataset::{DataSet, FieldSelection, Row};
pub use scale::{Scale, ScaleKind, ScaleOptions, Tick, create_scale};
pub use types::{PixelRange, Point, Rect, Viewport};
pub use value::FieldValue;
