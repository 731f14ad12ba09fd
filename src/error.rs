use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid field selection: {0}")]
    InvalidFieldSelection(String),

    #[error("invalid axis placement: {0}")]
    InvalidAxisPlacement(String),

    #[error("unknown scale kind: `{0}`")]
    UnknownScaleKind(String),

    #[error("unknown tiling method: `{0}`")]
    UnknownTilingMethod(String),
}
