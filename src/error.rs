use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    /// An ownership or uniqueness invariant of the plot model was violated.
    #[error("structural error: {0}")]
    Structural(String),

    #[error("no axis with key `{key}`")]
    AxisNotFound { key: String },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
