use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaimError {
    #[error("column '{column}' has no usable value/class pairs")]
    EmptyColumn { column: String },
    #[error("{value} is not a legal boundary for the current scheme")]
    IllegalBoundary { value: f64 },
    #[error("discretization was cancelled")]
    Cancelled,
    #[error("column '{column}' is not present in the input")]
    UnknownColumn { column: String },
    #[error("Calling a method that requires object to be fit, when `fit` has not been called.")]
    NotFitted,
    #[error("column '{column}' has {values} values but {labels} class labels")]
    LengthMismatch {
        column: String,
        values: usize,
        labels: usize,
    },
    #[error("unable to read or write model: {0}")]
    Model(#[from] serde_json::Error),
}
