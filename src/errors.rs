use thiserror::Error;

/// A result type for covariance function operations
pub type Result<T> = std::result::Result<T, CovError>;

/// An error when building, tuning or sampling a [`CovarianceFunction`](crate::CovarianceFunction)
#[derive(Error, Debug)]
pub enum CovError {
    /// When a covariance function cannot be built with the given dimensions or children
    #[error("Initialization error: {0}")]
    InitError(String),
    /// When a hyperparameter vector does not match the expected parameter dimension
    #[error("Hyperparameter dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length (ie `param_dim`)
        expected: usize,
        /// Length actually given
        actual: usize,
    },
    /// When the kernel matrix cannot be made positive definite
    #[error("Numerical error: {0}")]
    NumericalError(String),
    /// When linear algebra computation fails
    #[error(transparent)]
    LinalgError(#[from] linfa_linalg::LinalgError),
    /// When a covariance function expression cannot be parsed
    #[error("Parse error: {0}")]
    ParseError(String),
    /// When error due to a bad value
    #[error("InvalidValue error: {0}")]
    InvalidValueError(String),
}
