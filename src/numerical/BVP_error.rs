//! Error type shared by the integrator, the BVP drivers, the linear solver and the result sinks.
use thiserror::Error;

pub type BvpResult<T> = Result<T, BvpError>;

#[derive(Debug, Error)]
pub enum BvpError {
    /// The right-hand side was evaluated outside of its domain (e.g. square root of a negative state)
    #[error("domain error at x = {x}: state value {value} is outside of the equation domain")]
    Domain { x: f64, value: f64 },

    /// Two consecutive secant residuals coincide, the secant line has no root
    #[error(
        "secant method degenerated at iteration {iteration}: residual difference vanished (slope = {slope}, residual = {residual})"
    )]
    DegenerateSecant {
        iteration: usize,
        slope: f64,
        residual: f64,
    },

    #[error("zero pivot in tridiagonal system at row {row}")]
    ZeroPivot { row: usize },

    #[error(
        "shooting method did not converge after {iterations} iterations: last slope = {slope}, residual = {residual}"
    )]
    ShootingNotConverged {
        iterations: usize,
        slope: f64,
        residual: f64,
    },

    #[error(
        "quasilinearization did not converge after {iterations} iterations: max correction = {max_correction}"
    )]
    QuasilinearizationNotConverged {
        iterations: usize,
        max_correction: f64,
        estimate: Vec<f64>,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("task configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl BvpError {
    /// true for failures produced by an iterative method that ran out of iterations
    pub fn is_non_convergence(&self) -> bool {
        matches!(
            self,
            BvpError::ShootingNotConverged { .. } | BvpError::QuasilinearizationNotConverged { .. }
        )
    }
}
