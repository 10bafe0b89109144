//! Problem configuration (domain, Dirichlet values, tolerance, iteration cap), uniform meshes
//! and the trajectories returned by the solvers.
use crate::numerical::BVP_error::{BvpError, BvpResult};
use nalgebra::DVector;

/// Dirichlet BVP on [x0, x1] with y(x0) = y0, y(x1) = y1 plus the stopping rules of the iterative drivers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvpConfig {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BvpConfig {
    fn default() -> Self {
        Self {
            x0: 0.0,
            x1: 1.0,
            y0: 0.0,
            y1: 2.0,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl BvpConfig {
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64, tolerance: f64, max_iterations: usize) -> Self {
        Self {
            x0,
            x1,
            y0,
            y1,
            tolerance,
            max_iterations,
        }
    }

    pub fn validate(&self) -> BvpResult<()> {
        if !(self.x0.is_finite() && self.x1.is_finite()) || self.x1 <= self.x0 {
            return Err(BvpError::InvalidInput(format!(
                "domain must satisfy x0 < x1, got [{}, {}]",
                self.x0, self.x1
            )));
        }
        if !(self.y0.is_finite() && self.y1.is_finite()) {
            return Err(BvpError::InvalidInput(format!(
                "boundary values must be finite, got y0 = {}, y1 = {}",
                self.y0, self.y1
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(BvpError::InvalidInput(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(BvpError::InvalidInput(
                "max_iterations must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// step of the uniform mesh with `n_steps` intervals
    pub fn step_size(&self, n_steps: usize) -> BvpResult<f64> {
        if n_steps == 0 {
            return Err(BvpError::InvalidInput(
                "number of steps must be at least 1".to_string(),
            ));
        }
        Ok((self.x1 - self.x0) / n_steps as f64)
    }

    /// n_steps + 1 nodes, the last one is exactly x1
    pub fn create_mesh(&self, n_steps: usize) -> BvpResult<DVector<f64>> {
        let h = self.step_size(n_steps)?;
        let mut x_mesh = DVector::from_fn(n_steps + 1, |i, _| self.x0 + i as f64 * h);
        x_mesh[n_steps] = self.x1;
        Ok(x_mesh)
    }

    /// straight line through both boundary values
    pub fn linear_guess(&self, x_mesh: &DVector<f64>) -> DVector<f64> {
        let slope = (self.y1 - self.y0) / (self.x1 - self.x0);
        let n = x_mesh.len();
        let mut y = x_mesh.map(|x| self.y0 + slope * (x - self.x0));
        if n > 0 {
            y[0] = self.y0;
            y[n - 1] = self.y1;
        }
        y
    }
}

/// Solution values aligned index-for-index with the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub x_mesh: DVector<f64>,
    pub y: DVector<f64>,
}

impl Trajectory {
    pub fn new(x_mesh: DVector<f64>, y: DVector<f64>) -> Self {
        debug_assert_eq!(x_mesh.len(), y.len());
        Self { x_mesh, y }
    }

    /// number of intervals N (the mesh has N + 1 nodes)
    pub fn n_steps(&self) -> usize {
        self.x_mesh.len().saturating_sub(1)
    }

    pub fn last(&self) -> Option<f64> {
        self.y.iter().last().copied()
    }

    /// (x, y) rows in mesh order, the shape every result sink consumes
    pub fn rows(&self) -> Vec<(f64, f64)> {
        self.x_mesh
            .iter()
            .zip(self.y.iter())
            .map(|(&x, &y)| (x, y))
            .collect()
    }

    /// max |y_i - other_i| on a shared mesh
    pub fn max_abs_diff(&self, other: &Trajectory) -> BvpResult<f64> {
        if self.y.len() != other.y.len() {
            return Err(BvpError::InvalidInput(format!(
                "trajectories have different lengths: {} and {}",
                self.y.len(),
                other.y.len()
            )));
        }
        Ok((&self.y - &other.y).amax())
    }
}
