//! Right-hand sides consumed by the integrator and the BVP drivers.
//!
//! * [`OdeSystem`] - first-order system du/dx = f(x, u), what RK4 advances;
//! * [`SecondOrderEquation`] - scalar equation y'' = f(x, y, y') with the partial derivatives
//!   quasilinearization needs;
//! * [`FirstOrderReduction`] - turns the latter into the former: u = (y, y'), u' = (u1, f(x, u0, u1)).
use crate::numerical::BVP_error::{BvpError, BvpResult};
use nalgebra::DVector;

/// First-order system du/dx = f(x, u)
pub trait OdeSystem {
    fn dimension(&self) -> usize;

    fn evaluate(&self, x: f64, u: &DVector<f64>) -> BvpResult<DVector<f64>>;
}

/// Scalar second-order equation y'' = f(x, y, y')
pub trait SecondOrderEquation {
    fn rhs(&self, x: f64, y: f64, dy: f64) -> BvpResult<f64>;

    /// ∂f/∂y
    fn d_rhs_dy(&self, x: f64, y: f64, dy: f64) -> BvpResult<f64>;

    /// ∂f/∂y', zero for equations without a first-derivative term
    fn d_rhs_ddy(&self, _x: f64, _y: f64, _dy: f64) -> BvpResult<f64> {
        Ok(0.0)
    }

    fn name(&self) -> &str {
        "unnamed_equation"
    }
}

/// y'' = f(x, y, y') seen as the 2-dimensional system (y, y')' = (y', f)
pub struct FirstOrderReduction<'a, E: SecondOrderEquation + ?Sized> {
    equation: &'a E,
}

impl<'a, E: SecondOrderEquation + ?Sized> FirstOrderReduction<'a, E> {
    pub fn new(equation: &'a E) -> Self {
        Self { equation }
    }
}

impl<E: SecondOrderEquation + ?Sized> OdeSystem for FirstOrderReduction<'_, E> {
    fn dimension(&self) -> usize {
        2
    }

    fn evaluate(&self, x: f64, u: &DVector<f64>) -> BvpResult<DVector<f64>> {
        if u.len() != 2 {
            return Err(BvpError::InvalidInput(format!(
                "second order equation '{}' expects a state of size 2, got {}",
                self.equation.name(),
                u.len()
            )));
        }
        let d2y = self.equation.rhs(x, u[0], u[1])?;
        Ok(DVector::from_vec(vec![u[1], d2y]))
    }
}

/// y'' = x·√y, defined for y >= 0 only
#[derive(Debug, Clone, Copy)]
pub struct SqrtSourceEquation {
    /// δ in x / (2√(y + δ)), keeps the linearization finite where y touches zero
    pub regularization: f64,
}

impl Default for SqrtSourceEquation {
    fn default() -> Self {
        Self {
            regularization: 1e-10,
        }
    }
}

impl SqrtSourceEquation {
    pub fn new(regularization: f64) -> Self {
        Self { regularization }
    }

    fn check_domain(x: f64, y: f64) -> BvpResult<()> {
        // NaN is rejected as well
        if y >= 0.0 {
            Ok(())
        } else {
            Err(BvpError::Domain { x, value: y })
        }
    }
}

impl SecondOrderEquation for SqrtSourceEquation {
    fn rhs(&self, x: f64, y: f64, _dy: f64) -> BvpResult<f64> {
        Self::check_domain(x, y)?;
        Ok(x * y.sqrt())
    }

    fn d_rhs_dy(&self, x: f64, y: f64, _dy: f64) -> BvpResult<f64> {
        Self::check_domain(x, y)?;
        Ok(x / (2.0 * (y + self.regularization).sqrt()))
    }

    fn name(&self) -> &str {
        "y'' = x*sqrt(y)"
    }
}

/// Wraps a closure f(x, u) -> du, the way ODE systems are usually written inline
pub struct ClosureSystem<F>
where
    F: Fn(f64, &DVector<f64>) -> DVector<f64>,
{
    dimension: usize,
    func: F,
}

impl<F> ClosureSystem<F>
where
    F: Fn(f64, &DVector<f64>) -> DVector<f64>,
{
    pub fn new(dimension: usize, func: F) -> Self {
        Self { dimension, func }
    }
}

impl<F> OdeSystem for ClosureSystem<F>
where
    F: Fn(f64, &DVector<f64>) -> DVector<f64>,
{
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn evaluate(&self, x: f64, u: &DVector<f64>) -> BvpResult<DVector<f64>> {
        Ok((self.func)(x, u))
    }
}

/// Second-order equation given by closures for f and ∂f/∂y (f must not depend on y')
pub struct ClosureEquation<F, D>
where
    F: Fn(f64, f64) -> f64,
    D: Fn(f64, f64) -> f64,
{
    func: F,
    derivative_func: D,
    name: String,
}

impl<F, D> ClosureEquation<F, D>
where
    F: Fn(f64, f64) -> f64,
    D: Fn(f64, f64) -> f64,
{
    pub fn new(func: F, derivative_func: D, name: String) -> Self {
        Self {
            func,
            derivative_func,
            name,
        }
    }
}

impl<F, D> SecondOrderEquation for ClosureEquation<F, D>
where
    F: Fn(f64, f64) -> f64,
    D: Fn(f64, f64) -> f64,
{
    fn rhs(&self, x: f64, y: f64, _dy: f64) -> BvpResult<f64> {
        Ok((self.func)(x, y))
    }

    fn d_rhs_dy(&self, x: f64, y: f64, _dy: f64) -> BvpResult<f64> {
        Ok((self.derivative_func)(x, y))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
