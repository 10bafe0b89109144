//! Classic fixed-step Runge-Kutta 4th order integrator.
use crate::numerical::BVP_error::{BvpError, BvpResult};
use crate::numerical::ODE_system::OdeSystem;
use nalgebra::{DMatrix, DVector};

/// Advances `u` and `x` by exactly one RK4 step of size `h`.
///
/// k1 = f(x, u), k2 = f(x + h/2, u + h/2·k1), k3 = f(x + h/2, u + h/2·k2), k4 = f(x + h, u + h·k3),
/// u ← u + h/6·(k1 + 2k2 + 2k3 + k4), x ← x + h.
/// On error neither `u` nor `x` is modified.
pub fn rk4_step<S>(system: &S, x: &mut f64, u: &mut DVector<f64>, h: f64) -> BvpResult<()>
where
    S: OdeSystem + ?Sized,
{
    let x0 = *x;
    let k1 = system.evaluate(x0, u)?;
    let k2 = system.evaluate(x0 + h / 2.0, &(&*u + (h / 2.0) * &k1))?;
    let k3 = system.evaluate(x0 + h / 2.0, &(&*u + (h / 2.0) * &k2))?;
    let k4 = system.evaluate(x0 + h, &(&*u + h * &k3))?;

    *u += (h / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
    *x = x0 + h;
    Ok(())
}

/// Integrates `n_steps` fixed steps from (x0, y0). Each column of the returned matrix is the
/// state at the corresponding mesh node, the first column is y0 itself.
pub fn rk4_ivp_solver<S>(
    system: &S,
    x0: f64,
    y0: DVector<f64>,
    step_size: f64,
    n_steps: usize,
) -> BvpResult<(DMatrix<f64>, DVector<f64>)>
where
    S: OdeSystem + ?Sized,
{
    if y0.len() != system.dimension() {
        return Err(BvpError::InvalidInput(format!(
            "initial state has size {}, system dimension is {}",
            y0.len(),
            system.dimension()
        )));
    }
    let mut solution = DMatrix::zeros(y0.len(), n_steps + 1);
    let mut x_mesh = DVector::zeros(n_steps + 1);
    let mut y = y0;
    solution.set_column(0, &y);
    x_mesh[0] = x0;
    for i in 1..=n_steps {
        // restart every step from the mesh node so x does not drift
        let mut x = x0 + (i - 1) as f64 * step_size;
        rk4_step(system, &mut x, &mut y, step_size)?;
        solution.set_column(i, &y);
        x_mesh[i] = x0 + i as f64 * step_size;
    }
    Ok((solution, x_mesh))
}
