//! # Shooting Method for Dirichlet Boundary Value Problems
//!
//! Solves y'' = f(x, y, y'), y(x0) = y0, y(x1) = y1 by turning it into a sequence of
//! initial value problems (Cauchy problems):
//! 1. guess the unknown initial slope α = y'(x0);
//! 2. integrate (y, y') from (y0, α) with fixed-step RK4 over N steps;
//! 3. correct α with the secant method until |y(x1; α) - y1| <= tolerance.
//!
//! The secant loop is bounded by `max_iterations`; running out of iterations, or two equal
//! residuals in a row, is an error rather than an endless loop.
//!
//! ## Usage Example
//! ```rust, ignore
//! use RustedBVP::numerical::BVP_config::BvpConfig;
//! use RustedBVP::numerical::ODE_system::{FirstOrderReduction, SqrtSourceEquation};
//! use RustedBVP::numerical::ShootingBVP::Shooting_simple::ShootingMethodSolver;
//!
//! let equation = SqrtSourceEquation::default();
//! let system = FirstOrderReduction::new(&equation);
//! let mut solver = ShootingMethodSolver::new(BvpConfig::default(), 100);
//! let result = solver.solve(&system).unwrap();
//! println!("y'(0) = {}", result.s);
//! ```
use crate::numerical::BVP_config::{BvpConfig, Trajectory};
use crate::numerical::BVP_error::{BvpError, BvpResult};
use crate::numerical::ODE_system::OdeSystem;
use crate::numerical::RK4::rk4_ivp_solver;
use log::{debug, error, info};
use nalgebra::DVector;

/// Result of one initial value problem integration
#[derive(Debug, Clone, PartialEq)]
pub struct CauchySolution {
    /// y(x1)
    pub terminal: f64,
    pub trajectory: Trajectory,
}

/// Integrates (y, y') from (config.y0, alpha) at config.x0 with `n_steps` RK4 steps over
/// [config.x0, config.x1], keeping y at every one of the n_steps + 1 mesh nodes.
pub fn solve_cauchy<S>(
    system: &S,
    config: &BvpConfig,
    alpha: f64,
    n_steps: usize,
) -> BvpResult<CauchySolution>
where
    S: OdeSystem + ?Sized,
{
    if system.dimension() != 2 {
        return Err(BvpError::InvalidInput(format!(
            "shooting needs the 2-dimensional system (y, y'), got dimension {}",
            system.dimension()
        )));
    }
    let x_mesh = config.create_mesh(n_steps)?;
    let h = config.step_size(n_steps)?;

    let u0 = DVector::from_vec(vec![config.y0, alpha]);
    let (states, _) = rk4_ivp_solver(system, config.x0, u0, h, n_steps)?;
    // only y is kept, y' is dropped
    let y: DVector<f64> = states.row(0).transpose();
    Ok(CauchySolution {
        terminal: y[n_steps],
        trajectory: Trajectory::new(x_mesh, y),
    })
}

/// Outcome of a converged secant search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecantOutcome {
    pub root: f64,
    pub residual: f64,
    pub iterations: usize,
}

/// Secant method for g(s) = 0 from the seeds (s1, s2).
///
/// Only |g(s2)| is checked before the first update. Fails with
/// [`BvpError::DegenerateSecant`] when g(s2) - g(s1) vanishes and with
/// [`BvpError::ShootingNotConverged`] after `max_iterations` updates.
pub fn secant_method<F>(
    mut g: F,
    seeds: (f64, f64),
    tolerance: f64,
    max_iterations: usize,
) -> BvpResult<SecantOutcome>
where
    F: FnMut(f64) -> BvpResult<f64>,
{
    debug!(
        "Starting secant method with seeds=({}, {}), tolerance={}, max_iterations={}",
        seeds.0, seeds.1, tolerance, max_iterations
    );
    let (mut s1, mut s2) = seeds;
    let mut g1 = g(s1)?;
    let mut g2 = g(s2)?;
    debug!("Initial values: g({})={}, g({})={}", s1, g1, s2, g2);

    for iteration in 0..=max_iterations {
        if g2.abs() <= tolerance {
            info!(
                "Secant method converged after {} iterations with s={}, g(s)={}",
                iteration, s2, g2
            );
            return Ok(SecantOutcome {
                root: s2,
                residual: g2,
                iterations: iteration,
            });
        }
        if iteration == max_iterations {
            break;
        }
        let denominator = g2 - g1;
        if denominator == 0.0 || !denominator.is_finite() {
            error!(
                "Secant method degenerated at iteration {}: g({})={}, g({})={}",
                iteration + 1,
                s1,
                g1,
                s2,
                g2
            );
            return Err(BvpError::DegenerateSecant {
                iteration: iteration + 1,
                slope: s2,
                residual: g2,
            });
        }
        let s_new = s2 - g2 * (s2 - s1) / denominator;
        s1 = s2;
        g1 = g2;
        s2 = s_new;
        g2 = g(s2)?;
        debug!("Iteration {}: s={}, g(s)={}", iteration + 1, s2, g2);
    }

    error!(
        "Secant method did not converge after {} iterations",
        max_iterations
    );
    Err(BvpError::ShootingNotConverged {
        iterations: max_iterations,
        slope: s2,
        residual: g2,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShootingMethodResult {
    pub x_mesh: DVector<f64>,
    pub y: DVector<f64>,
    /// initial slope y'(x0) found by the secant search
    pub s: f64,
    /// y(x1) - y1 of the returned trajectory
    pub residual: f64,
    pub iterations: usize,
}

impl ShootingMethodResult {
    pub fn trajectory(&self) -> Trajectory {
        Trajectory::new(self.x_mesh.clone(), self.y.clone())
    }
}

/// Configuration for the shooting method solver.
#[derive(Debug, Clone)]
pub struct ShootingMethodSolver {
    pub config: BvpConfig,
    /// number of RK4 steps over the whole domain
    pub n_steps: usize,
    /// two seeds of the secant search over y'(x0)
    pub initial_slopes: (f64, f64),
    pub result: Option<ShootingMethodResult>,
}

impl ShootingMethodSolver {
    pub fn new(config: BvpConfig, n_steps: usize) -> Self {
        Self {
            config,
            n_steps,
            initial_slopes: (1.0, 3.0),
            result: None,
        }
    }

    pub fn with_initial_slopes(mut self, s1: f64, s2: f64) -> Self {
        self.initial_slopes = (s1, s2);
        self
    }

    /// Solves the BVP for the 2-dimensional system (y, y')' = f(x, y, y').
    pub fn solve<S>(&mut self, system: &S) -> BvpResult<ShootingMethodResult>
    where
        S: OdeSystem + ?Sized,
    {
        self.config.validate()?;
        if self.n_steps == 0 {
            return Err(BvpError::InvalidInput(
                "shooting needs at least one integration step".to_string(),
            ));
        }
        info!(
            "Starting shooting method: N = {}, domain = [{}, {}], y({}) = {}, y({}) = {}",
            self.n_steps,
            self.config.x0,
            self.config.x1,
            self.config.x0,
            self.config.y0,
            self.config.x1,
            self.config.y1
        );

        let config = self.config;
        let n_steps = self.n_steps;
        let mut last_solution: Option<CauchySolution> = None;
        let outcome = secant_method(
            |alpha| {
                let solution = solve_cauchy(system, &config, alpha, n_steps)?;
                let residual = solution.terminal - config.y1;
                last_solution = Some(solution);
                Ok(residual)
            },
            self.initial_slopes,
            config.tolerance,
            config.max_iterations,
        )?;

        // the secant search always ends on the slope it evaluated last
        let solution = match last_solution {
            Some(solution) => solution,
            None => solve_cauchy(system, &config, outcome.root, n_steps)?,
        };
        info!(
            "Shooting converged: y'({}) = {}, y({}) = {}, {} secant iterations",
            config.x0, outcome.root, config.x1, solution.terminal, outcome.iterations
        );

        let result = ShootingMethodResult {
            x_mesh: solution.trajectory.x_mesh,
            y: solution.trajectory.y,
            s: outcome.root,
            residual: outcome.residual,
            iterations: outcome.iterations,
        };
        self.result = Some(result.clone());
        Ok(result)
    }

    pub fn get_solution(&self) -> Option<ShootingMethodResult> {
        self.result.clone()
    }

    pub fn get_y(&self) -> Option<DVector<f64>> {
        self.result.as_ref().map(|r| r.y.clone())
    }

    pub fn get_x(&self) -> Option<DVector<f64>> {
        self.result.as_ref().map(|r| r.x_mesh.clone())
    }
}

/////////////////////////////////////////////////////////////////////////
//          tests
//////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;
    use crate::numerical::ODE_system::{
        ClosureEquation, ClosureSystem, FirstOrderReduction, SqrtSourceEquation,
    };
    use approx::assert_abs_diff_eq;
    use simplelog::*;

    fn init_logger() {
        let _ = SimpleLogger::init(LevelFilter::Debug, Config::default());
    }

    #[test]
    fn sqrt_source_reference_scenario() {
        init_logger();
        let equation = SqrtSourceEquation::default();
        let system = FirstOrderReduction::new(&equation);
        let mut solver = ShootingMethodSolver::new(BvpConfig::default(), 100);
        let result = solver.solve(&system).unwrap();

        let n = result.y.len() - 1;
        assert_eq!(n, 100);
        assert!((result.y[n] - 2.0).abs() <= 1e-6);
        assert_eq!(result.y[0], 0.0);
        assert!(result.s > 1.7 && result.s < 2.0, "slope = {}", result.s);
        assert!(result.y.iter().all(|&y| y >= 0.0));

        // deterministic: the same slope on a second run
        let again = solver.solve(&system).unwrap();
        assert_eq!(again.s, result.s);
        assert_eq!(again.y, result.y);
    }

    #[test]
    fn cauchy_solve_is_pure() {
        let equation = SqrtSourceEquation::default();
        let system = FirstOrderReduction::new(&equation);
        let config = BvpConfig::default();
        let a = solve_cauchy(&system, &config, 1.7, 250).unwrap();
        let b = solve_cauchy(&system, &config, 1.7, 250).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.trajectory.x_mesh.len(), 251);
        assert_eq!(a.trajectory.x_mesh[250], 1.0);
        assert_eq!(a.terminal, a.trajectory.y[250]);
    }

    #[test]
    fn cauchy_solve_keeps_y_of_the_ivp_states() {
        // y'' = 0 from (0, 1.5): y = 1.5x, y' dropped
        let system = ClosureSystem::new(2, |_x: f64, y: &DVector<f64>| {
            DVector::from_vec(vec![y[1], 0.0])
        });
        let config = BvpConfig::default();
        let solution = solve_cauchy(&system, &config, 1.5, 8).unwrap();
        let (states, _) = rk4_ivp_solver(&system, 0.0, DVector::from_vec(vec![0.0, 1.5]), 0.125, 8).unwrap();
        assert_eq!(solution.trajectory.y.len(), 9);
        for i in 0..=8 {
            assert_eq!(solution.trajectory.y[i], states[(0, i)]);
            assert_abs_diff_eq!(solution.trajectory.y[i], 1.5 * solution.trajectory.x_mesh[i], epsilon = 1e-14);
        }
        assert_eq!(solution.terminal, solution.trajectory.y[8]);
    }

    #[test]
    fn test_linear_ode() {
        init_logger();
        // y'' = y, y(0) = 0, y(1) = sinh(1): y = sinh(x), y'(0) = 1
        let equation = ClosureEquation::new(|_x, y| y, |_x, _y| 1.0, "y'' = y".to_string());
        let system = FirstOrderReduction::new(&equation);
        let config = BvpConfig::new(0.0, 1.0, 0.0, 1.0_f64.sinh(), 1e-8, 100);
        let mut solver = ShootingMethodSolver::new(config, 100);
        let result = solver.solve(&system).unwrap();

        assert_abs_diff_eq!(result.s, 1.0, epsilon = 1e-6);
        let x_mesh = solver.get_x().unwrap();
        let y = solver.get_y().unwrap();
        for i in 0..x_mesh.len() {
            assert_abs_diff_eq!(y[i], x_mesh[i].sinh(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_large_domain() {
        // y'' = 0, y(0) = 0, y(100) = 50
        let system = ClosureSystem::new(2, |_x: f64, y: &DVector<f64>| {
            DVector::from_vec(vec![y[1], 0.0])
        });
        let config = BvpConfig::new(0.0, 100.0, 0.0, 50.0, 1e-6, 50);
        let mut solver = ShootingMethodSolver::new(config, 100);
        let result = solver.solve(&system).unwrap();
        assert_abs_diff_eq!(result.s, 0.5, epsilon = 1e-9);
        for i in 0..result.x_mesh.len() {
            assert_abs_diff_eq!(result.y[i], 0.5 * result.x_mesh[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_oscillatory_solution() {
        // y'' = -y, y(0) = 0, y(pi/2) = 1: y = sin(x)
        let system = ClosureSystem::new(2, |_x: f64, y: &DVector<f64>| {
            DVector::from_vec(vec![y[1], -y[0]])
        });
        let config = BvpConfig::new(0.0, std::f64::consts::FRAC_PI_2, 0.0, 1.0, 1e-8, 100);
        let mut solver = ShootingMethodSolver::new(config, 200);
        let result = solver.solve(&system).unwrap();
        assert_abs_diff_eq!(result.s, 1.0, epsilon = 1e-6);
        for i in 0..result.x_mesh.len() {
            assert_abs_diff_eq!(result.y[i], result.x_mesh[i].sin(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_nonlinear_pendulum() {
        // y'' + sin(y) = 0
        let system = ClosureSystem::new(2, |_x: f64, y: &DVector<f64>| {
            DVector::from_vec(vec![y[1], -y[0].sin()])
        });
        let config = BvpConfig::new(0.0, 1.0, 0.0, 0.5, 1e-6, 100);
        let mut solver = ShootingMethodSolver::new(config, 100);
        let result = solver.solve(&system).unwrap();
        assert!((result.y[100] - 0.5).abs() <= 1e-6);
        assert!(result.s.is_finite());
    }

    #[test]
    fn test_non_convergence() {
        init_logger();
        let equation = SqrtSourceEquation::default();
        let system = FirstOrderReduction::new(&equation);
        let mut config = BvpConfig::default();
        config.tolerance = 1e-20;
        config.max_iterations = 1;
        let mut solver = ShootingMethodSolver::new(config, 100);
        match solver.solve(&system) {
            Err(BvpError::ShootingNotConverged {
                iterations,
                slope,
                residual,
            }) => {
                assert_eq!(iterations, 1);
                assert!(slope.is_finite());
                assert!(residual.abs() > 1e-20);
            }
            other => panic!("expected non-convergence, got {:?}", other),
        }
        assert!(solver.get_solution().is_none());
    }

    #[test]
    fn degenerate_residual_difference() {
        // y stays at y0 whatever the slope: the secant line is flat
        let system = ClosureSystem::new(2, |_x: f64, _y: &DVector<f64>| {
            DVector::from_vec(vec![0.0, 0.0])
        });
        let config = BvpConfig::new(0.0, 1.0, 0.0, 1.0, 1e-6, 10);
        let mut solver = ShootingMethodSolver::new(config, 10);
        assert!(matches!(
            solver.solve(&system),
            Err(BvpError::DegenerateSecant { iteration: 1, .. })
        ));
    }

    #[test]
    fn negative_trial_state_is_a_domain_error() {
        // a negative target drives the secant update to a negative slope and y below zero
        let equation = SqrtSourceEquation::default();
        let system = FirstOrderReduction::new(&equation);
        let config = BvpConfig::new(0.0, 1.0, 0.0, -1.0, 1e-6, 50);
        let mut solver = ShootingMethodSolver::new(config, 100);
        assert!(matches!(
            solver.solve(&system),
            Err(BvpError::Domain { .. })
        ));
    }

    #[test]
    fn seeds_already_converged() {
        // y'' = 0 with y(1) = 3 is hit exactly by the second seed
        let system = ClosureSystem::new(2, |_x: f64, y: &DVector<f64>| {
            DVector::from_vec(vec![y[1], 0.0])
        });
        let config = BvpConfig::new(0.0, 1.0, 0.0, 3.0, 1e-6, 10);
        let mut solver = ShootingMethodSolver::new(config, 20);
        let result = solver.solve(&system).unwrap();
        assert_eq!(result.iterations, 0);
        assert_abs_diff_eq!(result.s, 3.0, epsilon = 1e-15);
    }

    #[test]
    fn invalid_input() {
        let equation = SqrtSourceEquation::default();
        let system = FirstOrderReduction::new(&equation);
        let mut solver = ShootingMethodSolver::new(BvpConfig::default(), 0);
        assert!(matches!(
            solver.solve(&system),
            Err(BvpError::InvalidInput(_))
        ));
        let scalar = ClosureSystem::new(1, |_x: f64, y: &DVector<f64>| y.clone());
        let mut solver = ShootingMethodSolver::new(BvpConfig::default(), 10);
        assert!(matches!(
            solver.solve(&scalar),
            Err(BvpError::InvalidInput(_))
        ));
    }

    #[test]
    fn custom_seeds() {
        let equation = SqrtSourceEquation::default();
        let system = FirstOrderReduction::new(&equation);
        let mut solver = ShootingMethodSolver::new(BvpConfig::default(), 100).with_initial_slopes(1.5, 2.5);
        let result = solver.solve(&system).unwrap();
        assert!((result.y[100] - 2.0).abs() <= 1e-6);
    }
}
