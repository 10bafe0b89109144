/*
Quasilinearization (Newton's method in function space) for the Dirichlet problem
    y'' = f(x, y, y'),  y(x0) = y0,  y(x1) = y1.
Around the current estimate y_k the right-hand side is linearized,
    f(x, y_k + v, y_k' + v') ≈ f + f_y·v + f_y'·v',
so the correction v solves the linear BVP
    v'' - f_y'·v' - f_y·v = f(x, y_k, y_k') - y_k'',   v(x0) = 0,  v(x1) = y1 - y_k(x1).
With central differences on the uniform mesh every iteration is one tridiagonal solve.
For y'' = x·√y the diagonal is -2/h² - x_i/(2√(y_i + δ)).
*/
use crate::numerical::BVP_config::{BvpConfig, Trajectory};
use crate::numerical::BVP_error::{BvpError, BvpResult};
use crate::numerical::ODE_system::SecondOrderEquation;
use crate::somelinalg::tridiagonal::TridiagonalSystem;
use log::{debug, error, info};
use nalgebra::DVector;

#[derive(Debug, Clone, PartialEq)]
pub struct QuasilinearizationResult {
    pub x_mesh: DVector<f64>,
    pub y: DVector<f64>,
    pub iterations: usize,
    /// max |v_i| over interior nodes of the last correction
    pub max_correction: f64,
}

impl QuasilinearizationResult {
    pub fn trajectory(&self) -> Trajectory {
        Trajectory::new(self.x_mesh.clone(), self.y.clone())
    }
}

#[derive(Debug, Clone)]
pub struct QuasilinearizationSolver {
    pub config: BvpConfig,
    /// number of mesh intervals, at least 2 so that one interior node exists
    pub n_steps: usize,
    /// starting estimate on the mesh; the straight line through the boundary values if None
    pub initial_guess: Option<DVector<f64>>,
    pub result: Option<QuasilinearizationResult>,
}

impl QuasilinearizationSolver {
    pub fn new(config: BvpConfig, n_steps: usize) -> Self {
        Self {
            config,
            n_steps,
            initial_guess: None,
            result: None,
        }
    }

    pub fn with_initial_guess(mut self, guess: DVector<f64>) -> Self {
        self.initial_guess = Some(guess);
        self
    }

    fn starting_estimate(&self, x_mesh: &DVector<f64>) -> BvpResult<DVector<f64>> {
        let mut y = match &self.initial_guess {
            Some(guess) if guess.len() == x_mesh.len() => guess.clone(),
            Some(guess) => {
                return Err(BvpError::InvalidInput(format!(
                    "initial guess has {} values, mesh has {} nodes",
                    guess.len(),
                    x_mesh.len()
                )));
            }
            None => self.config.linear_guess(x_mesh),
        };
        y[0] = self.config.y0;
        y[self.n_steps] = self.config.y1;
        Ok(y)
    }

    /// Assembles the correction system around the estimate `y`.
    fn build_system<E>(
        &self,
        equation: &E,
        x_mesh: &DVector<f64>,
        y: &DVector<f64>,
        h: f64,
    ) -> BvpResult<TridiagonalSystem>
    where
        E: SecondOrderEquation + ?Sized,
    {
        let n = self.n_steps;
        let h2 = h * h;
        let mut system = TridiagonalSystem::zeros(n + 1);
        system.pin_row(0, 0.0);
        system.pin_row(n, self.config.y1 - y[n]);
        for i in 1..n {
            let x = x_mesh[i];
            let dy = (y[i + 1] - y[i - 1]) / (2.0 * h);
            let f = equation.rhs(x, y[i], dy)?;
            let f_y = equation.d_rhs_dy(x, y[i], dy)?;
            let f_dy = equation.d_rhs_ddy(x, y[i], dy)?;
            let second_difference = (y[i - 1] - 2.0 * y[i] + y[i + 1]) / h2;
            system.set_row(
                i,
                1.0 / h2 + f_dy / (2.0 * h),
                -2.0 / h2 - f_y,
                1.0 / h2 - f_dy / (2.0 * h),
                f - second_difference,
            );
        }
        Ok(system)
    }

    pub fn solve<E>(&mut self, equation: &E) -> BvpResult<QuasilinearizationResult>
    where
        E: SecondOrderEquation + ?Sized,
    {
        self.config.validate()?;
        if self.n_steps < 2 {
            return Err(BvpError::InvalidInput(format!(
                "quasilinearization needs at least 2 mesh intervals, got {}",
                self.n_steps
            )));
        }
        let n = self.n_steps;
        let h = self.config.step_size(n)?;
        let x_mesh = self.config.create_mesh(n)?;
        let mut y = self.starting_estimate(&x_mesh)?;
        info!(
            "Starting quasilinearization for '{}': N = {}, tolerance = {}, max_iterations = {}",
            equation.name(),
            n,
            self.config.tolerance,
            self.config.max_iterations
        );

        let mut max_correction = f64::INFINITY;
        for iteration in 1..=self.config.max_iterations {
            let system = self.build_system(equation, &x_mesh, &y, h)?;
            let v = system.solve()?;

            let mut y_new = y.clone();
            max_correction = 0.0;
            for i in 1..n {
                y_new[i] = y[i] + v[i];
                max_correction = f64::max(max_correction, (y_new[i] - y[i]).abs());
            }
            y_new[0] = self.config.y0;
            y_new[n] = self.config.y1;
            y = y_new;
            debug!(
                "Iteration {}: max correction = {}",
                iteration, max_correction
            );

            if !max_correction.is_finite() {
                error!("Quasilinearization diverged at iteration {}", iteration);
                return Err(BvpError::QuasilinearizationNotConverged {
                    iterations: iteration,
                    max_correction,
                    estimate: y.iter().copied().collect(),
                });
            }
            if max_correction <= self.config.tolerance {
                info!(
                    "Quasilinearization converged after {} iterations, max correction = {}",
                    iteration, max_correction
                );
                let result = QuasilinearizationResult {
                    x_mesh,
                    y,
                    iterations: iteration,
                    max_correction,
                };
                self.result = Some(result.clone());
                return Ok(result);
            }
        }

        error!(
            "Quasilinearization did not converge after {} iterations, max correction = {}",
            self.config.max_iterations, max_correction
        );
        Err(BvpError::QuasilinearizationNotConverged {
            iterations: self.config.max_iterations,
            max_correction,
            estimate: y.iter().copied().collect(),
        })
    }

    pub fn get_result(&self) -> Option<QuasilinearizationResult> {
        self.result.clone()
    }
}
