/// error type shared by every solver of the crate
pub mod BVP_error;
/// domain, boundary values, tolerance and iteration cap of a problem; mesh and trajectory types
pub mod BVP_config;
/// right-hand sides: first-order systems and scalar second-order equations
pub mod ODE_system;
/// fixed-step Runge-Kutta 4 integrator
pub mod RK4;
/// shooting method: RK4 Cauchy solves + secant search on the initial slope
pub mod ShootingBVP;
/// Newton linearization around the current estimate, one tridiagonal solve per iteration
/// ```
/// use RustedBVP::numerical::BVP_config::BvpConfig;
/// use RustedBVP::numerical::ODE_system::SqrtSourceEquation;
/// use RustedBVP::numerical::Quasilinearization::QuasilinearizationSolver;
/// let mut solver = QuasilinearizationSolver::new(BvpConfig::default(), 100);
/// let result = solver.solve(&SqrtSourceEquation::default()).unwrap();
/// assert_eq!(result.y[100], 2.0);
/// ```
pub mod Quasilinearization;
/// nested-grid convergence study and shooting vs quasilinearization batch runs
pub mod Convergence_study;

pub mod Examples_and_utils;
