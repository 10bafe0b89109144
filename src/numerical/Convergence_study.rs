//! Grid-refinement cross-validation.
//!
//! [`ConvergenceStudy`] runs the shooting method at an ascending list of resolutions, persists
//! every trajectory as `shooting_<N>` and compares nested grids: for N' = k·N the error is
//! max_i |y_N[i] - y_N'[k·i]|. Consecutive pairs give the convergence table (persisted as
//! `convergence`, rows (h, error)). Every coarser resolution is also compared with the finest
//! solution at the nodes both meshes share, nested or not.
//!
//! [`run_batch`] solves one equation with both shooting and quasilinearization at each resolution
//! and reports how far apart the two answers are.
use crate::Utils::logger::ResultSink;
use crate::numerical::BVP_config::{BvpConfig, Trajectory};
use crate::numerical::BVP_error::{BvpError, BvpResult};
use crate::numerical::ODE_system::{FirstOrderReduction, OdeSystem, SecondOrderEquation};
use crate::numerical::Quasilinearization::QuasilinearizationSolver;
use crate::numerical::ShootingBVP::Shooting_simple::{ShootingMethodResult, ShootingMethodSolver};
use itertools::Itertools;
use log::{error, info, warn};
use num::integer::gcd;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tabled::{builder::Builder, settings::Style};

pub const DEFAULT_RESOLUTIONS: [usize; 7] = [100, 200, 400, 500, 750, 800, 10000];

/// max_i |coarse[i] - fine[i·k]| where the fine grid has k times as many intervals
pub fn nested_grid_error(coarse: &Trajectory, fine: &Trajectory) -> BvpResult<f64> {
    let n_coarse = coarse.n_steps();
    let n_fine = fine.n_steps();
    if n_coarse == 0 || n_fine % n_coarse != 0 {
        return Err(BvpError::InvalidInput(format!(
            "grids with {} and {} intervals are not nested",
            n_coarse, n_fine
        )));
    }
    let ratio = n_fine / n_coarse;
    let error = (0..=n_coarse)
        .map(|i| (coarse.y[i] - fine.y[i * ratio]).abs())
        .fold(0.0, f64::max);
    Ok(error)
}

/// max |coarse - fine| over the gcd(N, N') + 1 nodes common to both uniform meshes:
/// coarse index k·N/g against fine index k·N'/g, k = 0..=g
pub fn shared_node_error(coarse: &Trajectory, fine: &Trajectory) -> BvpResult<f64> {
    let n_coarse = coarse.n_steps();
    let n_fine = fine.n_steps();
    if n_coarse == 0 || n_fine == 0 {
        return Err(BvpError::InvalidInput(format!(
            "grids with {} and {} intervals share no nodes",
            n_coarse, n_fine
        )));
    }
    let g = gcd(n_coarse, n_fine);
    let (coarse_stride, fine_stride) = (n_coarse / g, n_fine / g);
    let error = (0..=g)
        .map(|k| (coarse.y[k * coarse_stride] - fine.y[k * fine_stride]).abs())
        .fold(0.0, f64::max);
    Ok(error)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairOutcome {
    Compared { error: f64 },
    /// the finer resolution is not a multiple of the coarser one (consecutive pairs only)
    NotNested,
    /// at least one of the two solves failed
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairComparison {
    pub coarse: usize,
    pub fine: usize,
    pub outcome: PairOutcome,
}

impl PairComparison {
    pub fn error(&self) -> Option<f64> {
        match self.outcome {
            PairOutcome::Compared { error } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct ConvergenceReport {
    pub solutions: BTreeMap<usize, Trajectory>,
    /// converged y'(x0) per resolution
    pub slopes: BTreeMap<usize, f64>,
    pub failures: BTreeMap<usize, BvpError>,
    pub consecutive: Vec<PairComparison>,
    pub against_reference: Vec<PairComparison>,
}

impl ConvergenceReport {
    /// (N, N', error) of the consecutive pairs that could be compared
    pub fn errors(&self) -> Vec<(usize, usize, f64)> {
        self.consecutive
            .iter()
            .filter_map(|pair| pair.error().map(|error| (pair.coarse, pair.fine, error)))
            .collect()
    }

    pub fn to_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["N", "N'", "comparison", "max |y_N - y_N'|"]);
        // a consecutive pair ending on the finest grid is listed once, as a reference row
        let rows = self
            .consecutive
            .iter()
            .filter(|pair| {
                !self
                    .against_reference
                    .iter()
                    .any(|reference| reference.coarse == pair.coarse && reference.fine == pair.fine)
            })
            .map(|pair| (pair, "consecutive"))
            .chain(self.against_reference.iter().map(|pair| (pair, "finest")));
        for (pair, kind) in rows {
            let error = match pair.outcome {
                PairOutcome::Compared { error } => format!("{:e}", error),
                PairOutcome::NotNested => "not nested".to_string(),
                PairOutcome::Missing => "missing solution".to_string(),
            };
            builder.push_record([
                pair.coarse.to_string(),
                pair.fine.to_string(),
                kind.to_string(),
                error,
            ]);
        }
        for (n, failure) in &self.failures {
            builder.push_record([n.to_string(), "-".to_string(), "failed".to_string(), failure.to_string()]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ConvergenceStudy {
    pub config: BvpConfig,
    /// strictly ascending, every entry >= 1
    pub resolutions: Vec<usize>,
    pub initial_slopes: (f64, f64),
    /// solve the resolutions on the rayon thread pool; results are persisted in order afterwards
    pub parallel: bool,
}

impl ConvergenceStudy {
    pub fn new(config: BvpConfig) -> Self {
        Self {
            config,
            resolutions: DEFAULT_RESOLUTIONS.to_vec(),
            initial_slopes: (1.0, 3.0),
            parallel: false,
        }
    }

    pub fn with_resolutions(mut self, resolutions: Vec<usize>) -> Self {
        self.resolutions = resolutions;
        self
    }

    pub fn with_initial_slopes(mut self, s1: f64, s2: f64) -> Self {
        self.initial_slopes = (s1, s2);
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn validate(&self) -> BvpResult<()> {
        self.config.validate()?;
        validate_resolutions(&self.resolutions)
    }

    fn solve_resolution<S>(&self, system: &S, n_steps: usize) -> (BvpResult<ShootingMethodResult>, Duration)
    where
        S: OdeSystem + ?Sized,
    {
        let start = Instant::now();
        let mut solver = ShootingMethodSolver::new(self.config, n_steps)
            .with_initial_slopes(self.initial_slopes.0, self.initial_slopes.1);
        let result = solver.solve(system);
        (result, start.elapsed())
    }

    pub fn run<S>(&self, system: &S, sink: &mut dyn ResultSink) -> BvpResult<ConvergenceReport>
    where
        S: OdeSystem + Sync + ?Sized,
    {
        self.validate()?;
        info!(
            "convergence study over resolutions {:?} (parallel: {})",
            self.resolutions, self.parallel
        );
        let runs: Vec<(usize, BvpResult<ShootingMethodResult>, Duration)> = if self.parallel {
            self.resolutions
                .par_iter()
                .map(|&n| {
                    let (result, elapsed) = self.solve_resolution(system, n);
                    (n, result, elapsed)
                })
                .collect()
        } else {
            self.resolutions
                .iter()
                .map(|&n| {
                    let (result, elapsed) = self.solve_resolution(system, n);
                    (n, result, elapsed)
                })
                .collect()
        };

        let mut solutions = BTreeMap::new();
        let mut slopes = BTreeMap::new();
        let mut failures = BTreeMap::new();
        for (n, result, elapsed) in runs {
            match result {
                Ok(result) => {
                    info!(
                        "N = {}: y'({}) = {}, {} iterations, {} ms",
                        n,
                        self.config.x0,
                        result.s,
                        result.iterations,
                        elapsed.as_millis()
                    );
                    let trajectory = result.trajectory();
                    sink.persist(&format!("shooting_{}", n), &trajectory.rows())?;
                    slopes.insert(n, result.s);
                    solutions.insert(n, trajectory);
                }
                Err(e) => {
                    error!("N = {}: shooting failed: {}", n, e);
                    failures.insert(n, e);
                }
            }
        }

        let consecutive = self
            .resolutions
            .iter()
            .tuple_windows()
            .map(|(&coarse, &fine)| compare_pair(&solutions, coarse, fine))
            .collect::<BvpResult<Vec<_>>>()?;

        let against_reference = match self.resolutions.split_last() {
            Some((&finest, rest)) => rest
                .iter()
                .map(|&coarse| compare_with_reference(&solutions, coarse, finest))
                .collect::<BvpResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        let mut table_rows = Vec::new();
        for pair in &consecutive {
            if let Some(error) = pair.error() {
                table_rows.push((self.config.step_size(pair.coarse)?, error));
            }
        }
        sink.persist("convergence", &table_rows)?;

        Ok(ConvergenceReport {
            solutions,
            slopes,
            failures,
            consecutive,
            against_reference,
        })
    }
}

fn validate_resolutions(resolutions: &[usize]) -> BvpResult<()> {
    if resolutions.is_empty() {
        return Err(BvpError::InvalidInput("no resolutions given".to_string()));
    }
    if resolutions.contains(&0) {
        return Err(BvpError::InvalidInput(
            "every resolution needs at least one interval".to_string(),
        ));
    }
    if resolutions.iter().tuple_windows().any(|(a, b)| a >= b) {
        return Err(BvpError::InvalidInput(format!(
            "resolutions must be strictly ascending, got {:?}",
            resolutions
        )));
    }
    Ok(())
}

fn compare_pair(
    solutions: &BTreeMap<usize, Trajectory>,
    coarse: usize,
    fine: usize,
) -> BvpResult<PairComparison> {
    let outcome = if fine % coarse != 0 {
        warn!("N = {} and N = {} are not nested, comparison skipped", coarse, fine);
        PairOutcome::NotNested
    } else {
        match (solutions.get(&coarse), solutions.get(&fine)) {
            (Some(coarse_solution), Some(fine_solution)) => {
                let error = nested_grid_error(coarse_solution, fine_solution)?;
                info!("max error between N = {} and N = {}: {:e}", coarse, fine, error);
                PairOutcome::Compared { error }
            }
            _ => {
                warn!("N = {} vs N = {}: a solution is missing, comparison skipped", coarse, fine);
                PairOutcome::Missing
            }
        }
    };
    Ok(PairComparison {
        coarse,
        fine,
        outcome,
    })
}

fn compare_with_reference(
    solutions: &BTreeMap<usize, Trajectory>,
    coarse: usize,
    finest: usize,
) -> BvpResult<PairComparison> {
    let outcome = match (solutions.get(&coarse), solutions.get(&finest)) {
        (Some(coarse_solution), Some(reference)) => {
            let error = shared_node_error(coarse_solution, reference)?;
            info!(
                "max error between N = {} and the reference N = {} on {} shared nodes: {:e}",
                coarse,
                finest,
                gcd(coarse, finest) + 1,
                error
            );
            PairOutcome::Compared { error }
        }
        _ => {
            warn!("N = {} vs reference N = {}: a solution is missing, comparison skipped", coarse, finest);
            PairOutcome::Missing
        }
    };
    Ok(PairComparison {
        coarse,
        fine: finest,
        outcome,
    })
}

/// Shooting and quasilinearization on the same mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodAgreement {
    pub n_steps: usize,
    pub shooting_slope: f64,
    pub shooting_iterations: usize,
    pub quasi_iterations: usize,
    /// max_i |y_shooting[i] - y_quasi[i]|
    pub max_difference: f64,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub agreements: Vec<MethodAgreement>,
    /// resolution and method name of every failed solve
    pub failures: Vec<(usize, &'static str, BvpError)>,
}

impl BatchReport {
    pub fn to_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record([
            "N",
            "y'(x0) shooting",
            "secant iterations",
            "quasilinearization iterations",
            "max |y_shoot - y_quasi|",
        ]);
        for agreement in &self.agreements {
            builder.push_record([
                agreement.n_steps.to_string(),
                format!("{:.8}", agreement.shooting_slope),
                agreement.shooting_iterations.to_string(),
                agreement.quasi_iterations.to_string(),
                format!("{:e}", agreement.max_difference),
            ]);
        }
        for (n, method, failure) in &self.failures {
            builder.push_record([
                n.to_string(),
                format!("{} failed", method),
                "-".to_string(),
                "-".to_string(),
                failure.to_string(),
            ]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

/// Solves `equation` at every resolution with both methods, persisting `shooting_<N>` and
/// `quasi_<N>`. A numerical failure at one resolution is logged and recorded, sink errors abort.
pub fn run_batch<E>(
    config: &BvpConfig,
    equation: &E,
    resolutions: &[usize],
    initial_slopes: (f64, f64),
    sink: &mut dyn ResultSink,
) -> BvpResult<BatchReport>
where
    E: SecondOrderEquation + ?Sized,
{
    config.validate()?;
    validate_resolutions(resolutions)?;
    let system = FirstOrderReduction::new(equation);
    let mut report = BatchReport::default();
    for &n in resolutions {
        let start = Instant::now();
        let mut shooting =
            ShootingMethodSolver::new(*config, n).with_initial_slopes(initial_slopes.0, initial_slopes.1);
        let shooting_result = match shooting.solve(&system) {
            Ok(result) => {
                sink.persist(&format!("shooting_{}", n), &result.trajectory().rows())?;
                Some(result)
            }
            Err(e) => {
                error!("N = {}: shooting failed: {}", n, e);
                report.failures.push((n, "shooting", e));
                None
            }
        };

        let mut quasi = QuasilinearizationSolver::new(*config, n);
        let quasi_result = match quasi.solve(equation) {
            Ok(result) => {
                sink.persist(&format!("quasi_{}", n), &result.trajectory().rows())?;
                Some(result)
            }
            Err(e) => {
                error!("N = {}: quasilinearization failed: {}", n, e);
                report.failures.push((n, "quasilinearization", e));
                None
            }
        };

        if let (Some(shooting_result), Some(quasi_result)) = (shooting_result, quasi_result) {
            let max_difference = shooting_result
                .trajectory()
                .max_abs_diff(&quasi_result.trajectory())?;
            info!(
                "N = {}: max |y_shoot - y_quasi| = {:e}, {} ms",
                n,
                max_difference,
                start.elapsed().as_millis()
            );
            report.agreements.push(MethodAgreement {
                n_steps: n,
                shooting_slope: shooting_result.s,
                shooting_iterations: shooting_result.iterations,
                quasi_iterations: quasi_result.iterations,
                max_difference,
            });
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Utils::logger::MemorySink;
    use crate::numerical::ODE_system::SqrtSourceEquation;
    use approx::assert_abs_diff_eq;
    use nalgebra::DVector;
    use simplelog::*;

    fn init_logger() {
        let _ = SimpleLogger::init(LevelFilter::Info, Config::default());
    }

    #[test]
    fn nested_error_picks_matching_nodes() {
        let coarse = Trajectory::new(
            DVector::from_vec(vec![0.0, 0.5, 1.0]),
            DVector::from_vec(vec![0.0, 1.0, 2.0]),
        );
        let fine = Trajectory::new(
            DVector::from_vec(vec![0.0, 0.25, 0.5, 0.75, 1.0]),
            DVector::from_vec(vec![0.0, 100.0, 1.1, -100.0, 2.0]),
        );
        // the in-between fine nodes do not count
        assert_abs_diff_eq!(nested_grid_error(&coarse, &fine).unwrap(), 0.1, epsilon = 1e-12);

        let odd = Trajectory::new(
            DVector::from_vec(vec![0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]),
            DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0]),
        );
        assert!(matches!(
            nested_grid_error(&coarse, &odd),
            Err(BvpError::InvalidInput(_))
        ));
    }

    #[test]
    fn grid_errors_shrink() {
        init_logger();
        let equation = SqrtSourceEquation::default();
        let system = FirstOrderReduction::new(&equation);
        let study = ConvergenceStudy::new(BvpConfig::default()).with_resolutions(vec![100, 200, 400]);
        let mut sink = MemorySink::new();
        let report = study.run(&system, &mut sink).unwrap();

        assert!(report.failures.is_empty());
        assert_eq!(report.solutions.len(), 3);
        let errors = report.errors();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].2 < 1e-8);
        assert!(errors[1].2 < errors[0].2, "{:?}", errors);
        for slope in report.slopes.values() {
            assert!(*slope > 1.0 && *slope < 3.0);
        }

        for n in [100, 200, 400] {
            let rows = sink.get(&format!("shooting_{}", n)).unwrap();
            assert_eq!(rows.len(), n + 1);
            assert_abs_diff_eq!(rows[n].1, 2.0, epsilon = 1e-6);
        }
        let table = sink.get("convergence").unwrap();
        assert_eq!(table.len(), 2);
        assert_abs_diff_eq!(table[0].0, 0.01, epsilon = 1e-15);
        assert_eq!(table[0].1, errors[0].2);

        // 100 and 200 both divide 400
        assert_eq!(report.against_reference.len(), 2);
        assert!(report.against_reference.iter().all(|pair| pair.error().is_some()));
        assert!(report.to_table().contains("consecutive"));
    }

    #[test]
    fn non_nested_pairs_are_skipped() {
        init_logger();
        let equation = SqrtSourceEquation::default();
        let system = FirstOrderReduction::new(&equation);
        let study = ConvergenceStudy::new(BvpConfig::default()).with_resolutions(vec![100, 200, 500]);
        let mut sink = MemorySink::new();
        let report = study.run(&system, &mut sink).unwrap();

        assert!(report.consecutive[0].error().is_some());
        assert_eq!(report.consecutive[1].outcome, PairOutcome::NotNested);
        assert_eq!(sink.get("convergence").unwrap().len(), 1);
        // against N = 500 both are compared, 200 on the 101 shared nodes
        assert!(report.against_reference[0].error().is_some());
        assert!(report.against_reference[1].error().unwrap() < 1e-8);
        // 200 -> 500 appears once, as the reference row
        let table = report.to_table();
        assert!(!table.contains("not nested"));
        assert_eq!(table.matches("finest").count(), 2);
    }

    /// y'' = 0, but only defined at multiples of 1/8: the N = 3 solve hits x = 1/6
    struct DyadicLine;

    impl OdeSystem for DyadicLine {
        fn dimension(&self) -> usize {
            2
        }

        fn evaluate(&self, x: f64, u: &DVector<f64>) -> BvpResult<DVector<f64>> {
            if ((x * 8.0).round() - x * 8.0).abs() > 1e-12 {
                return Err(BvpError::Domain { x, value: u[0] });
            }
            Ok(DVector::from_vec(vec![u[1], 0.0]))
        }
    }

    #[test]
    fn shared_nodes_of_non_nested_grids() {
        // N = 2 and N = 3 share only the endpoints, N = 4 and N = 6 share x = 0, 1/2, 1
        let line = |n: usize| {
            let x = DVector::from_fn(n + 1, |i, _| i as f64 / n as f64);
            let y = x.map(|x| 2.0 * x);
            Trajectory::new(x, y)
        };
        let mut bumped = line(6);
        bumped.y[3] += 0.25;
        bumped.y[1] += 100.0;
        assert_abs_diff_eq!(shared_node_error(&line(4), &bumped).unwrap(), 0.25, epsilon = 1e-15);
        assert_eq!(shared_node_error(&line(2), &line(3)).unwrap(), 0.0);
        // nested grids: same nodes as nested_grid_error
        assert_eq!(
            shared_node_error(&line(2), &line(4)).unwrap(),
            nested_grid_error(&line(2), &line(4)).unwrap()
        );
    }

    #[test]
    fn default_resolutions_all_compared_with_the_finest() {
        init_logger();
        let equation = SqrtSourceEquation::default();
        let system = FirstOrderReduction::new(&equation);
        let study = ConvergenceStudy::new(BvpConfig::default()).parallel(true);
        let mut sink = MemorySink::new();
        let report = study.run(&system, &mut sink).unwrap();

        assert!(report.failures.is_empty());
        let coarser = &DEFAULT_RESOLUTIONS[..DEFAULT_RESOLUTIONS.len() - 1];
        assert_eq!(report.against_reference.len(), coarser.len());
        for (pair, &n) in report.against_reference.iter().zip(coarser) {
            assert_eq!(pair.coarse, n);
            assert_eq!(pair.fine, 10000);
            let error = pair.error().unwrap_or_else(|| panic!("N = {} not compared: {:?}", n, pair));
            assert!(error < 1e-8, "N = {}: {}", n, error);
        }
        // consecutive 800 -> 10000 stays unnested, the table lists it once
        assert_eq!(report.consecutive.last().unwrap().outcome, PairOutcome::NotNested);
        let table = report.to_table();
        assert_eq!(table.matches("finest").count(), coarser.len());
        assert_eq!(table.matches("consecutive").count(), report.consecutive.len() - 1);
    }

    #[test]
    fn failed_resolution_does_not_stop_the_study() {
        init_logger();
        let system = DyadicLine;
        let study = ConvergenceStudy::new(BvpConfig::default()).with_resolutions(vec![2, 3, 4]);
        let mut sink = MemorySink::new();
        let report = study.run(&system, &mut sink).unwrap();

        assert!(matches!(report.failures.get(&3), Some(BvpError::Domain { .. })));
        assert_eq!(report.solutions.len(), 2);
        assert!(sink.get("shooting_2").is_some());
        assert!(sink.get("shooting_3").is_none());
        assert!(sink.get("shooting_4").is_some());
        assert_eq!(report.consecutive[0].outcome, PairOutcome::NotNested);
        assert_eq!(report.consecutive[1].outcome, PairOutcome::NotNested);
        // the straight line is exact on both grids
        assert_abs_diff_eq!(report.against_reference[0].error().unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(report.against_reference[1].outcome, PairOutcome::Missing);
        assert!(report.to_table().contains("failed"));
    }

    #[test]
    fn parallel_run_matches_sequential() {
        init_logger();
        let equation = SqrtSourceEquation::default();
        let system = FirstOrderReduction::new(&equation);
        let study = ConvergenceStudy::new(BvpConfig::default()).with_resolutions(vec![50, 100, 200]);
        let sequential = study.run(&system, &mut MemorySink::new()).unwrap();
        let parallel = study.clone().parallel(true).run(&system, &mut MemorySink::new()).unwrap();
        assert_eq!(sequential.solutions, parallel.solutions);
        assert_eq!(sequential.consecutive, parallel.consecutive);
    }

    #[test]
    fn invalid_resolutions() {
        let equation = SqrtSourceEquation::default();
        let system = FirstOrderReduction::new(&equation);
        for resolutions in [vec![], vec![0, 10], vec![200, 100], vec![100, 100]] {
            let study = ConvergenceStudy::new(BvpConfig::default()).with_resolutions(resolutions);
            assert!(matches!(
                study.run(&system, &mut MemorySink::new()),
                Err(BvpError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn methods_agree() {
        init_logger();
        let equation = SqrtSourceEquation::default();
        let mut sink = MemorySink::new();
        let report = run_batch(&BvpConfig::default(), &equation, &[100, 200], (1.0, 3.0), &mut sink).unwrap();
        assert!(report.failures.is_empty());
        assert_eq!(report.agreements.len(), 2);
        for agreement in &report.agreements {
            assert!(agreement.max_difference < 1e-5, "{:?}", agreement);
            assert!(agreement.quasi_iterations < 50);
        }
        for name in ["shooting_100", "quasi_100", "shooting_200", "quasi_200"] {
            assert!(sink.get(name).is_some(), "{} not persisted", name);
        }
        assert!(report.to_table().contains("200"));
    }

    #[test]
    fn batch_records_failures() {
        init_logger();
        let equation = SqrtSourceEquation::default();
        let config = BvpConfig {
            y1: -1.0,
            ..BvpConfig::default()
        };
        let mut sink = MemorySink::new();
        let report = run_batch(&config, &equation, &[20], (1.0, 3.0), &mut sink).unwrap();
        assert!(report.agreements.is_empty());
        assert!(!report.failures.is_empty());
        assert!(sink.get("shooting_20").is_none());
    }
}
