#![allow(non_snake_case)]
use RustedBVP::Utils::logger::{init_logging, sink_for};
use RustedBVP::Utils::task_parser::TaskConfig;
use RustedBVP::numerical::BVP_error::BvpResult;
use RustedBVP::numerical::Convergence_study::{ConvergenceStudy, run_batch};
use RustedBVP::numerical::ODE_system::{FirstOrderReduction, SqrtSourceEquation};
use log::info;

/// usage: RustedBVP [task_file]
/// without a task file the reference problem y'' = x*sqrt(y), y(0) = 0, y(1) = 2 is solved
/// with the default resolutions and the results are written as txt files into ./data
fn run() -> BvpResult<()> {
    let task = match std::env::args().nth(1) {
        Some(path) => TaskConfig::from_file(path)?,
        None => TaskConfig::default(),
    };
    init_logging(Some(task.loglevel.as_str()), task.log_to_file)?;
    info!("task: {:?}", task);

    let mut sink = sink_for(task.format, &task.output_dir)?;
    let equation = SqrtSourceEquation::new(task.regularization);

    let batch = run_batch(
        &task.problem,
        &equation,
        &task.batch_resolutions,
        task.initial_slopes,
        sink.as_mut(),
    )?;
    println!("\n shooting vs quasilinearization \n{}", batch.to_table());

    let system = FirstOrderReduction::new(&equation);
    let study = ConvergenceStudy::new(task.problem)
        .with_resolutions(task.study_resolutions.clone())
        .with_initial_slopes(task.initial_slopes.0, task.initial_slopes.1)
        .parallel(task.parallel);
    let report = study.run(&system, sink.as_mut())?;
    println!("\n convergence study \n{}", report.to_table());
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
