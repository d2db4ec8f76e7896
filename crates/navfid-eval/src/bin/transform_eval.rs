use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use navfid_eval::{EvalConfig, Evaluator};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "transform_eval",
    about = "Score a converted navigation dataset against its ground truth"
)]
struct Args {
    /// Directory of ground-truth standardized dataset files.
    #[arg(long, value_name = "DIR")]
    ground_truth: PathBuf,

    /// Directory of converted dataset files to evaluate.
    #[arg(long, value_name = "DIR")]
    converted: PathBuf,

    /// Write the JSON report here instead of standard output.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Benchmark results JSON from the external conversion benchmark.
    #[arg(long, value_name = "FILE")]
    benchmark_results: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = EvalConfig {
        benchmark_results: args.benchmark_results.clone(),
        ..EvalConfig::default()
    };
    let evaluator = Evaluator::with_config(&args.ground_truth, &args.converted, config);

    let report = match evaluator.evaluate() {
        Ok(report) => report,
        Err(err) => {
            eprintln!("evaluation failed: {err}");
            process::exit(1);
        }
    };
    let payload = match serde_json::to_string_pretty(&report) {
        Ok(payload) => payload,
        Err(err) => {
            eprintln!("failed to serialize report: {err}");
            process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(err) = fs::write(path, payload) {
                eprintln!("failed to write '{}': {err}", path.display());
                process::exit(1);
            }
            println!("report written to {}", path.display());
        }
        None => println!("{payload}"),
    }
}
