//! cpu_microbench - run the three CPU kernels once and print the report
//!
//! ```text
//! ┌─────────┐    ┌─────────┐    ┌──────────┐    ┌────────────┐    ┌─────────┐
//! │  Start  │───▶│  Sieve  │───▶│  Matmul  │───▶│ Mandelbrot │───▶│ Summary │
//! └─────────┘    └─────────┘    └──────────┘    └────────────┘    └─────────┘
//! ```
//!
//! Exit status is 1 if any kernel failed, after every stage has run.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use cpu_microbench::config::{AppConfig, BenchConfig};
use cpu_microbench::{Harness, MonotonicClock};

/// `--env <name>` / `-e <name>` selects `config/<name>.yaml` (logging only)
fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn main() -> anyhow::Result<ExitCode> {
    let env = get_env();
    let app_config = AppConfig::load(&env)
        .with_context(|| format!("Failed to load config for env '{}'", env))?
        .unwrap_or_default();
    let _log_guard = cpu_microbench::logging::init_logging(&app_config);

    tracing::info!(
        env = %env,
        git_hash = env!("GIT_HASH"),
        version = env!("CARGO_PKG_VERSION"),
        "starting cpu_microbench"
    );

    let harness = Harness::new(BenchConfig::default(), MonotonicClock::new());
    tracing::debug!(config = ?harness.config(), "benchmark parameters");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = harness
        .run(&mut out)
        .context("Failed to write benchmark report")?;

    if summary.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!(failed = ?summary.failed_stages(), "benchmark finished with failures");
        Ok(ExitCode::FAILURE)
    }
}
