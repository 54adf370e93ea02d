//! Batch driver for the U-Loading solver.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use u_loading_cli::{build_result, load_instance, write_report, write_result, Instance};
use u_loading_core::SolverConfig;
use u_loading_routing::{AlnsRunner, FleetManager};

#[derive(Parser)]
#[command(name = "u-loading")]
#[command(about = "Heterogeneous-fleet 3L-CVRP batch solver")]
#[command(version)]
struct Cli {
    /// Instance file, or a directory of .json/.txt instance files
    input_path: PathBuf,

    /// Directory for result files
    #[arg(long, default_value = "result")]
    result_dir: PathBuf,

    /// Maximum ALNS iterations
    #[arg(long)]
    iterations: Option<usize>,

    /// Wall-clock budget per instance, in seconds
    #[arg(long)]
    time_limit: Option<u64>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Independent parallel restarts per instance
    #[arg(long, default_value = "1")]
    restarts: usize,

    /// Disable the packing memo cache
    #[arg(long)]
    no_cache: bool,
}

fn collect_input_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("reading input directory {}", path.display()))?
    {
        let entry = entry?;
        let p = entry.path();
        let ext = p.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if p.is_file() && (ext == "json" || ext == "txt") {
            files.push(p);
        }
    }
    files.sort();
    Ok(files)
}

fn solver_config(cli: &Cli) -> SolverConfig {
    let mut config = SolverConfig::default();
    if let Some(n) = cli.iterations {
        config = config.with_max_iterations(n);
    }
    if let Some(secs) = cli.time_limit {
        config = config.with_max_runtime(Duration::from_secs(secs));
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if cli.no_cache {
        config = config.with_cache(false);
    }
    config
}

fn solve_instance(instance: &Instance, config: &SolverConfig, cli: &Cli) -> anyhow::Result<()> {
    log::info!(
        "instance '{}': {} customers, {} vehicle types",
        instance.name(),
        instance.customers().len(),
        instance.vehicle_types().len()
    );

    let timer = Instant::now();
    let fleet = FleetManager::new(
        instance.vehicle_types().to_vec(),
        instance.distances().clone(),
        config.clone(),
    );
    let runner = AlnsRunner::new(config.clone());

    let result = if cli.restarts > 1 {
        runner.run_parallel(
            &fleet,
            instance.start(),
            instance.end(),
            instance.customers(),
            cli.restarts,
        )
    } else {
        runner.run(&fleet, instance.start(), instance.end(), instance.customers())
    };

    log::info!(
        "instance '{}': cost {:.2}, {} routes, {} iterations in {:.2}s",
        instance.name(),
        result.best_cost,
        result.best.routes().len(),
        result.iterations,
        timer.elapsed().as_secs_f64()
    );
    if result.coverage_incomplete {
        log::warn!(
            "instance '{}': best solution leaves customers unserved",
            instance.name()
        );
    }

    std::fs::create_dir_all(&cli.result_dir)
        .with_context(|| format!("creating {}", cli.result_dir.display()))?;

    let json_path = cli
        .result_dir
        .join(format!("{}_result.json", instance.name()));
    let file = build_result(instance.name(), &result.best);
    write_result(&json_path, &file)
        .with_context(|| format!("writing {}", json_path.display()))?;
    log::info!("result saved to {}", json_path.display());

    let report_path = cli
        .result_dir
        .join(format!("{}_result.txt", instance.name()));
    write_report(&report_path, instance.name(), &result.best, config)
        .with_context(|| format!("writing {}", report_path.display()))?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = solver_config(&cli);
    config.validate()?;

    let files = collect_input_files(&cli.input_path)?;
    anyhow::ensure!(
        !files.is_empty(),
        "no instance files found in {}",
        cli.input_path.display()
    );
    log::info!("found {} instance(s)", files.len());

    let mut failures = 0usize;
    for path in &files {
        let outcome = load_instance(path)
            .map_err(anyhow::Error::from)
            .and_then(|instance| solve_instance(&instance, &config, &cli));
        if let Err(e) = outcome {
            failures += 1;
            log::error!("failed on {}: {:#}", path.display(), e);
        }
    }

    anyhow::ensure!(
        failures == 0,
        "{} of {} instance(s) failed",
        failures,
        files.len()
    );
    Ok(())
}
