use cache_simulator::generator::{WorkloadConfig, WorkloadGenerator, WorkloadPattern};
use cache_simulator::models::{CacheAlgorithm, CacheMode, SimulationConfig};
use cache_simulator::runner::SimulationRunner;
use cache_simulator::stats::SimulationStats;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Replays a synthetic workload through 2Q and LRU and compares hit rates
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of entries)
    #[arg(short, long, default_value = "1000")]
    capacity: usize,

    /// Number of requests to replay
    #[arg(short, long, default_value = "100000")]
    requests: usize,

    /// Size of the key space
    #[arg(short, long, default_value = "10000")]
    keys: u64,

    /// Workload shape: hot-scan, uniform, zipf or loop
    #[arg(short, long, default_value = "hot-scan")]
    pattern: String,

    /// Algorithms to simulate (2q, lru)
    /// If not provided, all algorithms will be used
    #[arg(short, long, value_name = "ALGOS", num_args = 1.., value_delimiter = ',')]
    algorithms: Option<Vec<String>>,

    /// Cache mode: sequential, concurrent, or both
    #[arg(long, default_value = "sequential")]
    mode: String,

    /// Worker threads for concurrent runs
    #[arg(long, default_value = "4")]
    threads: usize,

    /// Fraction of capacity for the 2Q probationary queue
    #[arg(long, default_value = "0.25")]
    recent_ratio: f64,

    /// 2Q ghost list size as a fraction of capacity
    #[arg(long, default_value = "0.5")]
    ghost_ratio: f64,

    /// Seed for the workload generator
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Export results to CSV file
    #[arg(long, value_name = "PATH")]
    output_csv: Option<PathBuf>,
}

fn parse_algorithms(names: Option<&[String]>) -> Vec<CacheAlgorithm> {
    let selected: Vec<_> = names
        .unwrap_or_default()
        .iter()
        .filter_map(|name| {
            let parsed = CacheAlgorithm::parse(name);
            if parsed.is_none() {
                warn!("unknown algorithm '{name}', skipping");
            }
            parsed
        })
        .collect();

    if selected.is_empty() {
        CacheAlgorithm::all()
    } else {
        selected
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let pattern = WorkloadPattern::parse(&args.pattern)
        .ok_or_else(|| format!("unknown pattern '{}'", args.pattern))?;
    let modes = CacheMode::parse(&args.mode).unwrap_or_else(|| {
        warn!("unknown mode '{}', using 'sequential'", args.mode);
        vec![CacheMode::Sequential]
    });
    let algorithms = parse_algorithms(args.algorithms.as_deref());

    println!("Cache Simulation");
    println!("================");
    println!("Capacity: {} entries", args.capacity);
    println!(
        "Workload: {} requests over {} keys ({pattern}, seed {})",
        args.requests, args.keys, args.seed
    );
    println!(
        "Algorithms: {:?}",
        algorithms.iter().map(|a| a.as_str()).collect::<Vec<_>>()
    );
    println!(
        "Modes: {:?}",
        modes.iter().map(|m| m.as_str()).collect::<Vec<_>>()
    );

    let requests = WorkloadGenerator::new(WorkloadConfig {
        requests: args.requests,
        unique_keys: args.keys,
        pattern,
        seed: args.seed,
    })
    .generate();

    let config = SimulationConfig {
        capacity: args.capacity,
        recent_ratio: args.recent_ratio,
        ghost_ratio: args.ghost_ratio,
        algorithms,
        modes,
    };

    let result = SimulationRunner::new(config, args.threads).run(&requests)?;
    info!(elapsed = ?result.duration, "simulation completed");
    println!("\nSimulation completed in {:.2?}", result.duration);
    println!("Total requests: {}", result.total_requests);
    println!("Unique keys: {}", result.unique_keys);

    let stats = SimulationStats::from_result(&result);
    stats.print_summary();
    stats.print_comparison();

    if let Some(csv_path) = args.output_csv {
        stats.export_csv(&csv_path, pattern.as_str(), args.capacity)?;
        println!("\nResults exported to: {}", csv_path.display());
    }

    Ok(())
}
