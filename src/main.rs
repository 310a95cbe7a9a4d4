use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use held_karp::io::TextSource;
use held_karp::{EvaluationOrder, MatrixProvider, SolverBuilder};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Solve a travelling-salesman instance exactly.
///
/// The input file holds an n×n matrix of non-negative integers, one row per
/// line. `inf`, `x` or `-` mark an unreachable edge. The tour starts and ends
/// at city 0.
#[derive(Parser)]
#[command(name = "held-karp", version)]
struct Cli {
    /// Distance matrix file.
    input: PathBuf,

    /// Number of cities; when given, the first n×n values are read row-major
    /// regardless of line breaks.
    #[arg(short = 'n', long)]
    cities: Option<usize>,

    /// Refuse instances larger than this.
    #[arg(long, default_value_t = held_karp::builder::DEFAULT_MAX_CITIES)]
    max_cities: usize,

    /// Refuse instances whose memo table would exceed this many MiB.
    #[arg(long)]
    memory_budget_mib: Option<usize>,

    #[arg(long, value_enum, default_value_t = Order::BottomUp)]
    order: Order,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    BottomUp,
    TopDown,
    #[cfg(feature = "parallel")]
    Parallel,
}

impl From<Order> for EvaluationOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::BottomUp => EvaluationOrder::BottomUp,
            Order::TopDown => EvaluationOrder::TopDown,
            #[cfg(feature = "parallel")]
            Order::Parallel => EvaluationOrder::Parallel,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    cities: usize,
    cost: u32,
    tour: &'a [usize],
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(input = %cli.input.display(), "solve failed");
            eprintln!("held-karp: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = TextSource::from_path(&cli.input);
    if let Some(n) = cli.cities {
        source = source.with_size(n);
    }
    let matrix = source.load()?;
    tracing::info!(
        cities = matrix.size(),
        symmetric = matrix.is_symmetric(),
        "matrix loaded"
    );

    let mut builder = SolverBuilder::new()
        .with_max_cities(cli.max_cities)
        .with_order(cli.order.into());
    if let Some(mib) = cli.memory_budget_mib {
        builder = builder.with_memory_budget(mib.saturating_mul(1 << 20));
    }
    let (cost, tour) = builder.build(&matrix).run()?;

    match cli.format {
        Format::Text => {
            println!("Shortest distance is: {cost}");
            println!("Shortest path is: {tour}");
        }
        Format::Json => {
            let report = Report {
                cities: matrix.size(),
                cost,
                tour: tour.cities(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
