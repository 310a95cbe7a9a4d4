use std::time::Instant;

use clap::{Parser, ValueEnum};
use held_karp::{Cost, DistanceMatrix, EvaluationOrder, SolverBuilder};
use serde::Serialize;
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

/// Solve deterministic instances of growing size and report time, memory and
/// agreement with brute-force enumeration.
#[derive(Parser)]
#[command(name = "scale_probe")]
struct Options {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
    /// Largest city count to verify against brute force.
    #[arg(long, default_value_t = 9)]
    verify_limit: usize,
    /// Smallest city count to probe.
    #[arg(long, default_value_t = 4)]
    min_cities: usize,
    /// Largest city count to probe.
    #[arg(long, default_value_t = 20)]
    max_cities: usize,
}

#[derive(Copy, Clone, ValueEnum)]
enum OutputFormat {
    Csv,
    Table,
    Json,
}

impl OutputFormat {
    fn write(self, measurements: &[Measurement]) -> Result<(), String> {
        match self {
            OutputFormat::Csv => write_csv(measurements),
            OutputFormat::Table => write_table(measurements),
            OutputFormat::Json => write_json(measurements),
        }
    }
}

#[derive(Clone, Serialize)]
struct Measurement {
    scenario: &'static str,
    cities: usize,
    cost: Option<Cost>,
    wall_s: f64,
    rss_delta_kib: u64,
    status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum VerificationStatus {
    NotChecked,
    Passed,
    Failed,
}

impl VerificationStatus {
    fn label(&self) -> &'static str {
        match self {
            VerificationStatus::NotChecked => "not_checked",
            VerificationStatus::Passed => "passed",
            VerificationStatus::Failed => "failed",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            VerificationStatus::Passed => "✓",
            VerificationStatus::Failed => "✗",
            VerificationStatus::NotChecked => "○",
        }
    }
}

fn main() {
    let options = Options::parse();
    if options.min_cities == 0 || options.min_cities > options.max_cities {
        eprintln!("scale_probe: --min-cities must be in 1..=--max-cities");
        std::process::exit(2);
    }

    eprintln!("\n{}", "=".repeat(80));
    eprintln!("Held-Karp scaling probe");
    eprintln!("{}", "=".repeat(80));
    eprintln!("  cities {}..={}", options.min_cities, options.max_cities);
    eprintln!("  brute-force verification up to {} cities", options.verify_limit);
    eprintln!();

    #[allow(unused_mut)]
    let mut orders = vec![
        ("bottom_up", EvaluationOrder::BottomUp),
        ("top_down", EvaluationOrder::TopDown),
    ];
    #[cfg(feature = "parallel")]
    orders.push(("parallel", EvaluationOrder::Parallel));

    let mut sys = System::new();
    let mut measurements = Vec::new();
    for (step, &(scenario, order)) in orders.iter().enumerate() {
        eprintln!("[{}/{}] {scenario}", step + 1, orders.len());
        for n in options.min_cities..=options.max_cities {
            eprint!("      n = {n:2} ... ");
            let m = measure(scenario, n, &mut sys, || {
                let matrix = deterministic_matrix(n, 0x5eed ^ n as u64);
                let solver = SolverBuilder::new()
                    .with_max_cities(n)
                    .with_order(order)
                    .build(&matrix);
                let (cost, tour) = match solver.run() {
                    Ok(result) => result,
                    Err(err) => return (None, VerificationStatus::Failed, Some(err.to_string())),
                };
                if let Err(err) = tour.verify(&matrix) {
                    return (Some(cost), VerificationStatus::Failed, Some(err.to_string()));
                }
                if n > options.verify_limit {
                    return (Some(cost), VerificationStatus::NotChecked, None);
                }
                let baseline = brute_force(&matrix);
                if baseline == Some(cost) {
                    (Some(cost), VerificationStatus::Passed, None)
                } else {
                    (
                        Some(cost),
                        VerificationStatus::Failed,
                        Some(format!("expected {baseline:?}, got {cost}")),
                    )
                }
            });
            eprintln!(
                "{} cost={}, time={:.3}s, rss_delta={} KiB, status={}",
                m.status.icon(),
                m.cost.map_or_else(|| "-".to_string(), |c| c.to_string()),
                m.wall_s,
                m.rss_delta_kib,
                m.status.label()
            );
            measurements.push(m);
        }
        eprintln!();
    }

    print_summary(&measurements);

    if let Err(err) = options.format.write(&measurements) {
        eprintln!("scale_probe output error: {err}");
        std::process::exit(1);
    }
    if measurements
        .iter()
        .any(|m| m.status == VerificationStatus::Failed)
    {
        std::process::exit(1);
    }
}

/// Asymmetric costs in 1..=999 from a fixed-seed xorshift generator.
fn deterministic_matrix(n: usize, seed: u64) -> DistanceMatrix {
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    let costs = (0..n * n)
        .map(|idx| {
            if idx / n == idx % n {
                0
            } else {
                (next() % 999 + 1) as Cost
            }
        })
        .collect();
    DistanceMatrix::new(n, costs).expect("generated matrix is valid")
}

/// Minimum over every ordering of the non-depot cities (Heap's algorithm).
fn brute_force(matrix: &DistanceMatrix) -> Option<Cost> {
    let n = matrix.size();
    if n == 1 {
        return Some(0);
    }
    let tour_cost = |order: &[usize]| -> Option<Cost> {
        let mut total: Cost = 0;
        let mut prev = 0;
        for &c in order.iter().chain(std::iter::once(&0)) {
            total = total.checked_add(matrix.cost(prev, c)).filter(|&t| t != Cost::MAX)?;
            prev = c;
        }
        Some(total)
    };

    let mut order: Vec<usize> = (1..n).collect();
    let mut counters = vec![0usize; order.len()];
    let mut best = tour_cost(&order);
    let mut i = 0;
    while i < order.len() {
        if counters[i] < i {
            if i % 2 == 0 {
                order.swap(0, i);
            } else {
                order.swap(counters[i], i);
            }
            if let Some(c) = tour_cost(&order) {
                best = Some(best.map_or(c, |b| b.min(c)));
            }
            counters[i] += 1;
            i = 0;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    best
}

fn measure<F>(scenario: &'static str, cities: usize, sys: &mut System, compute: F) -> Measurement
where
    F: FnOnce() -> (Option<Cost>, VerificationStatus, Option<String>),
{
    let before = rss_kib(sys);
    let start = Instant::now();
    let (cost, status, detail) = compute();
    let duration = start.elapsed();
    let after = rss_kib(sys);

    Measurement {
        scenario,
        cities,
        cost,
        wall_s: duration.as_secs_f64(),
        rss_delta_kib: after.saturating_sub(before),
        status,
        detail,
    }
}

fn print_summary(measurements: &[Measurement]) {
    let count = |s: VerificationStatus| measurements.iter().filter(|m| m.status == s).count();
    eprintln!("{}", "=".repeat(80));
    eprintln!("Summary: {} runs", measurements.len());
    eprintln!("  ✓ passed:      {}", count(VerificationStatus::Passed));
    eprintln!("  ✗ failed:      {}", count(VerificationStatus::Failed));
    eprintln!("  ○ not checked: {}", count(VerificationStatus::NotChecked));
    for m in measurements
        .iter()
        .filter(|m| m.status == VerificationStatus::Failed)
    {
        eprintln!(
            "  ✗ {} n={}: {}",
            m.scenario,
            m.cities,
            m.detail.as_deref().unwrap_or("")
        );
    }
    eprintln!("{}", "=".repeat(80));
    eprintln!();
}

fn write_csv(measurements: &[Measurement]) -> Result<(), String> {
    println!("scenario,cities,cost,wall_s,rss_delta_kib,status,detail");
    for m in measurements {
        let detail = m
            .detail
            .as_ref()
            .map(|s| s.replace('"', "'"))
            .unwrap_or_default();
        println!(
            "{},{},{},{:.3},{},{},\"{}\"",
            m.scenario,
            m.cities,
            m.cost.map(|c| c.to_string()).unwrap_or_default(),
            m.wall_s,
            m.rss_delta_kib,
            m.status.label(),
            detail
        );
    }
    Ok(())
}

fn write_table(measurements: &[Measurement]) -> Result<(), String> {
    let col1 = measurements
        .iter()
        .map(|m| m.scenario.len())
        .max()
        .unwrap_or(0)
        .max("scenario".len());
    println!(
        "{:<col1$}  {:>6}  {:>10}  {:>10}  {:>14}  {:>12}",
        "scenario", "cities", "cost", "wall_s", "rss_delta_kib", "status"
    );
    println!(
        "{:-<col1$}  {:-<6}  {:-<10}  {:-<10}  {:-<14}  {:-<12}",
        "", "", "", "", "", ""
    );
    for m in measurements {
        println!(
            "{:<col1$}  {:>6}  {:>10}  {:>10.3}  {:>14}  {:>12}",
            m.scenario,
            m.cities,
            m.cost.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
            m.wall_s,
            m.rss_delta_kib,
            m.status.label()
        );
    }
    Ok(())
}

fn write_json(measurements: &[Measurement]) -> Result<(), String> {
    let text = serde_json::to_string_pretty(measurements).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or(0, |process| process.memory() / 1024)
}
