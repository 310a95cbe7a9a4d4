//! Example: the 26-city benchmark instance.
//!
//! Needs roughly 3.5 GB for the memo table. Run with:
//! `cargo run --release --example benchmark26`
//!
//! Pass a smaller city count to solve a prefix of the instance instead:
//! `cargo run --release --example benchmark26 -- 18`

use held_karp::{io::parse_matrix, DistanceMatrix, HeldKarpSolver};

fn main() {
    let full = parse_matrix(include_str!("../tests/data/bench26.txt"), None)
        .expect("benchmark data is well formed");

    let n = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<usize>().ok())
        .unwrap_or(full.size())
        .clamp(1, full.size());
    let rows: Vec<Vec<i64>> = (0..n)
        .map(|i| full.row(i)[..n].iter().map(|&c| i64::from(c)).collect())
        .collect();
    let matrix = DistanceMatrix::from_rows(&rows).expect("prefix of a valid matrix");

    println!("Solving {n} cities...");
    match HeldKarpSolver::new(&matrix).run() {
        Ok((cost, tour)) => {
            println!("Shortest distance is: {cost}");
            println!("Shortest path is obtained by following nodes: {tour}");
        }
        Err(err) => eprintln!("solve failed: {err}"),
    }
}
