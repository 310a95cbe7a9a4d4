#![allow(dead_code)]

use held_karp::{Cost, DistanceMatrix, Tour};
use rand::{rngs::StdRng, Rng};

/// Cheapest closed tour from city 0 over every ordering of the other cities.
pub fn brute_force(matrix: &DistanceMatrix) -> Option<Cost> {
    fn go(
        matrix: &DistanceMatrix,
        prev: usize,
        visited: &mut [bool],
        remaining: usize,
        acc: Cost,
        best: &mut Option<Cost>,
    ) {
        if remaining == 0 {
            if matrix.is_reachable(prev, 0) {
                let total = acc + matrix.cost(prev, 0);
                *best = Some(best.map_or(total, |b| b.min(total)));
            }
            return;
        }
        for next in 1..visited.len() {
            if visited[next] || !matrix.is_reachable(prev, next) {
                continue;
            }
            visited[next] = true;
            go(
                matrix,
                next,
                visited,
                remaining - 1,
                acc + matrix.cost(prev, next),
                best,
            );
            visited[next] = false;
        }
    }

    let n = matrix.size();
    if n == 1 {
        return Some(0);
    }
    let mut visited = vec![false; n];
    visited[0] = true;
    let mut best = None;
    go(matrix, 0, &mut visited, n - 1, 0, &mut best);
    best
}

/// Tour is a Hamiltonian cycle through the depot costing exactly `cost`.
pub fn assert_valid_tour(matrix: &DistanceMatrix, tour: &Tour, cost: Cost) {
    let n = matrix.size();
    let cities = tour.cities();
    assert_eq!(cities.len(), n + 1, "tour {tour}");
    assert_eq!(cities.first(), Some(&0));
    assert_eq!(cities.last(), Some(&0));
    let mut sorted = cities[..n].to_vec();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..n).collect::<Vec<_>>(), "tour {tour}");
    if n > 1 {
        assert_eq!(tour.edge_cost(matrix), Some(cost), "tour {tour}");
    }
    assert_eq!(tour.cost(), cost);
}

/// Random matrix with costs in `0..=max_cost`; each off-diagonal edge is
/// missing with probability `hole_rate`.
pub fn random_matrix(rng: &mut StdRng, n: usize, max_cost: i64, hole_rate: f64) -> DistanceMatrix {
    let rows: Vec<Vec<Option<i64>>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i != j && rng.gen_bool(hole_rate) {
                        None
                    } else {
                        Some(rng.gen_range(0..=max_cost))
                    }
                })
                .collect()
        })
        .collect();
    DistanceMatrix::from_entries(&rows).unwrap()
}

/// Symmetric variant of [`random_matrix`] without missing edges.
pub fn random_symmetric(rng: &mut StdRng, n: usize, max_cost: i64) -> DistanceMatrix {
    let mut rows = vec![vec![0i64; n]; n];
    for i in 0..n {
        for j in i + 1..n {
            let c = rng.gen_range(0..=max_cost);
            rows[i][j] = c;
            rows[j][i] = c;
        }
    }
    DistanceMatrix::from_rows(&rows).unwrap()
}

pub fn bench26_text() -> &'static str {
    include_str!("../data/bench26.txt")
}
