//! Example: one-way streets and missing roads.
//!
//! Run with:
//! `cargo run --example asymmetric`

use held_karp::{DistanceMatrix, EvaluationOrder, SolverBuilder};

fn main() {
    // None marks a road that does not exist in that direction.
    let rows = vec![
        vec![Some(0), Some(2), None, Some(9), Some(4)],
        vec![Some(7), Some(0), Some(3), None, Some(8)],
        vec![Some(5), None, Some(0), Some(1), Some(6)],
        vec![Some(2), Some(6), None, Some(0), Some(3)],
        vec![None, Some(4), Some(2), Some(5), Some(0)],
    ];
    let matrix = DistanceMatrix::from_entries(&rows).expect("valid matrix");

    for order in [EvaluationOrder::BottomUp, EvaluationOrder::TopDown] {
        let solver = SolverBuilder::new().with_order(order).build(&matrix);
        let solution = solver.solve().expect("a tour exists");
        let tour = solution.tour(&matrix).expect("table is consistent");
        println!(
            "{order:?}: cost {} via {tour} ({} of {} states computed)",
            solution.cost(),
            solution.table().filled_count(),
            solution.table().capacity()
        );
        println!("  reversed costs {:?}", tour.reversed().edge_cost(&matrix));
    }
}
