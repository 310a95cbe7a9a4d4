mod common;

use common::{assert_valid_tour, random_matrix};
use held_karp::{DistanceMatrix, EvaluationOrder, HeldKarpSolver, SolverBuilder};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn run(m: &DistanceMatrix, order: EvaluationOrder) -> Option<(u32, Vec<usize>)> {
    SolverBuilder::new()
        .with_order(order)
        .build(m)
        .run()
        .ok()
        .map(|(cost, tour)| (cost, tour.into_cities()))
}

proptest! {
    #[test]
    fn top_down_matches_bottom_up(seed in any::<u64>(), n in 1usize..9) {
        let mut rng = StdRng::seed_from_u64(seed);
        let m = random_matrix(&mut rng, n, 50, 0.15);
        prop_assert_eq!(
            run(&m, EvaluationOrder::BottomUp),
            run(&m, EvaluationOrder::TopDown)
        );
    }
}

#[test]
fn bottom_up_fills_every_state_top_down_at_most_that() {
    let mut rng = StdRng::seed_from_u64(7);
    let m = random_matrix(&mut rng, 10, 100, 0.3);
    let bottom_up = HeldKarpSolver::new(&m).solve();
    let top_down = SolverBuilder::new()
        .with_order(EvaluationOrder::TopDown)
        .build(&m)
        .solve();
    match (bottom_up, top_down) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a.cost(), b.cost());
            // Every non-depot state plus the depot base cell.
            let expected = 1 + (1..10).map(|_| 1usize << 8).sum::<usize>();
            assert_eq!(a.table().filled_count(), expected);
            assert!(b.table().filled_count() <= expected);
            let tour = b.tour(&m).unwrap();
            assert_valid_tour(&m, &tour, b.cost());
        }
        (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
        (a, b) => panic!("orders disagree: {a:?} vs {b:?}"),
    }
}

#[cfg(feature = "parallel")]
mod parallel {
    use super::*;

    proptest! {
        #[test]
        fn parallel_matches_bottom_up(seed in any::<u64>(), n in 1usize..11) {
            let mut rng = StdRng::seed_from_u64(seed);
            let m = random_matrix(&mut rng, n, 50, 0.1);
            prop_assert_eq!(
                run(&m, EvaluationOrder::BottomUp),
                run(&m, EvaluationOrder::Parallel)
            );
        }
    }

    #[test]
    fn parallel_fills_the_whole_table() {
        let mut rng = StdRng::seed_from_u64(99);
        let m = common::random_symmetric(&mut rng, 14, 200);
        let a = HeldKarpSolver::new(&m).solve().unwrap();
        let b = SolverBuilder::new()
            .with_order(EvaluationOrder::Parallel)
            .build(&m)
            .solve()
            .unwrap();
        assert_eq!(a.cost(), b.cost());
        assert_eq!(a.table().filled_count(), b.table().filled_count());
        assert_eq!(a.tour(&m).unwrap(), b.tour(&m).unwrap());
    }
}
