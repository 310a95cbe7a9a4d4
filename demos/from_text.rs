//! Example: solve a matrix given in the text format.
//!
//! Run with:
//! `cargo run --example from_text`

use held_karp::{io::TextSource, solve};

fn main() {
    let source = TextSource::from_text(
        "# four depots around a lake\n\
         0  10 15 20\n\
         10  0 35 25\n\
         15 35  0 30\n\
         20 25 30  0\n",
    );

    match solve(&source) {
        Ok((cost, tour)) => {
            println!("Optimal cost: {cost}");
            println!("Tour: {tour}");
        }
        Err(err) => eprintln!("error: {err}"),
    }
}
