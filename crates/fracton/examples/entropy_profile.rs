//! Print the entanglement profile and border correlations of a small lattice.
//!
//! Usage:
//!   cargo run -p fracton --example entropy_profile -- 5 4 3

use fracton::api::{entanglement_entropy, FractonModel};
use rand::{rngs::StdRng, SeedableRng};

fn main() {
    let args: Vec<usize> = std::env::args()
        .skip(1)
        .filter_map(|a| a.parse().ok())
        .collect();
    let (p, q, n) = match args.as_slice() {
        [p, q, n, ..] => (*p, *q, *n),
        _ => (5, 4, 3),
    };
    let mut model = match FractonModel::new(p, q, n, None) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    println!(
        "{{{p},{q}}} x {n}: {} polygons, {} border, {} geodesics",
        model.len(),
        model.border().len(),
        model.geodesics().len()
    );
    for (k, s) in entanglement_entropy(&model, 0.0, 1).iter().enumerate() {
        println!("cut {:>3}: {s:.4}", k + 1);
    }
    model.decorrelate(50, &mut StdRng::seed_from_u64(1));
    println!("energy after 50 flips: {}", model.hamiltonian());
    println!("border correlations: {:?}", model.border_correlations());
}
