//! A Hadamard-like transform on a single Fibonacci qudit
//!
//! Thirteen braids of three anyons take basis state 2 to a near-equal
//! superposition of outcomes 0 and 2.
//!
//! Run with: RUST_LOG=debug cargo run --example hadamard_like --release

use fibq_sim::{AnyonicCircuit, CircuitConfig, FusionLayout, InitialState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

const SEQUENCE: [(usize, i32); 13] = [
    (1, 2),
    (2, 2),
    (1, -2),
    (2, -2),
    (1, 2),
    (2, 4),
    (1, -2),
    (2, 2),
    (1, 2),
    (2, -2),
    (1, 2),
    (2, -2),
    (1, 4),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Hadamard-like braid ===\n");
    single_qudit()?;

    println!("\n=== Braiding across qudits ===\n");
    fused_pair()?;
    Ok(())
}

fn single_qudit() -> Result<(), Box<dyn std::error::Error>> {
    let mut circuit = AnyonicCircuit::new(CircuitConfig::debug(1, 3))?;
    circuit.initialize(InitialState::Index(2))?;
    circuit.braid_sequence(&SEQUENCE)?;
    circuit.measure()?;

    println!("Braid word: {}", circuit.history().sigma_notation());
    if let Some(table) = circuit.basis(0) {
        for (index, label) in table.iter() {
            let p = circuit.statevector()[index].norm_sqr();
            println!("  |{}⟩ {}  p = {:.5}", index, label, p);
        }
    }

    let result = circuit.run_seeded(1000)?;
    println!("\n{}", result);
    if let Some(stats) = &result.statistics {
        println!("{}", stats);
    }
    Ok(())
}

fn fused_pair() -> Result<(), Box<dyn std::error::Error>> {
    let config = CircuitConfig::new(2, 3).with_layout(FusionLayout::Fused);
    let mut circuit = AnyonicCircuit::new(config)?;
    circuit.braid(1, 2)?;
    circuit.braid(3, 4)?;
    circuit.braid(2, 1)?;
    circuit.measure()?;

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let result = circuit.run(50, &mut rng)?;
    for (label, count) in &result.counts {
        println!("  {:>2} {:?}: {}", label, circuit.decode_outcome(*label)?, count);
    }
    Ok(())
}
