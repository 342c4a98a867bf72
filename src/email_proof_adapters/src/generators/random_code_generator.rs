use std::sync::{Arc, Mutex, PoisonError};

use email_proof_core::{CodeGenerator, ProofCode};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn draw<R: Rng + ?Sized>(rng: &mut R) -> ProofCode {
    let value = rng.random_range(u32::from(ProofCode::MIN)..=u32::from(ProofCode::MAX));
    ProofCode::new(value).unwrap_or_else(|_| unreachable!("drawn from the proof code range"))
}

/// Draws codes from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl RandomCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> ProofCode {
        draw(&mut rand::rng())
    }
}

/// Reproducible generator; two instances with the same seed hand out the
/// same codes in the same order. Clones share one sequence.
#[derive(Debug, Clone)]
pub struct SeededCodeGenerator {
    rng: Arc<Mutex<StdRng>>,
}

impl SeededCodeGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl CodeGenerator for SeededCodeGenerator {
    fn generate(&self) -> ProofCode {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        draw(&mut *rng)
    }
}
