//! Generation stages, run in dependency order by [`crate::dataset`].
//!
//! Every stage takes its generator explicitly. [`stage_rng`] derives one
//! independent stream per stage from the run seed, so a stage's draws do not
//! shift when another stage changes.

pub mod finance;
pub mod operations;
pub mod performance;
pub mod resources;
pub mod schools;
pub mod students;
pub mod surveys;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::config::ValueRange;
use crate::errors::GenerationError;

pub fn stage_rng(seed: u64, stage: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(hash_seed(seed, stage))
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Random (version 4) UUID drawn from the stage generator.
pub fn next_uuid(rng: &mut impl RngCore) -> Uuid {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Uuid::from_bytes(bytes)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub(crate) fn sample(range: ValueRange, rng: &mut impl Rng) -> f64 {
    rng.random_range(range.min..=range.max)
}

pub(crate) fn pick<'a, T>(values: &'a [T], rng: &mut impl Rng) -> Option<&'a T> {
    if values.is_empty() {
        return None;
    }
    values.get(rng.random_range(0..values.len()))
}

pub(crate) fn pick_required<'a, T>(
    values: &'a [T],
    what: &str,
    rng: &mut impl Rng,
) -> Result<&'a T, GenerationError> {
    pick(values, rng)
        .ok_or_else(|| GenerationError::InvalidConfig(format!("{what} list is empty")))
}
