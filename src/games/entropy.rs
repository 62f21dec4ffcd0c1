//! Outcome generation over an injectable entropy source
//!
//! Production play draws from the operating-system CSPRNG. Tests and
//! reproducible simulations swap in a seeded or scripted source without
//! touching the engine logic.

use crate::errors::{EngineError, EngineResult};
use crate::games::types::Side;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_core::OsRng;

/// 2^32, maps a `u32` draw onto `[0, 1)`
const U32_RANGE: f64 = 4_294_967_296.0;

/// Capability that yields uniform values in `[0, 1)`
pub trait EntropySource {
    fn next_unit(&mut self) -> EngineResult<f64>;
}

impl<E: EntropySource + ?Sized> EntropySource for &mut E {
    fn next_unit(&mut self) -> EngineResult<f64> {
        (**self).next_unit()
    }
}

/// Draw one biased outcome: `Side::A` iff the draw is strictly below `bias`
pub fn generate_outcome<E: EntropySource + ?Sized>(
    source: &mut E,
    bias: f64,
) -> EngineResult<Side> {
    let draw = source.next_unit()?;
    Ok(if draw < bias { Side::A } else { Side::B })
}

/// Operating-system CSPRNG. Stateless, so every thread can hold its own copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn next_unit(&mut self) -> EngineResult<f64> {
        let mut buf = [0u8; 4];
        OsRng.try_fill_bytes(&mut buf).map_err(|e| {
            tracing::warn!("OS entropy source failed: {}", e);
            EngineError::RandomnessUnavailable(e.to_string())
        })?;
        Ok(u32::from_le_bytes(buf) as f64 / U32_RANGE)
    }
}

/// Seeded ChaCha stream for reproducible runs
#[derive(Debug, Clone)]
pub struct SeededEntropy {
    rng: StdRng,
    draws: u64,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl EntropySource for SeededEntropy {
    fn next_unit(&mut self) -> EngineResult<f64> {
        self.draws += 1;
        Ok(self.rng.next_u32() as f64 / U32_RANGE)
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceEntropy {
    values: Vec<f64>,
    cursor: usize,
    draws: u64,
}

impl SequenceEntropy {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: 0,
            draws: 0,
        }
    }

    /// Always yields `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Draws that land on the given sides in order, for a bias of `bias`
    pub fn from_sides(sides: &[Side], bias: f64) -> Self {
        let values = sides
            .iter()
            .map(|side| match side {
                Side::A => 0.0,
                Side::B => bias,
            })
            .collect();
        Self::new(values)
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl EntropySource for SequenceEntropy {
    fn next_unit(&mut self) -> EngineResult<f64> {
        if self.values.is_empty() {
            return Err(EngineError::RandomnessUnavailable(
                "entropy sequence is empty".to_string(),
            ));
        }

        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        self.draws += 1;
        Ok(value)
    }
}
