//! HyperLogLog sketch used by the in-memory counter store.
//!
//! Uses 2^14 one-byte registers and SipHash-2-4, matching the standard error
//! (about 0.81%) of Redis' `PFCOUNT`. Small cardinalities fall back to linear
//! counting, so a handful of distinct elements is estimated exactly in
//! practice.

use std::hash::Hasher;

use siphasher::sip::SipHasher24;

/// Number of index bits.
const PRECISION: u32 = 14;

/// Number of registers.
const REGISTER_COUNT: usize = 1 << PRECISION;

/// Approximate distinct-count sketch.
#[derive(Debug, Clone)]
pub struct HyperLogLog {
    registers: Box<[u8]>,
}

impl HyperLogLog {
    /// Creates an empty sketch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registers: vec![0; REGISTER_COUNT].into_boxed_slice(),
        }
    }

    /// Adds an element. Returns true if the sketch changed.
    pub fn insert(&mut self, element: &[u8]) -> bool {
        let hash = hash(element);
        #[allow(clippy::cast_possible_truncation)]
        let index = (hash >> (64 - PRECISION)) as usize;
        let remaining = hash << PRECISION;
        #[allow(clippy::cast_possible_truncation)]
        let rank = (remaining.leading_zeros().min(64 - PRECISION) + 1) as u8;

        if rank > self.registers[index] {
            self.registers[index] = rank;
            true
        } else {
            false
        }
    }

    /// Estimated number of distinct elements inserted.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn count(&self) -> u64 {
        let register_count = REGISTER_COUNT as f64;
        let alpha = 0.7213 / (1.0 + 1.079 / register_count);

        let (harmonic_sum, zero_registers) =
            self.registers
                .iter()
                .fold((0.0_f64, 0_usize), |(sum, zeros), &register| {
                    (
                        sum + 2.0_f64.powi(-i32::from(register)),
                        zeros + usize::from(register == 0),
                    )
                });

        let raw_estimate = alpha * register_count * register_count / harmonic_sum;

        let estimate = if raw_estimate <= 2.5 * register_count && zero_registers > 0 {
            register_count * (register_count / zero_registers as f64).ln()
        } else {
            raw_estimate
        };

        estimate.round() as u64
    }
}

impl Default for HyperLogLog {
    fn default() -> Self {
        Self::new()
    }
}

fn hash(element: &[u8]) -> u64 {
    let mut hasher = SipHasher24::new_with_key(&[0u8; 16]);
    hasher.write(element);
    hasher.finish()
}
