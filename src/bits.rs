//! Bit-Decomposition Primitive
//!
//! Reconstructs a field value from boolean-constrained bits:
//! - each bit satisfies bit * (1 - bit) = 0
//! - sum(bit_i * 2^i) recomposes exactly to the value
//!
//! A value that needs more than `num_bits` bits has no satisfying bit
//! assignment, so synthesis rejects it at witness-construction time. That is
//! the rejection path for out-of-range values: generation fails, no proof is
//! ever produced, and verification never sees the case.

use bellman::{ConstraintSystem, LinearCombination, SynthesisError, Variable};
use ff::PrimeField;

/// Widest supported decomposition. The BLS12-381 scalar field is 255 bits;
/// 252 leaves headroom so comparator sums of the form a + 2^n - b cannot wrap.
pub const MAX_DECOMPOSITION_BITS: usize = 252;

/// Allocate a variable constrained to {0, 1}.
pub fn alloc_bit<S, CS>(mut cs: CS, value: Option<bool>) -> Result<Variable, SynthesisError>
where
    S: PrimeField,
    CS: ConstraintSystem<S>,
{
    let var = cs.alloc(
        || "bit",
        || {
            value
                .map(|b| if b { S::ONE } else { S::ZERO })
                .ok_or(SynthesisError::AssignmentMissing)
        },
    )?;

    // bit * (1 - bit) = 0
    cs.enforce(
        || "bit is boolean",
        |lc| lc + var,
        |lc| lc + CS::one() - var,
        |lc| lc,
    );

    Ok(var)
}

/// True if no bit at position `num_bits` or above is set in the canonical
/// little-endian representation of `value`.
pub fn fits_in_bits<S: PrimeField>(value: &S, num_bits: usize) -> bool {
    let repr = value.to_repr();
    let bytes = repr.as_ref();
    for (byte_index, byte) in bytes.iter().enumerate() {
        for bit_index in 0..8 {
            if byte_index * 8 + bit_index >= num_bits && (byte >> bit_index) & 1 == 1 {
                return false;
            }
        }
    }
    true
}

/// Bit `position` of a field element's canonical representation.
pub(crate) fn bit_at<S: PrimeField>(value: &S, position: usize) -> bool {
    let repr = value.to_repr();
    let bytes = repr.as_ref();
    let byte = bytes.get(position / 8).copied().unwrap_or(0);
    (byte >> (position % 8)) & 1 == 1
}

/// Decompose an already-allocated value into `num_bits` boolean-constrained
/// bits and enforce that they recompose to it exactly.
///
/// Returns `SynthesisError::Unsatisfiable` if the witness value does not fit
/// in `num_bits` bits: no bit assignment could satisfy the recomposition
/// constraint, so synthesis stops before a prover can emit anything.
pub fn decompose_allocated<S, CS>(
    mut cs: CS,
    value_var: Variable,
    value: Option<S>,
    num_bits: usize,
) -> Result<Vec<Variable>, SynthesisError>
where
    S: PrimeField,
    CS: ConstraintSystem<S>,
{
    // Comparators decompose num_bits + 1 bits of a shifted sum.
    assert!(
        num_bits <= MAX_DECOMPOSITION_BITS + 1,
        "decomposition wider than the field's safe range"
    );

    if let Some(v) = value.as_ref() {
        if !fits_in_bits(v, num_bits) {
            return Err(SynthesisError::Unsatisfiable);
        }
    }

    let mut bits = Vec::with_capacity(num_bits);
    let mut recomposition = LinearCombination::<S>::zero();
    let mut coeff = S::ONE;

    for i in 0..num_bits {
        let bit_value = value.as_ref().map(|v| bit_at(v, i));
        let bit = alloc_bit(cs.namespace(|| format!("bit {}", i)), bit_value)?;
        bits.push(bit);

        recomposition = recomposition + (coeff, bit);
        coeff = coeff.double();
    }

    // sum(bit_i * 2^i) = value
    cs.enforce(
        || "recomposition",
        |lc| lc + CS::one(),
        |lc| lc + value_var,
        |_| recomposition,
    );

    Ok(bits)
}
