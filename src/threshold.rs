//! Threshold Predicate Circuit
//!
//! Proves a private value is strictly below a public bound without revealing
//! the value.
//!
//! Public signals, in declaration order:
//! - validity: hard-constrained to the constant 1
//! - threshold: the public strict upper bound
//!
//! The validity signal is forced to 1 rather than exposed as a free output.
//! A witness with value >= threshold therefore satisfies nothing: proof
//! generation itself fails, and a verifier can only ever distinguish "a proof
//! exists" from "no proof was produced".

use bellman::{Circuit, ConstraintSystem, SynthesisError};
use ff::PrimeField;

use crate::{bits, comparator};

/// Comparator width. Sized to cover very large magnitudes while staying
/// inside the scalar field's safe range so the shifted sum cannot wrap.
pub const THRESHOLD_BITS: usize = 252;

#[derive(Clone, Debug)]
pub struct ThresholdCircuit<S: PrimeField> {
    /// Private value under test.
    pub value: Option<S>,
    /// Public strict upper bound.
    pub threshold: Option<S>,
}

impl<S: PrimeField> ThresholdCircuit<S> {
    pub fn new(value: S, threshold: S) -> Self {
        Self {
            value: Some(value),
            threshold: Some(threshold),
        }
    }

    /// Witness-free instance for key generation.
    pub fn empty() -> Self {
        Self {
            value: None,
            threshold: None,
        }
    }
}

impl<S: PrimeField> Circuit<S> for ThresholdCircuit<S> {
    fn synthesize<CS: ConstraintSystem<S>>(self, cs: &mut CS) -> Result<(), SynthesisError> {
        let value = cs.alloc(
            || "value",
            || self.value.ok_or(SynthesisError::AssignmentMissing),
        )?;

        // Public signals, in declaration order.
        let valid = cs.alloc_input(|| "valid", || Ok(S::ONE))?;
        let threshold = cs.alloc_input(
            || "threshold",
            || self.threshold.ok_or(SynthesisError::AssignmentMissing),
        )?;

        // Bound the private value to the comparator width. An oversized value
        // is rejected here, at witness construction.
        bits::decompose_allocated(
            cs.namespace(|| "value bits"),
            value,
            self.value,
            THRESHOLD_BITS,
        )?;

        let cmp = comparator::less_than(
            cs.namespace(|| "value below threshold"),
            value,
            threshold,
            self.value,
            self.threshold,
            THRESHOLD_BITS,
        )?;

        // valid = comparator output, and valid = 1. Only value < threshold
        // admits any witness at all.
        cs.enforce(
            || "validity binds comparator",
            |lc| lc + CS::one(),
            |lc| lc + valid,
            |lc| lc + cmp.out,
        );
        cs.enforce(
            || "validity forced to one",
            |lc| lc + CS::one(),
            |lc| lc + valid,
            |lc| lc + CS::one(),
        );

        // The constraints above cannot hold; report it now so the prover
        // fails instead of emitting an unverifiable proof.
        if cmp.value == Some(false) {
            return Err(SynthesisError::Unsatisfiable);
        }

        Ok(())
    }
}
