//! Flag-Aggregation Predicate Circuit
//!
//! Proves that at least k of N private boolean flags are set, without
//! revealing which. The flag count is baked into the circuit at definition
//! time; two deployment instances fix N=5 and N=8.
//!
//! Public signals, in declaration order:
//! - validity: hard-constrained to the constant 1
//! - min_required: the public minimum k
//!
//! k < N expresses partial-credit policies and k = N all-required policies,
//! with no circuit change. As with the threshold circuit, the validity signal
//! is forced to 1: a flag set falling short of k admits no witness, so proof
//! generation fails outright.

use bellman::{Circuit, ConstraintSystem, SynthesisError};
use ff::PrimeField;

use crate::comparator;

/// Comparator width for the flag sum. Caps N and k below 256; widening it is
/// a circuit change, not a parameter change.
pub const SUM_BITS: usize = 8;

#[derive(Clone, Debug)]
pub struct FlagAggregationCircuit<S: PrimeField> {
    flag_count: usize,
    /// Private flags, each expected in {0, 1}.
    pub flags: Option<Vec<S>>,
    /// Public minimum number of set flags.
    pub min_required: Option<S>,
}

impl<S: PrimeField> FlagAggregationCircuit<S> {
    pub fn new(flags: Vec<S>, min_required: S) -> Self {
        let flag_count = flags.len();
        assert!(
            flag_count > 0 && flag_count < 256,
            "flag count must fit the 8-bit sum comparator"
        );
        Self {
            flag_count,
            flags: Some(flags),
            min_required: Some(min_required),
        }
    }

    /// Witness-free instance of the given arity for key generation.
    pub fn empty(flag_count: usize) -> Self {
        assert!(
            flag_count > 0 && flag_count < 256,
            "flag count must fit the 8-bit sum comparator"
        );
        Self {
            flag_count,
            flags: None,
            min_required: None,
        }
    }

    pub fn flag_count(&self) -> usize {
        self.flag_count
    }
}

impl<S: PrimeField> Circuit<S> for FlagAggregationCircuit<S> {
    fn synthesize<CS: ConstraintSystem<S>>(self, cs: &mut CS) -> Result<(), SynthesisError> {
        // Public signals, in declaration order.
        let valid = cs.alloc_input(|| "valid", || Ok(S::ONE))?;
        let min_required = cs.alloc_input(
            || "min required",
            || self.min_required.ok_or(SynthesisError::AssignmentMissing),
        )?;

        let mut flag_vars = Vec::with_capacity(self.flag_count);
        for i in 0..self.flag_count {
            let flag_value = self.flags.as_ref().map(|f| f[i]);

            // A witness flag outside {0, 1} can never satisfy the boolean
            // constraint below.
            if let Some(v) = flag_value {
                if v != S::ZERO && v != S::ONE {
                    return Err(SynthesisError::Unsatisfiable);
                }
            }

            let flag = cs.alloc(
                || format!("flag {}", i),
                || flag_value.ok_or(SynthesisError::AssignmentMissing),
            )?;
            cs.enforce(
                || format!("flag {} is boolean", i),
                |lc| lc + flag,
                |lc| lc + CS::one() - flag,
                |lc| lc,
            );
            flag_vars.push(flag);
        }

        // Prefix sums as allocated signals: s_0 = f_0, s_i = s_{i-1} + f_i.
        // Each step adds one boolean flag, so the running sum is monotonic
        // non-decreasing and bounded by the flag count.
        let mut sum_var = flag_vars[0];
        let mut sum_value = self.flags.as_ref().map(|f| f[0]);
        for i in 1..self.flag_count {
            let flag_value = self.flags.as_ref().map(|f| f[i]);
            let next_value = match (sum_value, flag_value) {
                (Some(s), Some(f)) => Some(s + f),
                _ => None,
            };
            let next = cs.alloc(
                || format!("prefix sum {}", i),
                || next_value.ok_or(SynthesisError::AssignmentMissing),
            )?;
            cs.enforce(
                || format!("prefix sum {} accumulates", i),
                |lc| lc + CS::one(),
                |lc| lc + next,
                |lc| lc + sum_var + flag_vars[i],
            );
            sum_var = next;
            sum_value = next_value;
        }

        let cmp = comparator::greater_or_equal(
            cs.namespace(|| "sum meets minimum"),
            sum_var,
            min_required,
            sum_value,
            self.min_required,
            SUM_BITS,
        )?;

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

        if cmp.value == Some(false) {
            return Err(SynthesisError::Unsatisfiable);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bellman::gadgets::test::TestConstraintSystem;
    use bls12_381::Scalar;

    fn circuit(flags: &[u64], min_required: u64) -> FlagAggregationCircuit<Scalar> {
        FlagAggregationCircuit::new(
            flags.iter().map(|&f| Scalar::from(f)).collect(),
            Scalar::from(min_required),
        )
    }

    #[test]
    fn all_flags_set_meets_all_required() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        circuit(&[1, 1, 1, 1, 1], 5).synthesize(&mut cs).unwrap();
        assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
        println!("aggregation N=5: {} constraints", cs.num_constraints());
    }

    #[test]
    fn one_missing_flag_fails_all_required() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        let result = circuit(&[1, 1, 1, 0, 1], 5).synthesize(&mut cs);
        assert!(matches!(result, Err(SynthesisError::Unsatisfiable)));
    }

    #[test]
    fn partial_credit_policy() {
        // 4 of 5 set, only 3 required
        let mut cs = TestConstraintSystem::<Scalar>::new();
        circuit(&[1, 0, 1, 1, 1], 3).synthesize(&mut cs).unwrap();
        assert!(cs.is_satisfied());
    }

    #[test]
    fn exact_minimum_satisfies() {
        // greater-or-equal, so sum == k passes
        let mut cs = TestConstraintSystem::<Scalar>::new();
        circuit(&[1, 1, 1, 0, 0], 3).synthesize(&mut cs).unwrap();
        assert!(cs.is_satisfied());
    }

    #[test]
    fn non_boolean_flag_is_unsatisfiable() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        let result = circuit(&[1, 2, 1, 1, 1], 3).synthesize(&mut cs);
        assert!(matches!(result, Err(SynthesisError::Unsatisfiable)));
    }

    #[test]
    fn eight_flag_instance() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        circuit(&[1, 1, 1, 1, 1, 1, 1, 1], 8)
            .synthesize(&mut cs)
            .unwrap();
        assert!(cs.is_satisfied());
        println!("aggregation N=8: {} constraints", cs.num_constraints());
    }

    #[test]
    fn single_flag_arity() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        circuit(&[1], 1).synthesize(&mut cs).unwrap();
        assert!(cs.is_satisfied());
    }

    #[test]
    #[should_panic(expected = "8-bit sum comparator")]
    fn arity_cap_is_enforced() {
        FlagAggregationCircuit::<Scalar>::empty(256);
    }
}
