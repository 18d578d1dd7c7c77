//! Strict Comparator
//!
//! Tests `a < b` for values bounded to n bits by decomposing the shifted sum
//! s = a + 2^n - b into n + 1 bits. Bit n of s is 0 exactly when a < b, so
//! the output is 1 - bit_n. Equality yields 0 (strict, not <=). A
//! greater-or-equal test is the complement.
//!
//! Both operands must already be bounded to n bits by the caller; otherwise
//! the shifted sum can wrap and the comparison is meaningless. The predicate
//! circuits range-bound their private inputs before comparing.

use bellman::{ConstraintSystem, SynthesisError, Variable};
use ff::PrimeField;

use crate::bits::{self, decompose_allocated};

/// 2^n as a field element.
pub(crate) fn pow2<S: PrimeField>(n: usize) -> S {
    let mut value = S::ONE;
    for _ in 0..n {
        value = value.double();
    }
    value
}

/// A comparator output: the allocated 0/1 signal and its witness value.
#[derive(Clone, Copy, Debug)]
pub struct Comparison {
    pub out: Variable,
    pub value: Option<bool>,
}

/// out = 1 iff a < b, for a and b bounded to `num_bits` bits.
pub fn less_than<S, CS>(
    mut cs: CS,
    a: Variable,
    b: Variable,
    a_value: Option<S>,
    b_value: Option<S>,
    num_bits: usize,
) -> Result<Comparison, SynthesisError>
where
    S: PrimeField,
    CS: ConstraintSystem<S>,
{
    assert!(num_bits <= bits::MAX_DECOMPOSITION_BITS);

    let offset = pow2::<S>(num_bits);
    let shifted_value = match (a_value, b_value) {
        (Some(a), Some(b)) => Some(a + offset - b),
        _ => None,
    };

    let shifted = cs.alloc(
        || "shifted",
        || shifted_value.ok_or(SynthesisError::AssignmentMissing),
    )?;

    // shifted = a + 2^n - b
    cs.enforce(
        || "shifted difference",
        |lc| lc + CS::one(),
        |lc| lc + shifted,
        |lc| lc + a + (offset, CS::one()) - b,
    );

    let shifted_bits = decompose_allocated(
        cs.namespace(|| "shifted bits"),
        shifted,
        shifted_value,
        num_bits + 1,
    )?;
    let top_bit = shifted_bits[num_bits];

    let out_value = shifted_value.map(|s| !bits::bit_at(&s, num_bits));
    let out = cs.alloc(
        || "less than",
        || {
            out_value
                .map(|b| if b { S::ONE } else { S::ZERO })
                .ok_or(SynthesisError::AssignmentMissing)
        },
    )?;

    // out = 1 - bit_n
    cs.enforce(
        || "out complements top bit",
        |lc| lc + CS::one(),
        |lc| lc + out,
        |lc| lc + CS::one() - top_bit,
    );

    Ok(Comparison {
        out,
        value: out_value,
    })
}

/// out = 1 iff a >= b, derived as 1 - less_than(a, b).
pub fn greater_or_equal<S, CS>(
    mut cs: CS,
    a: Variable,
    b: Variable,
    a_value: Option<S>,
    b_value: Option<S>,
    num_bits: usize,
) -> Result<Comparison, SynthesisError>
where
    S: PrimeField,
    CS: ConstraintSystem<S>,
{
    let lt = less_than(
        cs.namespace(|| "less than"),
        a,
        b,
        a_value,
        b_value,
        num_bits,
    )?;

    let out_value = lt.value.map(|b| !b);
    let out = cs.alloc(
        || "greater or equal",
        || {
            out_value
                .map(|b| if b { S::ONE } else { S::ZERO })
                .ok_or(SynthesisError::AssignmentMissing)
        },
    )?;

    cs.enforce(
        || "out complements less than",
        |lc| lc + CS::one(),
        |lc| lc + out,
        |lc| lc + CS::one() - lt.out,
    );

    Ok(Comparison {
        out,
        value: out_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bellman::gadgets::test::TestConstraintSystem;
    use bls12_381::Scalar;
    use ff::Field;

    fn compare(a: u64, b: u64, num_bits: usize) -> Option<bool> {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        let a_value = Scalar::from(a);
        let b_value = Scalar::from(b);
        let a_var = cs.alloc(|| "a", || Ok(a_value)).unwrap();
        let b_var = cs.alloc(|| "b", || Ok(b_value)).unwrap();

        let cmp = less_than(
            cs.namespace(|| "cmp"),
            a_var,
            b_var,
            Some(a_value),
            Some(b_value),
            num_bits,
        )
        .unwrap();

        assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
        cmp.value
    }

    #[test]
    fn less_than_strict_ordering() {
        assert_eq!(compare(3, 5, 8), Some(true));
        assert_eq!(compare(5, 3, 8), Some(false));
        // equality is not less-than
        assert_eq!(compare(5, 5, 8), Some(false));
        assert_eq!(compare(0, 1, 8), Some(true));
        assert_eq!(compare(0, 0, 8), Some(false));
    }

    #[test]
    fn less_than_at_width_boundary() {
        assert_eq!(compare(254, 255, 8), Some(true));
        assert_eq!(compare(255, 254, 8), Some(false));
    }

    #[test]
    fn greater_or_equal_is_complement() {
        let cases = [(5u64, 3u64, true), (3, 5, false), (4, 4, true)];
        for (a, b, expected) in cases {
            let mut cs = TestConstraintSystem::<Scalar>::new();
            let a_value = Scalar::from(a);
            let b_value = Scalar::from(b);
            let a_var = cs.alloc(|| "a", || Ok(a_value)).unwrap();
            let b_var = cs.alloc(|| "b", || Ok(b_value)).unwrap();

            let cmp = greater_or_equal(
                cs.namespace(|| "cmp"),
                a_var,
                b_var,
                Some(a_value),
                Some(b_value),
                8,
            )
            .unwrap();

            assert!(cs.is_satisfied());
            assert_eq!(cmp.value, Some(expected), "{} >= {}", a, b);
        }
    }

    #[test]
    fn wide_comparison_stays_satisfiable() {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        let a_value = Scalar::from(u64::MAX);
        let b_value = Scalar::from(u64::MAX) + Scalar::ONE;
        let a_var = cs.alloc(|| "a", || Ok(a_value)).unwrap();
        let b_var = cs.alloc(|| "b", || Ok(b_value)).unwrap();

        let cmp = less_than(
            cs.namespace(|| "cmp"),
            a_var,
            b_var,
            Some(a_value),
            Some(b_value),
            252,
        )
        .unwrap();

        assert!(cs.is_satisfied());
        assert_eq!(cmp.value, Some(true));
        println!("252-bit comparator: {} constraints", cs.num_constraints());
    }
}
