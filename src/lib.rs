//! Zero-Knowledge Compliance Proofs
//!
//! This library lets a claimant prove that a private numeric or boolean
//! value satisfies a public compliance predicate (a strict threshold
//! comparison, or "at least k of N boolean requirements met") without
//! revealing the value, and lets a verifier check that proof without trust
//! in the claimant.
//!
//! Predicates are encoded so that only true predicates admit any witness:
//! each circuit hard-constrains its validity signal to the constant 1, so
//! proving a false claim is not "a proof saying false" but "no proof can be
//! produced". Proofs are Groth16 over BLS12-381; the proving engine, curve
//! arithmetic, and trusted-setup ceremony are external to this crate.
//!
//! Independently-generated proofs for one submission cycle are bundled into
//! a composite artifact that verifies iff every member verifies. Bundling is
//! a tagged collection, not cryptographic aggregation.

pub mod aggregation;
pub mod artifact;
pub mod bits;
pub mod bundle;
pub mod comparator;
pub mod error;
pub mod keys;
pub mod policy;
pub mod prover;
pub mod threshold;

pub use aggregation::FlagAggregationCircuit;
pub use artifact::{ClaimDescriptor, ClaimProof};
pub use bundle::{CompositeArtifact, CompositeVerification};
pub use error::Error;
pub use keys::{CircuitKeys, KeyStore, PredicateKind};
pub use policy::PolicyPack;
pub use prover::{ensure_valid, prove, prove_all, verify, ClaimPlan, ProofRequest};
pub use threshold::ThresholdCircuit;
