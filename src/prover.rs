//! Proof lifecycle orchestration.
//!
//! Drives generation and verification for one claim against fixed keys.
//! Generation is the only rejection path for a non-compliant claim: inputs
//! that cannot satisfy the hard constraints produce no artifact at all.
//! Verification is pure and side-effect-free; it returns false for any
//! tampered proof, mismatched public inputs, or wrong key, and true only for
//! a proof derived from a genuine satisfying witness under the matching key.

use bellman::groth16;
use bellman::SynthesisError;
use bls12_381::Scalar;
use ff::PrimeField;
use rand::rngs::OsRng;
use rayon::prelude::*;

use crate::aggregation::FlagAggregationCircuit;
use crate::artifact::{encode_proof, parse_field, ClaimDescriptor, ClaimProof};
use crate::error::Error;
use crate::keys::{KeyStore, PredicateKind};
use crate::threshold::ThresholdCircuit;

/// Inputs for one claim, before they become circuit signals.
#[derive(Clone, Debug)]
pub enum ProofRequest {
    /// Prove the private `value` is strictly below the public `threshold`.
    /// Both are decimal field-element strings; only the threshold is ever
    /// revealed.
    Threshold { value: String, threshold: String },
    /// Prove at least `min_required` of the private flags are set. Flags are
    /// carried raw; a value outside {0, 1} is rejected by the circuit at
    /// witness construction, not here.
    Flags { flags: Vec<u8>, min_required: u64 },
}

impl ProofRequest {
    pub fn predicate(&self) -> PredicateKind {
        match self {
            Self::Threshold { .. } => PredicateKind::Threshold,
            Self::Flags { flags, .. } => PredicateKind::FlagAggregation {
                flag_count: flags.len(),
            },
        }
    }
}

/// One planned claim of a submission cycle: stable id, human label, inputs.
#[derive(Clone, Debug)]
pub struct ClaimPlan {
    pub claim_id: String,
    pub label: String,
    pub request: ProofRequest,
}

/// Generate a proof for one claim.
///
/// Fails with `ConstraintUnsatisfiable` whenever the inputs cannot satisfy
/// the circuit, which is how a compliance failure becomes observable. The
/// error names the claim, never the private values.
pub fn prove(keys: &KeyStore, plan: &ClaimPlan) -> Result<ClaimProof, Error> {
    let kind = plan.request.predicate();
    let circuit_keys = keys.get(kind)?;
    tracing::debug!(claim = %plan.claim_id, circuit = %kind.circuit_id(), "generating proof");

    let (proof, public_input_vector) = match &plan.request {
        ProofRequest::Threshold { value, threshold } => {
            let value = parse_private_field(value)?;
            let threshold_fe = parse_field(threshold)?;
            let circuit = ThresholdCircuit::new(value, threshold_fe);
            let proof = groth16::create_random_proof(circuit, circuit_keys.params(), &mut OsRng)
                .map_err(|e| generation_error(e, &plan.claim_id))?;
            (proof, vec!["1".to_string(), threshold.clone()])
        }
        ProofRequest::Flags {
            flags,
            min_required,
        } => {
            let flags: Vec<Scalar> = flags.iter().map(|&f| Scalar::from(u64::from(f))).collect();
            let circuit = FlagAggregationCircuit::new(flags, Scalar::from(*min_required));
            let proof = groth16::create_random_proof(circuit, circuit_keys.params(), &mut OsRng)
                .map_err(|e| generation_error(e, &plan.claim_id))?;
            (proof, vec!["1".to_string(), min_required.to_string()])
        }
    };

    Ok(ClaimProof {
        proof: encode_proof(&proof)?,
        public_input_vector,
        descriptor: ClaimDescriptor {
            label: plan.label.clone(),
            predicate: kind,
        },
    })
}

/// Generate proofs for independent claims concurrently. Each failure aborts
/// only its own member; whether to abort the whole submission or proceed
/// with a smaller composite is the caller's decision.
pub fn prove_all(keys: &KeyStore, plans: &[ClaimPlan]) -> Vec<Result<ClaimProof, Error>> {
    plans.par_iter().map(|plan| prove(keys, plan)).collect()
}

/// Pure verification of a persisted claim against the loaded keys.
///
/// Returns `Ok(false)` for a decodable proof that fails the check.
/// Schema violations are `MalformedArtifact`; a key/arity disagreement is
/// `KeyMismatch`.
pub fn verify(keys: &KeyStore, claim: &ClaimProof) -> Result<bool, Error> {
    let kind = claim.descriptor.predicate;
    let circuit_keys = keys.get(kind)?;

    let expected_arity = kind.public_input_arity();
    if claim.public_input_vector.len() != expected_arity {
        return Err(Error::KeyMismatch(format!(
            "circuit '{}' declares {} public inputs, artifact carries {}",
            kind.circuit_id(),
            expected_arity,
            claim.public_input_vector.len()
        )));
    }

    let public_inputs = claim.decode_public_inputs()?;
    let proof = claim.decode_proof()?;

    match groth16::verify_proof(circuit_keys.prepared_vk(), &proof, &public_inputs) {
        Ok(()) => Ok(true),
        Err(bellman::VerificationError::InvalidProof) => {
            tracing::debug!(circuit = %kind.circuit_id(), "proof failed verification");
            Ok(false)
        }
        Err(bellman::VerificationError::InvalidVerifyingKey) => Err(Error::KeyMismatch(
            "public input count does not match the verification key".into(),
        )),
    }
}

/// Like [`verify`], but a failed check is an error.
pub fn ensure_valid(keys: &KeyStore, claim: &ClaimProof) -> Result<(), Error> {
    if verify(keys, claim)? {
        Ok(())
    } else {
        Err(Error::VerificationRejected)
    }
}

fn generation_error(err: SynthesisError, claim_id: &str) -> Error {
    match err {
        SynthesisError::Unsatisfiable => Error::ConstraintUnsatisfiable {
            claim: claim_id.to_string(),
        },
        other => Error::Synthesis(other.to_string()),
    }
}

/// Parse a private witness value, deliberately reporting nothing about it.
fn parse_private_field(s: &str) -> Result<Scalar, Error> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedPolicy(
            "private input is not a decimal field element".into(),
        ));
    }
    Scalar::from_str_vartime(s).ok_or_else(|| {
        Error::MalformedPolicy("private input is not a decimal field element".into())
    })
}
