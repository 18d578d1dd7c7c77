//! Persisted claim artifacts.
//!
//! A proof leaves this crate as a (proof, public-input-vector, descriptor)
//! triple. The witness behind it is gone; the triple is everything a
//! verifier needs. Proof bytes are the engine's fixed 192-byte form (three
//! compressed curve-group elements), hex-encoded; public inputs are decimal
//! field-element strings in the circuit's declaration order.

use bellman::groth16::Proof;
use bls12_381::{Bls12, Scalar};
use ff::PrimeField;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::keys::PredicateKind;

/// Serialized Groth16 proof length over BLS12-381: compressed G1 + G2 + G1.
pub const PROOF_BYTES: usize = 192;

/// Human label plus predicate identifier for one proven claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDescriptor {
    pub label: String,
    pub predicate: PredicateKind,
}

/// A persisted, immutable proof of one claim.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimProof {
    /// Hex-encoded 192-byte proof.
    pub proof: String,
    /// Decimal field-element strings, one per declared public signal.
    pub public_input_vector: Vec<String>,
    pub descriptor: ClaimDescriptor,
}

impl ClaimProof {
    /// Decode the proof bytes, validating length and group encoding.
    pub fn decode_proof(&self) -> Result<Proof<Bls12>, Error> {
        let bytes = hex::decode(&self.proof)
            .map_err(|_| Error::MalformedArtifact("proof is not valid hex".into()))?;
        if bytes.len() != PROOF_BYTES {
            return Err(Error::MalformedArtifact(format!(
                "proof must be {} bytes, got {}",
                PROOF_BYTES,
                bytes.len()
            )));
        }
        Proof::read(&bytes[..])
            .map_err(|_| Error::MalformedArtifact("proof bytes are not valid group elements".into()))
    }

    /// Parse the public input vector into field elements.
    pub fn decode_public_inputs(&self) -> Result<Vec<Scalar>, Error> {
        self.public_input_vector
            .iter()
            .map(|s| parse_field(s))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Hex-encode a proof in the engine's fixed serialized form.
pub fn encode_proof(proof: &Proof<Bls12>) -> Result<String, Error> {
    let mut bytes = Vec::with_capacity(PROOF_BYTES);
    proof.write(&mut bytes)?;
    Ok(hex::encode(bytes))
}

/// Parse a decimal field-element string. Only used for public values; the
/// error repeats the input.
pub fn parse_field(s: &str) -> Result<Scalar, Error> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedArtifact(format!(
            "'{}' is not a decimal field element",
            s
        )));
    }
    Scalar::from_str_vartime(s)
        .ok_or_else(|| Error::MalformedArtifact(format!("'{}' is not a decimal field element", s)))
}
