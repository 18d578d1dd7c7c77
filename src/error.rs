//! Error taxonomy for proof generation, verification, and bundling.
//!
//! None of these are retried anywhere: retrying cannot turn a false claim
//! into a true one. No variant ever carries numeric detail about private
//! inputs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The private inputs cannot satisfy the circuit's hard constraints.
    /// This is the only way a compliance failure becomes observable, and it
    /// identifies the claim, never the private values behind it.
    #[error("claim '{claim}' has no satisfying witness")]
    ConstraintUnsatisfiable { claim: String },

    /// A well-formed proof failed the verification check against the given
    /// public inputs and key.
    #[error("proof rejected by verification")]
    VerificationRejected,

    /// A persisted proof, public-signal vector, or composite object violates
    /// its schema.
    #[error("malformed artifact: {0}")]
    MalformedArtifact(String),

    /// Verification attempted with a key not produced for the circuit that
    /// generated the proof.
    #[error("key mismatch: {0}")]
    KeyMismatch(String),

    /// A policy pack fails shape validation before it reaches any circuit.
    #[error("malformed policy pack: {0}")]
    MalformedPolicy(String),

    /// The proving engine failed for a reason other than unsatisfiability.
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
