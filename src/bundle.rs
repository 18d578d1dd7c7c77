//! Composite proof bundling for one submission cycle.
//!
//! A composite is a tagged collection of independently-generated proofs plus
//! submission metadata. Verification is the logical AND of independent
//! per-member verification, so cost scales linearly with the member count.
//! There is no cryptographic aggregation here, and bundling must not be
//! upgraded into a succinct aggregate without re-deriving soundness and
//! zero-knowledge from scratch.
//!
//! Atomicity is a policy-level convention: nothing stops a submitter from
//! building a composite that omits a claim whose generation failed. That
//! completeness gap is inherent to self-reported proofs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::artifact::{ClaimDescriptor, ClaimProof};
use crate::error::Error;
use crate::keys::{KeyStore, PredicateKind};
use crate::prover;

pub const COMPOSITE_VERSION: u32 = 1;

/// One member of a composite: a claim's proof, public inputs, and labels.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundledClaim {
    pub proof: String,
    pub public_input_vector: Vec<String>,
    pub label: String,
    pub predicate: PredicateKind,
}

impl BundledClaim {
    fn to_claim_proof(&self) -> ClaimProof {
        ClaimProof {
            proof: self.proof.clone(),
            public_input_vector: self.public_input_vector.clone(),
            descriptor: ClaimDescriptor {
                label: self.label.clone(),
                predicate: self.predicate,
            },
        }
    }
}

/// A submission-cycle artifact: claim proofs keyed by claim id, plus
/// metadata. Created once per cycle and only ever re-verified afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeArtifact {
    pub version: u32,
    pub timestamp: DateTime<Utc>,
    pub submitter: String,
    pub framework: String,
    pub claims: BTreeMap<String, BundledClaim>,
}

/// Per-member verification outcomes and their conjunction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeVerification {
    /// True iff every member independently verified.
    pub valid: bool,
    pub members: BTreeMap<String, bool>,
}

impl CompositeArtifact {
    /// Bundle independently-generated claim proofs for one submission cycle.
    pub fn bundle(
        submitter: impl Into<String>,
        framework: impl Into<String>,
        claims: impl IntoIterator<Item = (String, ClaimProof)>,
    ) -> Self {
        let claims = claims
            .into_iter()
            .map(|(id, claim)| {
                (
                    id,
                    BundledClaim {
                        proof: claim.proof,
                        public_input_vector: claim.public_input_vector,
                        label: claim.descriptor.label,
                        predicate: claim.descriptor.predicate,
                    },
                )
            })
            .collect();

        Self {
            version: COMPOSITE_VERSION,
            timestamp: Utc::now(),
            submitter: submitter.into(),
            framework: framework.into(),
            claims,
        }
    }

    /// Verify every member independently, in parallel. The composite is
    /// valid iff all members verify; a malformed or tampered member reports
    /// as invalid without aborting verification of the others.
    pub fn verify(&self, keys: &KeyStore) -> CompositeVerification {
        let members: BTreeMap<String, bool> = self
            .claims
            .par_iter()
            .map(|(id, member)| {
                let valid = matches!(prover::verify(keys, &member.to_claim_proof()), Ok(true));
                if !valid {
                    tracing::debug!(claim = %id, "composite member failed verification");
                }
                (id.clone(), valid)
            })
            .collect();

        let valid = !members.is_empty() && members.values().all(|&v| v);
        CompositeVerification { valid, members }
    }

    /// Schema checks that require no keys.
    pub fn validate(&self) -> Result<(), Error> {
        if self.version != COMPOSITE_VERSION {
            return Err(Error::MalformedArtifact(format!(
                "unsupported composite version {}",
                self.version
            )));
        }
        if self.claims.is_empty() {
            return Err(Error::MalformedArtifact("composite carries no claims".into()));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let artifact: Self = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }
}
