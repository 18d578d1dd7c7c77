//! Policy pack mapping.
//!
//! A policy pack is the declarative description of a regulatory framework:
//! named requirements with public thresholds and counts, plus the claimant's
//! private inputs. This module is the only sanctioned path from that text
//! into the cryptographic system: every provable claim must first reduce to
//! a threshold comparison or a k-of-N flag aggregation. It also binds the
//! circuits' positional signals back to human-readable claim labels.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::prover::{ClaimPlan, ProofRequest};

/// Claim ids are stable across submission cycles so verifiers can correlate
/// artifacts with requirements.
pub const COMPUTE_CLAIM_ID: &str = "compute_threshold";
pub const EVALUATIONS_CLAIM_ID: &str = "required_evaluations";
pub const CHECKLIST_CLAIM_ID: &str = "policy_checklist";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyPack {
    pub id: String,
    pub title: String,
    pub compute_threshold: ThresholdRequirement,
    pub required_evaluations: EvaluationRequirement,
    pub policy_checklist: ChecklistRequirement,
    pub private_inputs: PrivateInputs,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThresholdRequirement {
    /// Decimal field-element string; public.
    pub public_threshold: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationRequirement {
    pub n: usize,
    pub required_count: u64,
    pub names: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChecklistRequirement {
    pub n: usize,
    pub min_required: u64,
    pub items: Vec<String>,
}

/// The claimant's side of the pack. Never serialized into any artifact.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrivateInputs {
    /// Decimal field-element string.
    pub compute_value: String,
    /// One 0/1 entry per named evaluation.
    pub evaluations: Vec<u8>,
    /// One 0/1 entry per checklist item.
    pub checklist: Vec<u8>,
}

/// Bind a policy pack to the positional inputs of the predicate circuits:
/// one threshold claim and two flag-aggregation claims, each carrying the
/// label its public signals will be reported under.
pub fn claim_plans(pack: &PolicyPack) -> Result<Vec<ClaimPlan>, Error> {
    validate(pack)?;

    Ok(vec![
        ClaimPlan {
            claim_id: COMPUTE_CLAIM_ID.into(),
            label: format!(
                "{}: compute below threshold {}",
                pack.title, pack.compute_threshold.public_threshold
            ),
            request: ProofRequest::Threshold {
                value: pack.private_inputs.compute_value.clone(),
                threshold: pack.compute_threshold.public_threshold.clone(),
            },
        },
        ClaimPlan {
            claim_id: EVALUATIONS_CLAIM_ID.into(),
            label: format!(
                "{}: {} of {} required evaluations met",
                pack.title,
                pack.required_evaluations.required_count,
                pack.required_evaluations.n
            ),
            request: ProofRequest::Flags {
                flags: pack.private_inputs.evaluations.clone(),
                min_required: pack.required_evaluations.required_count,
            },
        },
        ClaimPlan {
            claim_id: CHECKLIST_CLAIM_ID.into(),
            label: format!(
                "{}: {} of {} checklist items met",
                pack.title, pack.policy_checklist.min_required, pack.policy_checklist.n
            ),
            request: ProofRequest::Flags {
                flags: pack.private_inputs.checklist.clone(),
                min_required: pack.policy_checklist.min_required,
            },
        },
    ])
}

/// Shape validation only. Whether the private inputs actually satisfy the
/// predicates is decided by the circuits; a flag outside {0, 1} in
/// particular is rejected there, at witness construction.
fn validate(pack: &PolicyPack) -> Result<(), Error> {
    let evals = &pack.required_evaluations;
    if evals.n == 0 || evals.n >= 256 {
        return Err(Error::MalformedPolicy(
            "evaluation count must be between 1 and 255".into(),
        ));
    }
    if evals.names.len() != evals.n {
        return Err(Error::MalformedPolicy(format!(
            "expected {} evaluation names, got {}",
            evals.n,
            evals.names.len()
        )));
    }
    if evals.required_count as usize > evals.n {
        return Err(Error::MalformedPolicy(
            "required evaluation count exceeds the number of evaluations".into(),
        ));
    }
    if pack.private_inputs.evaluations.len() != evals.n {
        return Err(Error::MalformedPolicy(format!(
            "expected {} evaluation flags, got {}",
            evals.n,
            pack.private_inputs.evaluations.len()
        )));
    }

    let checklist = &pack.policy_checklist;
    if checklist.n == 0 || checklist.n >= 256 {
        return Err(Error::MalformedPolicy(
            "checklist length must be between 1 and 255".into(),
        ));
    }
    if checklist.items.len() != checklist.n {
        return Err(Error::MalformedPolicy(format!(
            "expected {} checklist items, got {}",
            checklist.n,
            checklist.items.len()
        )));
    }
    if checklist.min_required as usize > checklist.n {
        return Err(Error::MalformedPolicy(
            "checklist minimum exceeds the number of items".into(),
        ));
    }
    if pack.private_inputs.checklist.len() != checklist.n {
        return Err(Error::MalformedPolicy(format!(
            "expected {} checklist flags, got {}",
            checklist.n,
            pack.private_inputs.checklist.len()
        )));
    }

    Ok(())
}
