//! Proving and verification keys.
//!
//! The trusted-setup ceremony that produces keys is external to this crate;
//! this module holds its outputs and makes them available read-only to
//! concurrent proof operations. `CircuitKeys::generate` is a local stand-in
//! for the ceremony, suitable for development and tests; deployments load
//! persisted parameters and never re-derive them.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use bellman::groth16::{self, Parameters, PreparedVerifyingKey};
use bls12_381::{Bls12, Scalar};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::aggregation::FlagAggregationCircuit;
use crate::error::Error;
use crate::threshold::ThresholdCircuit;

/// Identifies a predicate family and arity. Circuits are fixed at definition
/// time, so a key pair is bound to exactly one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum PredicateKind {
    Threshold,
    FlagAggregation { flag_count: usize },
}

impl PredicateKind {
    /// Stable identifier binding keys and artifacts to a circuit.
    pub fn circuit_id(&self) -> String {
        match self {
            Self::Threshold => "threshold".to_string(),
            Self::FlagAggregation { flag_count } => format!("flag_aggregation_n{}", flag_count),
        }
    }

    /// Declared public-input arity: the validity signal plus one bound.
    pub fn public_input_arity(&self) -> usize {
        2
    }
}

/// Keys for one circuit: the proving parameters and the prepared
/// verification key derived from them.
pub struct CircuitKeys {
    kind: PredicateKind,
    params: Parameters<Bls12>,
    pvk: PreparedVerifyingKey<Bls12>,
}

impl core::fmt::Debug for CircuitKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // `Parameters`/`PreparedVerifyingKey` don't implement `Debug`.
        f.debug_struct("CircuitKeys")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl CircuitKeys {
    /// Run a local setup for `kind`. Stands in for the external ceremony.
    pub fn generate<R: RngCore>(kind: PredicateKind, rng: &mut R) -> Result<Self, Error> {
        tracing::info!(circuit = %kind.circuit_id(), "generating circuit parameters");
        let params = match kind {
            PredicateKind::Threshold => groth16::generate_random_parameters::<Bls12, _, _>(
                ThresholdCircuit::<Scalar>::empty(),
                rng,
            ),
            PredicateKind::FlagAggregation { flag_count } => {
                groth16::generate_random_parameters::<Bls12, _, _>(
                    FlagAggregationCircuit::<Scalar>::empty(flag_count),
                    rng,
                )
            }
        }
        .map_err(|e| Error::Synthesis(e.to_string()))?;

        let pvk = groth16::prepare_verifying_key(&params.vk);
        Ok(Self { kind, params, pvk })
    }

    pub fn kind(&self) -> PredicateKind {
        self.kind
    }

    pub fn params(&self) -> &Parameters<Bls12> {
        &self.params
    }

    pub fn prepared_vk(&self) -> &PreparedVerifyingKey<Bls12> {
        &self.pvk
    }

    /// Persist the proving parameters; the verification key is embedded.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        self.params.write(&mut writer)?;
        Ok(())
    }

    /// Load parameters previously written for `kind`, with group checks.
    pub fn read<R: Read>(kind: PredicateKind, mut reader: R) -> Result<Self, Error> {
        let params = Parameters::read(&mut reader, true)
            .map_err(|e| Error::MalformedArtifact(format!("unreadable parameters: {}", e)))?;
        let pvk = groth16::prepare_verifying_key(&params.vk);
        Ok(Self { kind, params, pvk })
    }
}

/// The fixed set of circuit keys for a deployment: loaded once, immutable,
/// shared read-only across concurrent proof operations.
pub struct KeyStore {
    keys: BTreeMap<PredicateKind, CircuitKeys>,
}

impl KeyStore {
    pub fn new(keys: impl IntoIterator<Item = CircuitKeys>) -> Self {
        Self {
            keys: keys.into_iter().map(|k| (k.kind(), k)).collect(),
        }
    }

    /// Keys for the standard submission set: the threshold circuit plus the
    /// two fixed aggregation arities.
    pub fn generate_standard<R: RngCore>(rng: &mut R) -> Result<Self, Error> {
        let kinds = [
            PredicateKind::Threshold,
            PredicateKind::FlagAggregation { flag_count: 5 },
            PredicateKind::FlagAggregation { flag_count: 8 },
        ];
        let mut keys = BTreeMap::new();
        for kind in kinds {
            keys.insert(kind, CircuitKeys::generate(kind, rng)?);
        }
        Ok(Self { keys })
    }

    pub fn get(&self, kind: PredicateKind) -> Result<&CircuitKeys, Error> {
        self.keys.get(&kind).ok_or_else(|| {
            Error::KeyMismatch(format!("no keys loaded for circuit '{}'", kind.circuit_id()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn circuit_ids_are_stable() {
        assert_eq!(PredicateKind::Threshold.circuit_id(), "threshold");
        assert_eq!(
            PredicateKind::FlagAggregation { flag_count: 8 }.circuit_id(),
            "flag_aggregation_n8"
        );
    }

    #[test]
    fn parameters_round_trip() {
        let kind = PredicateKind::FlagAggregation { flag_count: 2 };
        let keys = CircuitKeys::generate(kind, &mut OsRng).unwrap();

        let mut buf = Vec::new();
        keys.write(&mut buf).unwrap();
        let restored = CircuitKeys::read(kind, &buf[..]).unwrap();
        assert_eq!(restored.kind(), kind);

        let mut original_vk = Vec::new();
        keys.params().vk.write(&mut original_vk).unwrap();
        let mut restored_vk = Vec::new();
        restored.params().vk.write(&mut restored_vk).unwrap();
        assert_eq!(original_vk, restored_vk);
    }

    #[test]
    fn missing_key_is_a_mismatch() {
        let store = KeyStore::new([]);
        let err = store.get(PredicateKind::Threshold).unwrap_err();
        assert!(matches!(err, Error::KeyMismatch(_)));
    }
}
