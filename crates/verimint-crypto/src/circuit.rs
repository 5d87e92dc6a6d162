//! The built-in query-identity circuit. It exists to exercise the proof
//! gateway end to end: merkle membership of the identity commitment under
//! the registry root, nullifier binding to the private key and event id,
//! and the full 15-word public-signal vector. The production registration
//! circuit is external; the authorizer only ever consumes the
//! verification interface.

use ark_bn254::{Bn254, Fr};
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_groth16::{Groth16, PreparedVerifyingKey, ProvingKey};
use ark_r1cs_std::{
    alloc::AllocVar,
    boolean::Boolean,
    eq::EqGadget,
    fields::{fp::FpVar, FieldVar},
    select::CondSelectGadget,
};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_snark::SNARK;
use ark_std::rand::thread_rng;
use std::sync::OnceLock;

use crate::groth16::ProofPoints;
use crate::poseidon::{digest_to_fr, poseidon_config};
use verimint_types::{Digest256, VerimintError, VerimintResult, PUBLIC_SIGNAL_COUNT};

pub const QUERY_TREE_DEPTH: usize = 20;

// Signal positions the circuit constrains directly.
const SIG_EVENT_ID: usize = 0;
const SIG_ID_STATE_ROOT: usize = 2;
const SIG_NULLIFIER: usize = 14;

static QUERY_KEYS: OnceLock<(ProvingKey<Bn254>, PreparedVerifyingKey<Bn254>)> = OnceLock::new();

fn poseidon_hash2_gadget(
    left: &FpVar<Fr>,
    right: &FpVar<Fr>,
    config: &PoseidonConfig<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let mut state = vec![
        FpVar::constant(Fr::from(0u64)),
        left.clone(),
        right.clone(),
    ];

    let half_full = config.full_rounds / 2;

    for r in 0..half_full {
        for (i, s) in state.iter_mut().enumerate() {
            let c = FpVar::constant(config.ark[r][i]);
            *s = s.clone() + c;
        }
        for s in state.iter_mut() {
            let s2 = s.clone() * s.clone();
            let s4 = s2.clone() * &s2;
            *s = s4 * s.clone();
        }
        state = apply_mds_gadget(&state, &config.mds)?;
    }

    for r in half_full..(half_full + config.partial_rounds) {
        for (i, s) in state.iter_mut().enumerate() {
            let c = FpVar::constant(config.ark[r][i]);
            *s = s.clone() + c;
        }
        let s = &mut state[0];
        let s2 = s.clone() * s.clone();
        let s4 = s2.clone() * &s2;
        *s = s4 * s.clone();
        state = apply_mds_gadget(&state, &config.mds)?;
    }

    for r in (half_full + config.partial_rounds)..(config.full_rounds + config.partial_rounds) {
        for (i, s) in state.iter_mut().enumerate() {
            let c = FpVar::constant(config.ark[r][i]);
            *s = s.clone() + c;
        }
        for s in state.iter_mut() {
            let s2 = s.clone() * s.clone();
            let s4 = s2.clone() * &s2;
            *s = s4 * s.clone();
        }
        state = apply_mds_gadget(&state, &config.mds)?;
    }

    Ok(state[1].clone())
}

fn apply_mds_gadget(
    state: &[FpVar<Fr>],
    mds: &[Vec<Fr>],
) -> Result<Vec<FpVar<Fr>>, SynthesisError> {
    let mut new_state = Vec::with_capacity(state.len());
    for row in mds {
        let mut acc = FpVar::constant(Fr::from(0u64));
        for (j, s) in state.iter().enumerate() {
            let coeff = FpVar::constant(row[j]);
            acc = acc + (coeff * s);
        }
        new_state.push(acc);
    }
    Ok(new_state)
}

fn poseidon_hash3_gadget(
    a: &FpVar<Fr>,
    b: &FpVar<Fr>,
    c: &FpVar<Fr>,
    config: &PoseidonConfig<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let h1 = poseidon_hash2_gadget(a, b, config)?;
    poseidon_hash2_gadget(&h1, c, config)
}

/// Private witness for the query circuit.
#[derive(Clone, Debug)]
pub struct QueryWitness {
    pub sk_identity: Digest256,
    pub blinding: Digest256,
    pub leaf_index: u64,
    pub merkle_path: Vec<Digest256>,
}

#[derive(Clone)]
struct QueryCircuit {
    sk_identity: Option<Fr>,
    blinding: Option<Fr>,
    leaf_index: Option<u64>,
    merkle_path: Option<Vec<Fr>>,
    signals: Option<[Fr; PUBLIC_SIGNAL_COUNT]>,
}

impl QueryCircuit {
    fn empty() -> Self {
        Self {
            sk_identity: Some(Fr::from(0u64)),
            blinding: Some(Fr::from(0u64)),
            leaf_index: Some(0),
            merkle_path: Some(vec![Fr::from(0u64); QUERY_TREE_DEPTH]),
            signals: Some([Fr::from(0u64); PUBLIC_SIGNAL_COUNT]),
        }
    }
}

impl ConstraintSynthesizer<Fr> for QueryCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let config = poseidon_config();

        // Public inputs, allocated in the exact signal order the
        // authorizer reconstructs. Every signal is bound by the Groth16
        // verification equation even where no further constraint follows.
        let mut signal_vars = Vec::with_capacity(PUBLIC_SIGNAL_COUNT);
        for i in 0..PUBLIC_SIGNAL_COUNT {
            let var = FpVar::new_input(cs.clone(), || {
                self.signals
                    .map(|s| s[i])
                    .ok_or(SynthesisError::AssignmentMissing)
            })?;
            signal_vars.push(var);
        }

        let sk_var = FpVar::new_witness(cs.clone(), || {
            self.sk_identity.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let blinding_var = FpVar::new_witness(cs.clone(), || {
            self.blinding.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let merkle_path = self
            .merkle_path
            .unwrap_or_else(|| vec![Fr::from(0u64); QUERY_TREE_DEPTH]);
        let mut path_vars = Vec::with_capacity(QUERY_TREE_DEPTH);
        for sibling in merkle_path.iter() {
            let sibling_var = FpVar::new_witness(cs.clone(), || Ok(*sibling))?;
            path_vars.push(sibling_var);
        }

        let commitment_var = poseidon_hash2_gadget(&sk_var, &blinding_var, &config)?;

        let mut current = commitment_var.clone();
        let mut index = self.leaf_index.unwrap_or(0);

        // Direction bits are witnesses, not constants: the constraint
        // structure must be identical for every leaf index or the
        // circuit-specific setup only covers one position.
        for sibling_var in path_vars.iter() {
            let is_right = (index & 1) == 1;
            let is_right_var = Boolean::new_witness(cs.clone(), || Ok(is_right))?;

            let left = FpVar::conditionally_select(&is_right_var, sibling_var, &current)?;
            let right = FpVar::conditionally_select(&is_right_var, &current, sibling_var)?;

            current = poseidon_hash2_gadget(&left, &right, &config)?;
            index >>= 1;
        }

        current.enforce_equal(&signal_vars[SIG_ID_STATE_ROOT])?;

        let computed_nullifier = poseidon_hash3_gadget(
            &sk_var,
            &commitment_var,
            &signal_vars[SIG_EVENT_ID],
            &config,
        )?;
        computed_nullifier.enforce_equal(&signal_vars[SIG_NULLIFIER])?;

        Ok(())
    }
}

/// Circuit-specific Groth16 setup, generated once per process. The keys
/// are not a production ceremony; they back the built-in circuit only.
pub fn query_setup() -> VerimintResult<&'static (ProvingKey<Bn254>, PreparedVerifyingKey<Bn254>)> {
    if let Some(keys) = QUERY_KEYS.get() {
        return Ok(keys);
    }

    let mut rng = thread_rng();
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(QueryCircuit::empty(), &mut rng)
        .map_err(|e| VerimintError::Crypto(e.to_string()))?;
    let pvk =
        Groth16::<Bn254>::process_vk(&vk).map_err(|e| VerimintError::Crypto(e.to_string()))?;

    // A concurrent initializer may have won the race; either value works.
    let _ = QUERY_KEYS.set((pk, pvk));
    QUERY_KEYS
        .get()
        .ok_or_else(|| VerimintError::Crypto("Query setup not initialized".into()))
}

/// Proves the query circuit for the given witness and signal vector,
/// returning the proof in the gateway's wire layout.
pub fn prove_query(
    witness: &QueryWitness,
    signals: &[Digest256; PUBLIC_SIGNAL_COUNT],
) -> VerimintResult<ProofPoints> {
    let (pk, _) = query_setup()?;

    let mut path: Vec<Fr> = witness.merkle_path.iter().map(digest_to_fr).collect();
    path.resize(QUERY_TREE_DEPTH, Fr::from(0u64));

    let mut signal_frs = [Fr::from(0u64); PUBLIC_SIGNAL_COUNT];
    for (fr, digest) in signal_frs.iter_mut().zip(signals.iter()) {
        *fr = digest_to_fr(digest);
    }

    let circuit = QueryCircuit {
        sk_identity: Some(digest_to_fr(&witness.sk_identity)),
        blinding: Some(digest_to_fr(&witness.blinding)),
        leaf_index: Some(witness.leaf_index),
        merkle_path: Some(path),
        signals: Some(signal_frs),
    };

    let mut rng = thread_rng();
    let proof = Groth16::<Bn254>::prove(pk, circuit, &mut rng)
        .map_err(|e| VerimintError::Crypto(e.to_string()))?;

    Ok(ProofPoints::from_ark_proof(&proof))
}
