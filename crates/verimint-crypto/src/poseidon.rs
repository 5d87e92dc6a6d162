use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ff::{BigInteger, PrimeField};
use verimint_types::{Digest256, DIGEST_SIZE};

/// Poseidon over BN254 Fr with rate 2, the permutation shared by the
/// native hashing path and the in-circuit gadgets. Both sides must use
/// this exact parameter set or nullifier and root bindings drift apart.
pub(crate) fn poseidon_config() -> PoseidonConfig<Fr> {
    let full_rounds = 8;
    let partial_rounds = 57;
    let alpha = 5;
    let rate = 2;
    let capacity = 1;

    let mds = vec![
        vec![Fr::from(2u64), Fr::from(1u64), Fr::from(1u64)],
        vec![Fr::from(1u64), Fr::from(2u64), Fr::from(1u64)],
        vec![Fr::from(1u64), Fr::from(1u64), Fr::from(2u64)],
    ];

    // Round constants derived from a fixed blake3 seed schedule.
    let mut round_constants = Vec::new();
    let total_rounds = full_rounds + partial_rounds;
    for r in 0..total_rounds {
        let mut row = Vec::new();
        for i in 0..(rate + capacity) {
            let seed = ((r as u64) << 8) | (i as u64);
            let bytes = blake3::hash(&seed.to_le_bytes());
            row.push(Fr::from_le_bytes_mod_order(bytes.as_bytes()));
        }
        round_constants.push(row);
    }

    PoseidonConfig {
        full_rounds,
        partial_rounds,
        alpha: alpha as u64,
        mds,
        rate,
        capacity,
        ark: round_constants,
    }
}

pub(crate) fn poseidon_permute(state: &mut [Fr; 3], config: &PoseidonConfig<Fr>) {
    let half_full = config.full_rounds / 2;

    // First half of full rounds
    for r in 0..half_full {
        for (i, s) in state.iter_mut().enumerate() {
            *s += config.ark[r][i];
        }
        for s in state.iter_mut() {
            let s2 = *s * *s;
            let s4 = s2 * s2;
            *s = s4 * *s;
        }
        let old = *state;
        for (i, row) in config.mds.iter().enumerate() {
            state[i] = row[0] * old[0] + row[1] * old[1] + row[2] * old[2];
        }
    }

    // Partial rounds
    for r in half_full..(half_full + config.partial_rounds) {
        for (i, s) in state.iter_mut().enumerate() {
            *s += config.ark[r][i];
        }
        let s = &mut state[0];
        let s2 = *s * *s;
        let s4 = s2 * s2;
        *s = s4 * *s;
        let old = *state;
        for (i, row) in config.mds.iter().enumerate() {
            state[i] = row[0] * old[0] + row[1] * old[1] + row[2] * old[2];
        }
    }

    // Second half of full rounds
    for r in (half_full + config.partial_rounds)..(config.full_rounds + config.partial_rounds) {
        for (i, s) in state.iter_mut().enumerate() {
            *s += config.ark[r][i];
        }
        for s in state.iter_mut() {
            let s2 = *s * *s;
            let s4 = s2 * s2;
            *s = s4 * *s;
        }
        let old = *state;
        for (i, row) in config.mds.iter().enumerate() {
            state[i] = row[0] * old[0] + row[1] * old[1] + row[2] * old[2];
        }
    }
}

pub fn poseidon_hash2(left: Fr, right: Fr) -> Fr {
    let config = poseidon_config();
    let mut state = [Fr::from(0u64), left, right];
    poseidon_permute(&mut state, &config);
    state[1]
}

pub fn poseidon_hash3(a: Fr, b: Fr, c: Fr) -> Fr {
    // Hash(a, b) then Hash(result, c)
    let h1 = poseidon_hash2(a, b);
    poseidon_hash2(h1, c)
}

/// Big-endian 32-byte word into Fr, reduced modulo the scalar field.
pub fn digest_to_fr(digest: &Digest256) -> Fr {
    Fr::from_be_bytes_mod_order(digest.as_bytes())
}

pub fn fr_to_digest(f: Fr) -> Digest256 {
    let bytes = f.into_bigint().to_bytes_be();
    let mut result = [0u8; DIGEST_SIZE];
    result[DIGEST_SIZE - bytes.len()..].copy_from_slice(&bytes);
    Digest256::from_bytes(result)
}

/// The identity commitment: `Poseidon(sk_identity, blinding)`.
pub fn compute_identity_commitment(sk_identity: &Digest256, blinding: &Digest256) -> Digest256 {
    let commitment = poseidon_hash2(digest_to_fr(sk_identity), digest_to_fr(blinding));
    fr_to_digest(commitment)
}

/// The credential nullifier the circuit commits to:
/// `Poseidon3(sk_identity, commitment, event_id)`. Unique per identity and
/// per event id, unforgeable without the private witness.
pub fn compute_credential_nullifier(
    sk_identity: &Digest256,
    blinding: &Digest256,
    event_id: &Digest256,
) -> Digest256 {
    let sk = digest_to_fr(sk_identity);
    let commitment = poseidon_hash2(sk, digest_to_fr(blinding));
    let nullifier = poseidon_hash3(sk, commitment, digest_to_fr(event_id));
    fr_to_digest(nullifier)
}

/// Folds a leaf up a Poseidon merkle path, branching on the index bits.
pub fn compute_merkle_root(leaf: &Digest256, index: u64, path: &[Digest256]) -> Digest256 {
    let mut current = digest_to_fr(leaf);
    let mut idx = index;

    for sibling in path {
        let sibling_fr = digest_to_fr(sibling);
        let is_right = (idx & 1) == 1;

        current = if is_right {
            poseidon_hash2(sibling_fr, current)
        } else {
            poseidon_hash2(current, sibling_fr)
        };

        idx >>= 1;
    }

    fr_to_digest(current)
}
