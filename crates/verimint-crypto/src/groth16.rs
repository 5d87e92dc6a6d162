use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField};
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, VerifyingKey};
use ark_serialize::CanonicalDeserialize;
use ark_snark::SNARK;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::circuit::query_setup;
use crate::poseidon::digest_to_fr;
use verimint_types::{Digest256, VerimintError, VerimintResult, DIGEST_SIZE};

/// Groth16 proof in the verifier wire layout: each point coordinate a
/// 32-byte big-endian word.
///
/// The two inner components of each `b` row are swapped relative to
/// arkworks' natural `(c0, c1)` ordering: the wire carries `[c1, c0]`.
/// This is an interop quirk between the two curve-point conventions and
/// must be replicated exactly in both directions, or proofs verify
/// against the wrong Fq2 layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPoints {
    pub a: [Digest256; 2],
    pub b: [[Digest256; 2]; 2],
    pub c: [Digest256; 2],
}

fn fq_to_digest(f: Fq) -> Digest256 {
    let bytes = f.into_bigint().to_bytes_be();
    let mut result = [0u8; DIGEST_SIZE];
    result[DIGEST_SIZE - bytes.len()..].copy_from_slice(&bytes);
    Digest256::from_bytes(result)
}

fn fq_from_digest(d: &Digest256) -> Fq {
    Fq::from_be_bytes_mod_order(d.as_bytes())
}

fn g1_from_words(words: &[Digest256; 2]) -> Option<G1Affine> {
    if words[0].is_zero() && words[1].is_zero() {
        return Some(G1Affine::zero());
    }
    let point = G1Affine::new_unchecked(fq_from_digest(&words[0]), fq_from_digest(&words[1]));
    (point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve()).then_some(point)
}

fn g2_from_words(words: &[[Digest256; 2]; 2]) -> Option<G2Affine> {
    if words.iter().flatten().all(|w| w.is_zero()) {
        return Some(G2Affine::zero());
    }
    // Wire rows carry [c1, c0].
    let x = Fq2::new(fq_from_digest(&words[0][1]), fq_from_digest(&words[0][0]));
    let y = Fq2::new(fq_from_digest(&words[1][1]), fq_from_digest(&words[1][0]));
    let point = G2Affine::new_unchecked(x, y);
    (point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve()).then_some(point)
}

impl ProofPoints {
    /// Re-encodes an arkworks proof into the wire layout, applying the
    /// `b`-row component swap.
    pub fn from_ark_proof(proof: &Proof<Bn254>) -> Self {
        Self {
            a: [fq_to_digest(proof.a.x), fq_to_digest(proof.a.y)],
            b: [
                [fq_to_digest(proof.b.x.c1), fq_to_digest(proof.b.x.c0)],
                [fq_to_digest(proof.b.y.c1), fq_to_digest(proof.b.y.c0)],
            ],
            c: [fq_to_digest(proof.c.x), fq_to_digest(proof.c.y)],
        }
    }

    /// Decodes back into an arkworks proof. `None` when a coordinate pair
    /// is not a valid curve point.
    pub fn to_ark_proof(&self) -> Option<Proof<Bn254>> {
        Some(Proof {
            a: g1_from_words(&self.a)?,
            b: g2_from_words(&self.b)?,
            c: g1_from_words(&self.c)?,
        })
    }

    /// Flat 256-byte encoding: a, b rows, c, wire order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 * DIGEST_SIZE);
        for word in self.words() {
            bytes.extend_from_slice(word.as_bytes());
        }
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> VerimintResult<Self> {
        if bytes.len() != 8 * DIGEST_SIZE {
            return Err(VerimintError::Serialization(
                "Proof points must be exactly 256 bytes".into(),
            ));
        }
        let mut words = [Digest256::zero(); 8];
        for (i, word) in words.iter_mut().enumerate() {
            let mut arr = [0u8; DIGEST_SIZE];
            arr.copy_from_slice(&bytes[i * DIGEST_SIZE..(i + 1) * DIGEST_SIZE]);
            *word = Digest256::from_bytes(arr);
        }
        Ok(Self {
            a: [words[0], words[1]],
            b: [[words[2], words[3]], [words[4], words[5]]],
            c: [words[6], words[7]],
        })
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.to_bytes())
    }

    pub fn from_base64(s: &str) -> VerimintResult<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(|e| VerimintError::Serialization(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    fn words(&self) -> [&Digest256; 8] {
        [
            &self.a[0], &self.a[1], &self.b[0][0], &self.b[0][1], &self.b[1][0], &self.b[1][1],
            &self.c[0], &self.c[1],
        ]
    }
}

/// Boundary to the succinct-proof verifier: deterministic, side-effect
/// free, never interprets proof internals.
pub trait ProofGateway {
    fn verify(&self, proof: &ProofPoints, public_signals: &[Digest256]) -> VerimintResult<bool>;
}

/// arkworks-backed gateway over a prepared BN254 verifying key.
pub struct Groth16Gateway {
    pvk: PreparedVerifyingKey<Bn254>,
}

impl Groth16Gateway {
    pub fn new(pvk: PreparedVerifyingKey<Bn254>) -> Self {
        Self { pvk }
    }

    /// Gateway for the built-in query circuit's verifying key.
    pub fn for_query_circuit() -> VerimintResult<Self> {
        let (_, pvk) = query_setup()?;
        Ok(Self { pvk: pvk.clone() })
    }

    /// Gateway over an externally supplied verifying key (compressed
    /// arkworks encoding), e.g. the production registration circuit's.
    pub fn from_vk_bytes(bytes: &[u8]) -> VerimintResult<Self> {
        let vk = VerifyingKey::<Bn254>::deserialize_compressed(bytes)
            .map_err(|e| VerimintError::Serialization(e.to_string()))?;
        let pvk =
            Groth16::<Bn254>::process_vk(&vk).map_err(|e| VerimintError::Crypto(e.to_string()))?;
        Ok(Self { pvk })
    }
}

impl ProofGateway for Groth16Gateway {
    fn verify(&self, proof: &ProofPoints, public_signals: &[Digest256]) -> VerimintResult<bool> {
        // Malformed curve points are a rejection, not an internal error.
        let Some(ark_proof) = proof.to_ark_proof() else {
            return Ok(false);
        };

        let inputs: Vec<_> = public_signals.iter().map(digest_to_fr).collect();

        Groth16::<Bn254>::verify_with_processed_vk(&self.pvk, &inputs, &ark_proof)
            .map_err(|e| VerimintError::Crypto(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{prove_query, QueryWitness, QUERY_TREE_DEPTH};
    use crate::poseidon::{
        compute_credential_nullifier, compute_identity_commitment, compute_merkle_root,
    };
    use verimint_types::PUBLIC_SIGNAL_COUNT;

    fn sample_signals(
        witness: &QueryWitness,
        event_id: Digest256,
    ) -> [Digest256; PUBLIC_SIGNAL_COUNT] {
        let commitment = compute_identity_commitment(&witness.sk_identity, &witness.blinding);
        let root = compute_merkle_root(&commitment, witness.leaf_index, &witness.merkle_path);
        let nullifier =
            compute_credential_nullifier(&witness.sk_identity, &witness.blinding, &event_id);

        let mut signals = [Digest256::zero(); PUBLIC_SIGNAL_COUNT];
        signals[0] = event_id;
        signals[1] = Digest256::from_u64(0xCAFE);
        signals[2] = root;
        signals[3] = Digest256::from_u64(0x1A01);
        signals[4] = Digest256::from_u64(0x323431323039);
        signals[14] = nullifier;
        signals
    }

    fn sample_witness() -> QueryWitness {
        QueryWitness {
            sk_identity: Digest256::from_u64(123),
            blinding: Digest256::from_u64(456),
            leaf_index: 3,
            merkle_path: vec![Digest256::from_u64(9); QUERY_TREE_DEPTH],
        }
    }

    #[test]
    fn test_prove_and_verify_query_circuit() {
        let witness = sample_witness();
        let signals = sample_signals(&witness, Digest256::from_u64(1111));

        let proof = prove_query(&witness, &signals).unwrap();
        let gateway = Groth16Gateway::for_query_circuit().unwrap();

        assert!(gateway.verify(&proof, &signals).unwrap());
    }

    #[test]
    fn test_any_tampered_signal_fails_verification() {
        let witness = sample_witness();
        let signals = sample_signals(&witness, Digest256::from_u64(1111));
        let proof = prove_query(&witness, &signals).unwrap();
        let gateway = Groth16Gateway::for_query_circuit().unwrap();

        for i in 0..PUBLIC_SIGNAL_COUNT {
            let mut tampered = signals;
            tampered[i] = Digest256::from_u64(0xDEAD_0000 + i as u64);
            assert!(
                !gateway.verify(&proof, &tampered).unwrap(),
                "signal {} not bound",
                i
            );
        }
    }

    #[test]
    fn test_proof_points_ark_roundtrip_preserves_swap() {
        let witness = sample_witness();
        let signals = sample_signals(&witness, Digest256::from_u64(7));
        let points = prove_query(&witness, &signals).unwrap();

        let ark = points.to_ark_proof().unwrap();
        let back = ProofPoints::from_ark_proof(&ark);
        assert_eq!(points, back);

        // The wire layout stores [c1, c0]; the decoded point must read
        // them back in (c0, c1) order.
        assert_eq!(fq_to_digest(ark.b.x.c0), points.b[0][1]);
        assert_eq!(fq_to_digest(ark.b.x.c1), points.b[0][0]);
    }

    #[test]
    fn test_unswapped_b_rows_fail_verification() {
        let witness = sample_witness();
        let signals = sample_signals(&witness, Digest256::from_u64(7));
        let mut points = prove_query(&witness, &signals).unwrap();
        points.b[0].swap(0, 1);
        points.b[1].swap(0, 1);

        let gateway = Groth16Gateway::for_query_circuit().unwrap();
        // Either the un-swapped coordinates no longer form a curve point
        // or the pairing check fails; both must reject.
        assert!(!gateway.verify(&points, &signals).unwrap());
    }

    #[test]
    fn test_garbage_points_rejected_not_errored() {
        let gateway = Groth16Gateway::for_query_circuit().unwrap();
        let garbage = ProofPoints {
            a: [Digest256::from_u64(1), Digest256::from_u64(2)],
            b: [
                [Digest256::from_u64(3), Digest256::from_u64(4)],
                [Digest256::from_u64(5), Digest256::from_u64(6)],
            ],
            c: [Digest256::from_u64(7), Digest256::from_u64(8)],
        };
        let signals = [Digest256::zero(); PUBLIC_SIGNAL_COUNT];
        assert!(!gateway.verify(&garbage, &signals).unwrap());
    }

    #[test]
    fn test_bytes_and_base64_roundtrip() {
        let witness = sample_witness();
        let signals = sample_signals(&witness, Digest256::from_u64(7));
        let points = prove_query(&witness, &signals).unwrap();

        assert_eq!(ProofPoints::from_bytes(&points.to_bytes()).unwrap(), points);
        assert_eq!(ProofPoints::from_base64(&points.to_base64()).unwrap(), points);
        assert!(ProofPoints::from_bytes(&[0u8; 10]).is_err());

        let json = serde_json::to_string(&points).unwrap();
        let back: ProofPoints = serde_json::from_str(&json).unwrap();
        assert_eq!(points, back);
    }
}
