#![deny(unsafe_code)]
#![warn(clippy::all)]

//! Cryptographic boundary of the Verimint credential mint: keccak event
//! binding, Poseidon hashing, the BN254 Groth16 proof gateway and the
//! ed25519 root-transition attestation capability.

pub mod attestation;
pub mod circuit;
pub mod groth16;
pub mod keccak_ops;
pub mod poseidon;

pub use attestation::{Ed25519RootAttestor, RootAttestor};
pub use circuit::{prove_query, query_setup, QueryWitness, QUERY_TREE_DEPTH};
pub use groth16::{Groth16Gateway, ProofGateway, ProofPoints};
pub use keccak_ops::{derive_event_data, keccak256};
pub use poseidon::{
    compute_credential_nullifier, compute_identity_commitment, compute_merkle_root,
    digest_to_fr, fr_to_digest, poseidon_hash2, poseidon_hash3,
};
