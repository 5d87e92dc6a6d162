#![forbid(unsafe_code)]
#![warn(clippy::all)]

//! Shared type definitions for the Verimint credential mint: fixed-size
//! newtype wrappers, boundary data shapes and the error taxonomy.

use thiserror::Error;

pub mod address;
pub mod date;
pub mod digest;
pub mod request;

pub use address::EthAddress;
pub use date::PackedDate;
pub use digest::Digest256;
pub use request::{MintReceipt, TransitionData, UserData};

pub const DIGEST_SIZE: usize = 32;

pub const ETH_ADDRESS_SIZE: usize = 20;

pub const PACKED_DATE_SIZE: usize = 6;

pub const ED25519_SIGNATURE_SIZE: usize = 64;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Number of public signals carried by the query-identity circuit.
pub const PUBLIC_SIGNAL_COUNT: usize = 15;

/// Protocol selector bits fixed for the credential query.
pub const QUERY_SELECTOR: u64 = 0x1A01;

/// The `"000000"` packed-date sentinel meaning "unset".
pub const ZERO_DATE: [u8; PACKED_DATE_SIZE] = *b"000000";

/// Every failure the mint pipeline can surface to a caller. None are
/// swallowed; each check fails fast with the first violated variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerimintError {
    #[error("Invalid date encoding: byte outside ASCII digit range")]
    InvalidDateEncoding,

    #[error("Date precedes 1970-01-01")]
    DateBeforeEpoch,

    #[error("Invalid registry root: {0}")]
    InvalidRoot(Digest256),

    #[error("Stale root transition: timestamp does not advance")]
    StaleTransition,

    #[error("Invalid root-transition attestation")]
    InvalidAttestation,

    #[error("Invalid current date: claimed {claimed}, allowed window [{lower_bound}, {now}]")]
    InvalidCurrentDate {
        claimed: u64,
        lower_bound: u64,
        now: u64,
    },

    #[error("Proof verification rejected the reconstructed public signals")]
    InvalidProof,

    #[error("Nullifier already used: {0}")]
    NullifierUsed(Digest256),

    #[error("Recipient already holds the credential: {0}")]
    UserAlreadyRegistered(EthAddress),

    #[error("Soulbound token cannot be transferred or burned")]
    TransferNotAllowed,

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type VerimintResult<T> = Result<T, VerimintError>;
