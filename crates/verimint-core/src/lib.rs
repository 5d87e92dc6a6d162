#![forbid(unsafe_code)]
#![warn(clippy::all)]

//! The mint-authorization core: one non-transferable credential token per
//! verified identity, gated by a Groth16 proof against a replicated
//! registry root.

pub mod authorizer;
pub mod clock;
pub mod config;
pub mod date;
pub mod ledger;
pub mod signals;
pub mod store;
pub mod token;

pub use authorizer::MintAuthorizer;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AuthorizerConfig;
pub use date::{days_from_1970, days_in_month, decode_date, is_leap_year};
pub use ledger::RegistryRootLedger;
pub use signals::PublicSignals;
pub use store::MintStore;
pub use token::{SoulboundLedger, TokenSink};
