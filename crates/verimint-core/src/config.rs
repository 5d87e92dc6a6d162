use serde::{Deserialize, Serialize};
use verimint_types::{Digest256, QUERY_SELECTOR};

/// Default seconds a superseded registry root stays acceptable, covering
/// proofs generated just before a root advance.
pub const DEFAULT_ROOT_VALIDITY_WINDOW: u64 = 3_600;

/// Deployment-time parameters of the authorizer. The magic token id
/// doubles as the proof's event id, so proofs are bound to this specific
/// credential and cannot be replayed against another deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizerConfig {
    pub magic_token_id: Digest256,
    pub selector: u64,
    pub root_validity_window: u64,
}

impl AuthorizerConfig {
    pub fn new(magic_token_id: Digest256) -> Self {
        Self {
            magic_token_id,
            selector: QUERY_SELECTOR,
            root_validity_window: DEFAULT_ROOT_VALIDITY_WINDOW,
        }
    }
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self::new(Digest256::zero())
    }
}
