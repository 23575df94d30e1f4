//! Connected/disabled chain handle

use std::sync::Arc;

use super::client::ChainClient;
use super::error::{ChainError, DisabledReason};

/// Chain access as decided at start-up
///
/// A disabled handle stays disabled for the life of the process.
#[derive(Clone)]
pub enum ChainHandle {
    Connected {
        client: Arc<dyn ChainClient>,
        chain_id: u64,
    },
    Disabled(DisabledReason),
}

impl ChainHandle {
    pub fn connected(client: Arc<dyn ChainClient>, chain_id: u64) -> Self {
        Self::Connected { client, chain_id }
    }

    pub fn disabled(reason: DisabledReason) -> Self {
        Self::Disabled(reason)
    }

    /// The client, or `ChainError::Unavailable` when disabled
    pub fn client(&self) -> Result<&Arc<dyn ChainClient>, ChainError> {
        match self {
            Self::Connected { client, .. } => Ok(client),
            Self::Disabled(reason) => Err(ChainError::Unavailable(reason.clone())),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    pub fn chain_id(&self) -> Option<u64> {
        match self {
            Self::Connected { chain_id, .. } => Some(*chain_id),
            Self::Disabled(_) => None,
        }
    }

    pub fn disabled_reason(&self) -> Option<&DisabledReason> {
        match self {
            Self::Connected { .. } => None,
            Self::Disabled(reason) => Some(reason),
        }
    }
}

impl std::fmt::Debug for ChainHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected { chain_id, .. } => f
                .debug_struct("Connected")
                .field("chain_id", chain_id)
                .finish_non_exhaustive(),
            Self::Disabled(reason) => f.debug_tuple("Disabled").field(reason).finish(),
        }
    }
}
