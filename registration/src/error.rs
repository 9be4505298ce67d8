//! Registration flow error types
//!
//! Every variant carries a human-readable message and maps to a recovery:
//! validation and conflicts are fixed by editing the field, ineligibility
//! by waiting or staking, provider errors by installing or retrying, and
//! remote/chain errors by retrying. No error crashes a flow; the
//! controller returns to its last stable state.

use mintgate_client::{ChainError, ClientError, WalletError};
use mintgate_core::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    AvailabilityConflict(String),

    #[error("Staking requirement unmet: {0}")]
    Ineligible(String),

    #[error("{0}")]
    Wallet(#[from] WalletError),

    #[error("Remote call failed: {0}")]
    RemoteCall(#[from] ClientError),

    #[error("{0}")]
    ChainRead(#[from] ChainError),

    #[error("{0}")]
    Rejected(String),

    #[error("Submission blocked: {0}")]
    NotReady(String),
}

pub type Result<T> = std::result::Result<T, FlowError>;
