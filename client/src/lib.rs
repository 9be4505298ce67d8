//! Mintgate external-service clients
//!
//! Thin clients for the three collaborators the registration flows talk to:
//! the remote verification API (invite codes, availability, reservation),
//! the gating contract (stake reads over JSON-RPC), and the wallet provider
//! (accounts and personal_sign). Each is behind a trait so the flow
//! controllers in `mintgate-registration` can be tested against fakes.

pub mod chain;
pub mod rpc;
pub mod verification;
pub mod wallet;

pub use chain::{ChainError, ChainReader, RpcChainReader};
pub use verification::{
    Availability, ClientError, HttpVerificationClient, RegistrationPayload, Verdict,
    VerificationApi,
};
pub use wallet::{RpcWalletProvider, WalletError, WalletProvider};
