//! Mintgate registration flows
//!
//! The two registration paths and the rules deciding when a submission may
//! go out. Each flow is a small state machine owning its own form state;
//! the external collaborators (verification API, chain reader, wallet) are
//! passed in per operation so tests can substitute fakes.
//!
//! Concurrency model: single-threaded and event-driven. Remote checks are
//! issued as tickets keyed by the input value they were started for; a
//! result arriving for a superseded value is dropped without surfacing
//! anything, so a stale response can never poison the current input.

pub mod checks;
pub mod error;
pub mod gate;
pub mod invite;
pub mod nft;

pub use checks::{CheckOutcome, CheckStatus, CheckTicket, FieldCheck};
pub use error::{FlowError, Result};
pub use gate::GateInputs;
pub use invite::{InviteFlow, InviteState};
pub use nft::{NftFlow, NftState, StakeStatus, StakeTicket};
