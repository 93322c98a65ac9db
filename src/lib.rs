//! Command-line client for the `nftstaking` chain module.
//!
//! Builds `MsgRegisterNftStaking` and `MsgSetAccessInfo` transactions from
//! command-line input and hands them to a node over JSON-RPC.

pub mod cli;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod keyring;
pub mod logging;
pub mod message;
pub mod nftstaking;
pub mod response;
pub mod rpc;
pub mod transaction;
pub mod tx;
pub mod types;

pub use error::{CliError, SubmissionError};
pub use message::Msg;
pub use types::{Access, NftStaking, ServerAccess};
