use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::message::Msg;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u64,
}

impl FromStr for Coin {
    type Err = String;

    /// Parses `<amount><denom>`, e.g. `250utori`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("'{s}' has no denom"))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(format!("'{s}' has no amount"));
        }
        let valid_denom = denom.starts_with(|c: char| c.is_ascii_alphabetic())
            && denom
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));
        if !valid_denom {
            return Err(format!("invalid denom '{denom}'"));
        }
        let amount = amount
            .parse::<u64>()
            .map_err(|e| format!("invalid amount '{amount}': {e}"))?;
        Ok(Coin {
            denom: denom.to_string(),
            amount,
        })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Comma-separated coin list as accepted by `--fees`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coins(pub Vec<Coin>);

impl FromStr for Coins {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Coins::default());
        }
        s.split(',').map(Coin::from_str).collect::<Result<_, _>>().map(Coins)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas_limit: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    /// Wait for the CheckTx result
    #[default]
    Sync,
    /// Return right after the node accepts the bytes
    Async,
    /// Wait until the tx is committed in a block
    Block,
}

impl BroadcastMode {
    pub fn rpc_method(self) -> &'static str {
        match self {
            BroadcastMode::Sync => "broadcast_tx_sync",
            BroadcastMode::Async => "broadcast_tx_async",
            BroadcastMode::Block => "broadcast_tx_commit",
        }
    }
}

impl fmt::Display for BroadcastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BroadcastMode::Sync => "sync",
            BroadcastMode::Async => "async",
            BroadcastMode::Block => "block",
        };
        f.write_str(name)
    }
}

/// Transaction envelope handed to the node, which owns the signing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTx {
    pub chain_id: String,
    pub signer: String,
    pub messages: Vec<Msg>,
    pub memo: String,
    pub fee: Fee,
    pub timeout_height: u64,
}

impl UnsignedTx {
    /// Upper-case hex SHA-256 of the JSON encoding.
    pub fn hash(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:X}", hasher.finalize()))
    }
}
