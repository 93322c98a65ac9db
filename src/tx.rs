use std::fmt::{self, Display, Formatter};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::ClientContext;
use crate::error::{CliError, SubmissionError};
use crate::message::Msg;
use crate::rpc::{SimulateResponse, TxResponse};
use crate::transaction::{BroadcastMode, UnsignedTx};

/// Implemented by [`crate::rpc::NodeClient`].
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast(
        &self,
        tx: &UnsignedTx,
        mode: BroadcastMode,
    ) -> Result<TxResponse, SubmissionError>;

    async fn simulate(&self, tx: &UnsignedTx) -> Result<SimulateResponse, SubmissionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TxOutput {
    /// `txhash` is what the node will report once the tx is broadcast.
    Generated { txhash: String, tx: UnsignedTx },
    Simulated(SimulateResponse),
    Broadcast(TxResponse),
}

impl Display for TxOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TxOutput::Generated { txhash, tx } => {
                let json = serde_json::to_string_pretty(tx).map_err(|_| fmt::Error)?;
                writeln!(f, "txhash: {txhash}")?;
                write!(f, "{json}")
            }
            TxOutput::Simulated(sim) => {
                writeln!(f, "gas_used: {}", sim.gas_used)?;
                write!(f, "gas_wanted: {}", sim.gas_wanted)
            }
            TxOutput::Broadcast(resp) => {
                writeln!(f, "txhash: {}", resp.hash)?;
                writeln!(f, "code: {}", resp.code)?;
                writeln!(f, "height: {}", resp.height)?;
                write!(f, "raw_log: {}", resp.log)
            }
        }
    }
}

// The broadcaster is called at most once.
pub async fn generate_or_broadcast(
    ctx: &ClientContext,
    msg: Msg,
    broadcaster: &dyn Broadcaster,
) -> Result<TxOutput, CliError> {
    let tx = ctx.build_tx(msg);

    if ctx.generate_only {
        let txhash = tx.hash()?;
        debug!(signer = %tx.signer, %txhash, "generate-only, not contacting the node");
        return Ok(TxOutput::Generated { txhash, tx });
    }

    if ctx.dry_run {
        let sim = broadcaster.simulate(&tx).await?;
        info!(gas_used = sim.gas_used, "simulation finished");
        return Ok(TxOutput::Simulated(sim));
    }

    let resp = broadcaster.broadcast(&tx, ctx.broadcast_mode).await?;
    if resp.code != 0 {
        warn!(hash = %resp.hash, code = resp.code, codespace = %resp.codespace, "transaction rejected");
        return Err(SubmissionError::Rejected {
            hash: resp.hash,
            code: resp.code,
            log: resp.log,
        }
        .into());
    }
    info!(hash = %resp.hash, mode = %ctx.broadcast_mode, "transaction broadcast");
    Ok(TxOutput::Broadcast(resp))
}
