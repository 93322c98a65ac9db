use std::path::Path;

use tracing::{debug, info};

use crate::cli::{Action, ConfigCommand, Invocation, KeysCommand, TxInvocation};
use crate::config::{default_home, ClientConfig};
use crate::context::{is_plausible_address, ClientContext};
use crate::error::{CliError, KeyringError};
use crate::keyring::Keyring;
use crate::response::{CommandOutput, OutputFormat};
use crate::rpc::NodeClient;
use crate::tx::{generate_or_broadcast, Broadcaster};

/// Run one parsed invocation and return what to print, in the requested format.
pub async fn dispatch(invocation: Invocation) -> Result<(CommandOutput, OutputFormat), CliError> {
    let home = invocation.global.home.unwrap_or_else(default_home);
    debug!(home = %home.display(), "using home directory");
    let config = ClientConfig::load(&home)?;

    match invocation.action {
        Action::Tx(tx) => {
            let keyring = Keyring::open(&home)?;
            let ctx = ClientContext::resolve(tx.args.clone(), &config, &keyring)?;
            let client = NodeClient::new(ctx.node.clone());
            let output = run_tx(&ctx, &tx, &client).await?;
            Ok((output, ctx.output))
        }
        Action::Keys(cmd) => Ok((run_keys(cmd, &home, &config)?, config.output)),
        Action::Config(cmd) => {
            let output = config.output;
            Ok((run_config(cmd, &home, config)?, output))
        }
    }
}

/// Build the invocation's message from the resolved signer and submit it.
pub async fn run_tx(
    ctx: &ClientContext,
    tx: &TxInvocation,
    broadcaster: &dyn Broadcaster,
) -> Result<CommandOutput, CliError> {
    let msg = tx.build_msg(&ctx.from_address)?;
    info!(module = tx.module, command = tx.leaf.name, msg = msg.type_url(), "submitting");
    Ok(CommandOutput::Tx(generate_or_broadcast(ctx, msg, broadcaster).await?))
}

pub fn run_keys(cmd: KeysCommand, home: &Path, config: &ClientConfig) -> Result<CommandOutput, CliError> {
    let keyring = Keyring::open(home)?;
    let output = match cmd {
        KeysCommand::Add { name, address } => {
            if !is_plausible_address(&config.bech32_prefix, &address) {
                return Err(KeyringError::InvalidAddress {
                    address,
                    prefix: config.bech32_prefix.clone(),
                }
                .into());
            }
            CommandOutput::Key(keyring.add(&name, &address)?)
        }
        KeysCommand::Show { name } => match keyring.get(&name)? {
            Some(key) => CommandOutput::Key(key),
            None => return Err(KeyringError::NotFound(name).into()),
        },
        KeysCommand::List => CommandOutput::Keys(keyring.list()?),
        KeysCommand::Delete { name } => {
            keyring.delete(&name)?;
            CommandOutput::KeyDeleted { deleted: name }
        }
    };
    Ok(output)
}

pub fn run_config(cmd: ConfigCommand, home: &Path, mut config: ClientConfig) -> Result<CommandOutput, CliError> {
    match cmd {
        ConfigCommand::Show => Ok(CommandOutput::Config(config)),
        ConfigCommand::Set { key, value } => {
            config.set(&key, &value)?;
            config.save(home)?;
            info!(%key, %value, "config updated");
            Ok(CommandOutput::ConfigUpdated { key, value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_add_show_delete() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path();
        let config = ClientConfig::default();

        let added = run_keys(
            KeysCommand::Add { name: "op".into(), address: "tori1op".into() },
            home,
            &config,
        )
        .unwrap();
        assert!(matches!(added, CommandOutput::Key(ref k) if k.address == "tori1op"));

        let shown = run_keys(KeysCommand::Show { name: "op".into() }, home, &config).unwrap();
        assert!(matches!(shown, CommandOutput::Key(ref k) if k.name == "op"));

        run_keys(KeysCommand::Delete { name: "op".into() }, home, &config).unwrap();
        let err = run_keys(KeysCommand::Show { name: "op".into() }, home, &config).unwrap_err();
        assert!(matches!(err, CliError::Keyring(KeyringError::NotFound(_))));
    }

    #[test]
    fn keys_add_rejects_foreign_addresses() {
        let home = tempfile::tempdir().unwrap();
        let err = run_keys(
            KeysCommand::Add { name: "op".into(), address: "cosmos1op".into() },
            home.path(),
            &ClientConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Keyring(KeyringError::InvalidAddress { .. })));
    }

    #[test]
    fn config_set_persists() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path();

        run_config(
            ConfigCommand::Set { key: "chain-id".into(), value: "teritori-testnet-v3".into() },
            home,
            ClientConfig::default(),
        )
        .unwrap();
        assert_eq!(ClientConfig::load(home).unwrap().chain_id, "teritori-testnet-v3");
    }
}
