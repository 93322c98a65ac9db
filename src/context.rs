use tracing::debug;

use crate::cli::TxArgs;
use crate::config::ClientConfig;
use crate::error::CliError;
use crate::keyring::Keyring;
use crate::message::Msg;
use crate::response::OutputFormat;
use crate::transaction::{BroadcastMode, Fee, UnsignedTx};

#[derive(Debug, Clone)]
pub struct ClientContext {
    pub from_name: Option<String>,
    pub from_address: String,
    pub chain_id: String,
    pub node: String,
    pub fee: Fee,
    pub memo: String,
    pub timeout_height: u64,
    pub broadcast_mode: BroadcastMode,
    pub generate_only: bool,
    pub dry_run: bool,
    pub output: OutputFormat,
}

impl ClientContext {
    /// Flags win over the config. An unknown `--from` is fatal.
    pub fn resolve(
        args: TxArgs,
        config: &ClientConfig,
        keyring: &Keyring,
    ) -> Result<Self, CliError> {
        let (from_name, from_address) = match keyring.get(&args.from)? {
            Some(key) => (Some(key.name), key.address),
            None if is_plausible_address(&config.bech32_prefix, &args.from) => (None, args.from),
            None => {
                return Err(CliError::Context(format!(
                    "'{}' is neither a key in the keyring nor a {} address",
                    args.from, config.bech32_prefix
                )))
            }
        };
        debug!(from = %from_address, name = ?from_name, "resolved signer");

        Ok(ClientContext {
            from_name,
            from_address,
            chain_id: args.chain_id.unwrap_or_else(|| config.chain_id.clone()),
            node: args.node.unwrap_or_else(|| config.node.clone()),
            fee: Fee {
                amount: args.fees.map(|coins| coins.0).unwrap_or_default(),
                gas_limit: args.gas.unwrap_or(config.gas),
            },
            memo: args.memo,
            timeout_height: args.timeout_height,
            broadcast_mode: args.broadcast_mode.unwrap_or(config.broadcast_mode),
            generate_only: args.generate_only,
            dry_run: args.dry_run,
            output: args.output.unwrap_or(config.output),
        })
    }

    pub fn build_tx(&self, msg: Msg) -> UnsignedTx {
        UnsignedTx {
            chain_id: self.chain_id.clone(),
            signer: self.from_address.clone(),
            messages: vec![msg],
            memo: self.memo.clone(),
            fee: self.fee.clone(),
            timeout_height: self.timeout_height,
        }
    }
}

/// Cheap shape check: `<prefix>1` followed by lower-case alphanumerics.
/// The checksum is left to the node.
pub fn is_plausible_address(prefix: &str, candidate: &str) -> bool {
    candidate
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('1'))
        .is_some_and(|data| {
            !data.is_empty()
                && data
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Coins;

    fn args(from: &str) -> TxArgs {
        TxArgs {
            from: from.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn resolves_key_name_from_keyring() {
        let keyring = Keyring::open_in_memory().unwrap();
        keyring.add("operator", "tori1operator").unwrap();

        let ctx = ClientContext::resolve(args("operator"), &ClientConfig::default(), &keyring).unwrap();
        assert_eq!(ctx.from_name.as_deref(), Some("operator"));
        assert_eq!(ctx.from_address, "tori1operator");
    }

    #[test]
    fn accepts_a_bare_address() {
        let keyring = Keyring::open_in_memory().unwrap();
        let ctx = ClientContext::resolve(args("tori1qy352eufjjmc9c"), &ClientConfig::default(), &keyring)
            .unwrap();
        assert_eq!(ctx.from_name, None);
        assert_eq!(ctx.from_address, "tori1qy352eufjjmc9c");
    }

    #[test]
    fn unknown_signer_is_fatal() {
        let keyring = Keyring::open_in_memory().unwrap();
        let err = ClientContext::resolve(args("nobody"), &ClientConfig::default(), &keyring)
            .unwrap_err();
        assert!(matches!(err, CliError::Context(_)));
    }

    #[test]
    fn flags_override_config() {
        let keyring = Keyring::open_in_memory().unwrap();
        let config = ClientConfig::default();
        let ctx = ClientContext::resolve(
            TxArgs {
                from: "tori1abc".into(),
                chain_id: Some("teritori-testnet-v3".into()),
                node: Some("http://10.1.1.1:26657".into()),
                fees: Some("500utori".parse::<Coins>().unwrap()),
                gas: Some(90_000),
                broadcast_mode: Some(BroadcastMode::Async),
                ..Default::default()
            },
            &config,
            &keyring,
        )
        .unwrap();
        assert_eq!(ctx.chain_id, "teritori-testnet-v3");
        assert_eq!(ctx.node, "http://10.1.1.1:26657");
        assert_eq!(ctx.fee.amount[0].amount, 500);
        assert_eq!(ctx.fee.gas_limit, 90_000);
        assert_eq!(ctx.broadcast_mode, BroadcastMode::Async);
        assert_eq!(ctx.output, config.output);

        let defaults = ClientContext::resolve(args("tori1abc"), &config, &keyring).unwrap();
        assert_eq!(defaults.chain_id, config.chain_id);
        assert_eq!(defaults.fee.gas_limit, config.gas);
        assert!(defaults.fee.amount.is_empty());
    }

    #[test]
    fn address_shape() {
        assert!(is_plausible_address("tori", "tori1abc0"));
        assert!(!is_plausible_address("tori", "tori1"));
        assert!(!is_plausible_address("tori", "cosmos1abc"));
        assert!(!is_plausible_address("tori", "tori1ABC"));
        assert!(!is_plausible_address("tori", "toriabc"));
    }
}
