//! Transaction commands of the `nftstaking` module.

use clap::{ArgMatches, Args, Command, FromArgMatches};

use crate::cli::{classify, ModuleCommand, TxLeaf};
use crate::error::CliError;
use crate::message::Msg;
use crate::types::{parse_server_info, Access, NftStaking};

pub const MODULE_NAME: &str = "nftstaking";

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterNftStakingArgs {
    /// NFT identifier
    #[arg(long, default_value = "")]
    pub nft_identifier: String,

    /// NFT metadata
    #[arg(long, default_value = "")]
    pub nft_metadata: String,

    /// Reward address to receive staking rewards
    #[arg(long, default_value = "")]
    pub reward_address: String,

    /// Reward weight for the NFT
    #[arg(long, default_value_t = 0)]
    pub reward_weight: u64,
}

impl RegisterNftStakingArgs {
    /// Empty identifiers and zero weights are forwarded as-is; the module
    /// decides what is valid.
    pub fn into_msg(self, signer: &str) -> Msg {
        Msg::register_nft_staking(
            signer,
            NftStaking {
                nft_identifier: self.nft_identifier,
                nft_metadata: self.nft_metadata,
                reward_address: self.reward_address,
                reward_weight: self.reward_weight,
            },
        )
    }
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SetAccessInfoArgs {
    /// Address the access info applies to
    pub address: String,

    /// Servers and channels: `server#channel#channel,server`
    pub server_info: String,
}

impl SetAccessInfoArgs {
    pub fn into_msg(self, signer: &str) -> Msg {
        Msg::set_access_info(
            signer,
            Access {
                address: self.address,
                servers: parse_server_info(&self.server_info),
            },
        )
    }
}

pub fn module() -> ModuleCommand {
    ModuleCommand {
        name: MODULE_NAME,
        about: "nftstaking sub commands",
        leaves: vec![
            TxLeaf {
                name: "register-nft-staking",
                command: register_nft_staking_command,
                build: build_register_nft_staking,
            },
            TxLeaf {
                name: "set-access-info",
                command: set_access_info_command,
                build: build_set_access_info,
            },
        ],
    }
}

fn register_nft_staking_command() -> Command {
    RegisterNftStakingArgs::augment_args(
        Command::new("register-nft-staking")
            .about("Register a nft staking with nft identifier and reward address"),
    )
}

fn set_access_info_command() -> Command {
    SetAccessInfoArgs::augment_args(Command::new("set-access-info").about("Set server access info"))
}

fn build_register_nft_staking(matches: &ArgMatches, signer: &str) -> Result<Msg, CliError> {
    let args = RegisterNftStakingArgs::from_arg_matches(matches).map_err(classify)?;
    Ok(args.into_msg(signer))
}

fn build_set_access_info(matches: &ArgMatches, signer: &str) -> Result<Msg, CliError> {
    let args = SetAccessInfoArgs::from_arg_matches(matches).map_err(classify)?;
    Ok(args.into_msg(signer))
}
