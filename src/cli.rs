use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgMatches, Args, Command, FromArgMatches, Subcommand};

use crate::error::CliError;
use crate::message::Msg;
use crate::nftstaking;
use crate::response::OutputFormat;
use crate::transaction::{BroadcastMode, Coins};

pub const BIN_NAME: &str = "nftstaking";

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Directory holding config/client.json and the keyring
    #[arg(long, global = true, env = "NFTSTAKING_HOME")]
    pub home: Option<PathBuf>,

    /// Log filter, e.g. `info` or `nftstaking_cli=debug` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

/// Flags shared by every transaction command.
#[derive(Args, Debug, Clone, Default)]
pub struct TxArgs {
    /// Name or address of the signing account
    #[arg(long)]
    pub from: String,

    /// Chain ID of the target network
    #[arg(long, env = "NFTSTAKING_CHAIN_ID")]
    pub chain_id: Option<String>,

    /// JSON-RPC endpoint of the node
    #[arg(long, env = "NFTSTAKING_NODE")]
    pub node: Option<String>,

    /// Fees to pay, e.g. 250utori
    #[arg(long)]
    pub fees: Option<Coins>,

    /// Gas limit
    #[arg(long)]
    pub gas: Option<u64>,

    /// Note attached to the transaction
    #[arg(long, default_value = "")]
    pub memo: String,

    /// Block height after which the transaction is no longer valid (0 disables)
    #[arg(long, default_value_t = 0)]
    pub timeout_height: u64,

    #[arg(long, value_enum)]
    pub broadcast_mode: Option<BroadcastMode>,

    /// Print the unsigned transaction instead of broadcasting it
    #[arg(long, conflicts_with = "dry_run")]
    pub generate_only: bool,

    /// Simulate the transaction and report gas usage without broadcasting
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum KeysCommand {
    /// Store an address under a local name
    Add { name: String, address: String },
    /// Show a stored key
    Show { name: String },
    /// List stored keys
    List,
    /// Remove a stored key
    Delete { name: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the effective client config
    Show,
    /// Update one config value (chain-id, node, broadcast-mode, output, bech32-prefix, gas)
    Set { key: String, value: String },
}

#[derive(Clone, Copy)]
pub struct TxLeaf {
    pub name: &'static str,
    /// without the shared [`TxArgs`]
    pub command: fn() -> Command,
    pub build: fn(&ArgMatches, &str) -> Result<Msg, CliError>,
}

#[derive(Clone)]
pub struct ModuleCommand {
    pub name: &'static str,
    pub about: &'static str,
    pub leaves: Vec<TxLeaf>,
}

pub fn tx_modules() -> Vec<ModuleCommand> {
    vec![nftstaking::module()]
}

/// Compose the full command tree from the module registry.
pub fn app(modules: &[ModuleCommand]) -> Command {
    let root = Command::new(BIN_NAME)
        .about("Build and broadcast nftstaking transactions")
        .version(env!("CARGO_PKG_VERSION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true);

    GlobalArgs::augment_args(root)
        .subcommand(tx_command(modules))
        .subcommand(KeysCommand::augment_subcommands(
            Command::new("keys")
                .about("Manage the local keyring")
                .subcommand_required(true),
        ))
        .subcommand(ConfigCommand::augment_subcommands(
            Command::new("config")
                .about("Inspect or edit the client config")
                .subcommand_required(true),
        ))
}

fn tx_command(modules: &[ModuleCommand]) -> Command {
    let tx = Command::new("tx")
        .about("Transaction subcommands")
        .subcommand_required(true);
    modules.iter().fold(tx, |tx, module| {
        let module_cmd = module.leaves.iter().fold(
            Command::new(module.name)
                .about(module.about)
                .subcommand_required(true),
            |cmd, leaf| cmd.subcommand(TxArgs::augment_args((leaf.command)())),
        );
        tx.subcommand(module_cmd)
    })
}

pub struct TxInvocation {
    pub module: &'static str,
    pub leaf: TxLeaf,
    pub matches: ArgMatches,
    pub args: TxArgs,
}

impl TxInvocation {
    pub fn build_msg(&self, signer: &str) -> Result<Msg, CliError> {
        (self.leaf.build)(&self.matches, signer)
    }
}

pub enum Action {
    Tx(TxInvocation),
    Keys(KeysCommand),
    Config(ConfigCommand),
}

pub struct Invocation {
    pub global: GlobalArgs,
    pub action: Action,
}

/// Argument-count and type-conversion checks all happen here, before any
/// handler runs.
pub fn parse<I, T>(modules: &[ModuleCommand], args: I) -> Result<Invocation, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = app(modules).try_get_matches_from(args).map_err(classify)?;
    let global = GlobalArgs::from_arg_matches(&matches).map_err(classify)?;

    let action = match matches.subcommand() {
        Some(("tx", tx_matches)) => Action::Tx(tx_invocation(modules, tx_matches)?),
        Some(("keys", keys_matches)) => {
            Action::Keys(KeysCommand::from_arg_matches(keys_matches).map_err(classify)?)
        }
        Some(("config", config_matches)) => {
            Action::Config(ConfigCommand::from_arg_matches(config_matches).map_err(classify)?)
        }
        _ => return Err(missing_subcommand(modules)),
    };
    Ok(Invocation { global, action })
}

fn tx_invocation(modules: &[ModuleCommand], tx_matches: &ArgMatches) -> Result<TxInvocation, CliError> {
    let (module_name, module_matches) = tx_matches
        .subcommand()
        .ok_or_else(|| missing_subcommand(modules))?;
    let module = modules
        .iter()
        .find(|m| m.name == module_name)
        .ok_or_else(|| missing_subcommand(modules))?;
    let (leaf_name, leaf_matches) = module_matches
        .subcommand()
        .ok_or_else(|| missing_subcommand(modules))?;
    let leaf = module
        .leaves
        .iter()
        .find(|l| l.name == leaf_name)
        .copied()
        .ok_or_else(|| missing_subcommand(modules))?;

    Ok(TxInvocation {
        module: module.name,
        leaf,
        args: TxArgs::from_arg_matches(leaf_matches).map_err(classify)?,
        matches: leaf_matches.clone(),
    })
}

fn missing_subcommand(modules: &[ModuleCommand]) -> CliError {
    CliError::Usage(app(modules).error(ErrorKind::MissingSubcommand, "a subcommand is required"))
}

/// Sort a clap failure into the error taxonomy.
pub fn classify(err: clap::Error) -> CliError {
    match err.kind() {
        ErrorKind::InvalidValue | ErrorKind::ValueValidation | ErrorKind::InvalidUtf8 => {
            CliError::Parameter(err)
        }
        ErrorKind::MissingRequiredArgument if invalid_args(&err).iter().any(|a| is_positional(a)) => {
            CliError::ArgumentCount(err)
        }
        ErrorKind::UnknownArgument if is_surplus_positional(&err) => CliError::ArgumentCount(err),
        _ => CliError::Usage(err),
    }
}

fn invalid_args(err: &clap::Error) -> Vec<String> {
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => vec![arg.clone()],
        Some(ContextValue::Strings(args)) => args.clone(),
        _ => Vec::new(),
    }
}

// clap reports a surplus positional as an unexpected argument without dashes
fn is_surplus_positional(err: &clap::Error) -> bool {
    let args = invalid_args(err);
    !args.is_empty() && args.iter().all(|a| !a.starts_with('-'))
}

fn is_positional(rendered: &str) -> bool {
    rendered.starts_with('<') || rendered.starts_with('[')
}
