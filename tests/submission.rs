//! End-to-end command flow: argv -> parse -> signer resolution -> message -> broadcaster.
//!
//! Run: cargo test --test submission

use std::sync::Mutex;

use async_trait::async_trait;
use nftstaking_cli::cli::{self, Action, Invocation, TxInvocation};
use nftstaking_cli::config::ClientConfig;
use nftstaking_cli::context::ClientContext;
use nftstaking_cli::dispatch::run_tx;
use nftstaking_cli::keyring::Keyring;
use nftstaking_cli::response::CommandOutput;
use nftstaking_cli::rpc::{SimulateResponse, TxResponse};
use nftstaking_cli::transaction::{BroadcastMode, UnsignedTx};
use nftstaking_cli::tx::{Broadcaster, TxOutput};
use nftstaking_cli::{CliError, Msg, NftStaking, ServerAccess, SubmissionError};

#[derive(Default)]
struct FakeNode {
    submitted: Mutex<Vec<UnsignedTx>>,
}

impl FakeNode {
    fn submitted(&self) -> Vec<UnsignedTx> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Broadcaster for FakeNode {
    async fn broadcast(
        &self,
        tx: &UnsignedTx,
        _mode: BroadcastMode,
    ) -> Result<TxResponse, SubmissionError> {
        self.submitted.lock().unwrap().push(tx.clone());
        Ok(TxResponse {
            hash: tx.hash().unwrap(),
            ..Default::default()
        })
    }

    async fn simulate(&self, tx: &UnsignedTx) -> Result<SimulateResponse, SubmissionError> {
        self.submitted.lock().unwrap().push(tx.clone());
        Ok(SimulateResponse::default())
    }
}

fn parse(args: &[&str]) -> Result<Invocation, CliError> {
    cli::parse(
        &cli::tx_modules(),
        std::iter::once(cli::BIN_NAME).chain(args.iter().copied()),
    )
}

fn tx_invocation(args: &[&str]) -> TxInvocation {
    match parse(args).unwrap().action {
        Action::Tx(tx) => tx,
        _ => panic!("expected a tx command"),
    }
}

async fn submit(args: &[&str], keyring: &Keyring, node: &FakeNode) -> Result<CommandOutput, CliError> {
    let tx = tx_invocation(args);
    let ctx = ClientContext::resolve(tx.args.clone(), &ClientConfig::default(), keyring)?;
    run_tx(&ctx, &tx, node).await
}

#[tokio::test]
async fn register_nft_staking_submits_once_from_keyring_signer() {
    let keyring = Keyring::open_in_memory().unwrap();
    keyring.add("validator", "tori1validator").unwrap();
    let node = FakeNode::default();

    let output = submit(
        &[
            "tx", "nftstaking", "register-nft-staking",
            "--nft-identifier", "tori1gopher-7",
            "--nft-metadata", "gold",
            "--reward-address", "tori1reward",
            "--reward-weight", "25",
            "--from", "validator",
            "--chain-id", "teritori-testnet-v3",
        ],
        &keyring,
        &node,
    )
    .await
    .unwrap();

    let submitted = node.submitted();
    assert_eq!(submitted.len(), 1);
    let tx = &submitted[0];
    assert_eq!(tx.signer, "tori1validator");
    assert_eq!(tx.chain_id, "teritori-testnet-v3");
    assert_eq!(
        tx.messages,
        vec![Msg::register_nft_staking(
            "tori1validator",
            NftStaking {
                nft_identifier: "tori1gopher-7".into(),
                nft_metadata: "gold".into(),
                reward_address: "tori1reward".into(),
                reward_weight: 25,
            }
        )]
    );

    match output {
        CommandOutput::Tx(TxOutput::Broadcast(resp)) => assert_eq!(resp.hash, tx.hash().unwrap()),
        other => panic!("unexpected output {other:?}"),
    }
}

#[tokio::test]
async fn set_access_info_submits_parsed_servers() {
    let keyring = Keyring::open_in_memory().unwrap();
    let node = FakeNode::default();

    submit(
        &[
            "tx", "nftstaking", "set-access-info", "tori1member", "discord#general#gm,matrix",
            "--from", "tori1admin",
        ],
        &keyring,
        &node,
    )
    .await
    .unwrap();

    let submitted = node.submitted();
    assert_eq!(submitted.len(), 1);
    let Msg::SetAccessInfo { sender, access_info } = &submitted[0].messages[0] else {
        panic!("expected set-access-info");
    };
    assert_eq!(sender, "tori1admin");
    assert_eq!(access_info.address, "tori1member");
    assert_eq!(
        access_info.servers,
        vec![
            ServerAccess { server: "discord".into(), channels: vec!["general".into(), "gm".into()] },
            ServerAccess { server: "matrix".into(), channels: vec![] },
        ]
    );
}

#[tokio::test]
async fn generate_only_does_not_submit() {
    let keyring = Keyring::open_in_memory().unwrap();
    let node = FakeNode::default();

    let output = submit(
        &[
            "tx", "nftstaking", "register-nft-staking",
            "--from", "tori1admin", "--generate-only", "--memo", "offline",
        ],
        &keyring,
        &node,
    )
    .await
    .unwrap();

    assert!(node.submitted().is_empty());
    let CommandOutput::Tx(TxOutput::Generated { txhash, tx }) = output else {
        panic!("expected generated tx");
    };
    assert_eq!(txhash, tx.hash().unwrap());
    assert_eq!(txhash.len(), 64);
    assert!(txhash.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    assert_eq!(tx.memo, "offline");
    assert_eq!(tx.fee.gas_limit, ClientConfig::default().gas);
}

#[tokio::test]
async fn unresolvable_signer_aborts_before_submission() {
    let keyring = Keyring::open_in_memory().unwrap();
    let node = FakeNode::default();

    let err = submit(
        &["tx", "nftstaking", "register-nft-staking", "--from", "ghost"],
        &keyring,
        &node,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CliError::Context(_)), "{err:?}");
    assert!(node.submitted().is_empty());
}

#[test]
fn bad_reward_weight_fails_during_parsing() {
    let err = parse(&[
        "tx", "nftstaking", "register-nft-staking", "--from", "tori1admin", "--reward-weight=abc",
    ])
    .err()
    .unwrap();
    assert!(matches!(err, CliError::Parameter(_)), "{err:?}");
    assert!(err.to_string().contains("reward-weight"), "{err}");
}

#[test]
fn set_access_info_argument_count_is_enforced_before_parsing() {
    for args in [
        vec!["tx", "nftstaking", "set-access-info", "--from", "tori1admin"],
        vec!["tx", "nftstaking", "set-access-info", "tori1member", "--from", "tori1admin"],
    ] {
        let err = parse(&args).err().unwrap();
        assert!(matches!(err, CliError::ArgumentCount(_)), "{args:?}: {err:?}");
    }
}
