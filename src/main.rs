use nftstaking_cli::{cli, dispatch, logging, CliError};
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run().await {
        err.exit();
    }
}

async fn run() -> Result<(), CliError> {
    let invocation = cli::parse(&cli::tx_modules(), std::env::args_os())?;
    logging::init(invocation.global.log_level.as_deref());
    debug!(version = env!("CARGO_PKG_VERSION"), "starting");

    let (output, format) = dispatch::dispatch(invocation).await?;
    println!("{}", output.render(format)?);
    Ok(())
}
