// Entrypoint: resolve configuration, install tracing, run the pipeline once.
// Any error bubbles out of `main`, which exits non-zero.

use anyhow::Context;
use clap::Parser;
use pinup::{
    api::PinataClient,
    config::{load_dotenv, CliArgs, Config},
    pipeline, ui,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `--dotenv` has to be known before env-backed args are resolved, so do a
    // lenient first pass; errors and `--help` are left to the real parse below
    let dotenv = CliArgs::try_parse().ok().and_then(|args| args.dotenv);
    load_dotenv(dotenv.as_deref())?;

    let args = CliArgs::parse();
    let mut config = Config::build(args)?;

    let spinner = ui::spinner();
    let log_writer = ui::SuspendingWriter::new(spinner.clone());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false)
                .with_writer(move || log_writer.clone()),
        )
        .with(config.tracing_env_filter()?)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if config.jwt.is_empty() {
        tracing::warn!("PINATA_JWT is not set, requests will be sent with an empty bearer token");
    }

    if config.interactive {
        config.asset = ui::prompt_asset(config.asset)?;
    }

    let client = PinataClient::new(&config)?;

    ui::start_spinner(&spinner, "Pinning to IPFS...");
    let result = pipeline::run(&client, &config.asset).await;
    spinner.finish_and_clear();

    let pinned = result?;
    ui::print_summary(&pinned, client.gateway_url());
    Ok(())
}
