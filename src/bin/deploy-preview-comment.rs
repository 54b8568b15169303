use anyhow::Context;
use tracing_subscriber::EnvFilter;

use deploy_preview_comment::{read_opts, run_deploy_notification, DeployEvent, RunOutcome};

fn try_main(event: DeployEvent) -> anyhow::Result<RunOutcome> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot build tokio runtime")?;

    Ok(runtime.block_on(run_deploy_notification(event)))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // The exit code is always zero, a failed notification must not fail the deploy.
    let Some(opts) = read_opts(std::env::args_os()) else {
        return;
    };
    let event = opts.into_event(|name| std::env::var(name).ok());

    match try_main(event) {
        Ok(outcome) => tracing::debug!("Finished with {outcome:?}"),
        Err(error) => tracing::error!("Error: {error:?}"),
    }
}
