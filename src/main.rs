use mail_sync::configuration::get_configuration;
use mail_sync::startup::SyncJob;
use mail_sync::telemetry::get_subscriber;
use mail_sync::telemetry::init_subscriber;

/// Initialise telemetry, load config, and run the sync job to completion.
/// One shot: any API failure mid-run aborts with a non-zero exit, leaving
/// the list partially updated; the next run reconciles the remainder.
#[tokio::main] // requires tokio features: macros, rt-multi-thread
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("mail-sync", "info", std::io::stdout);
    init_subscriber(subscriber);

    let cfg = get_configuration().expect("failed to read configuration");
    let job = SyncJob::build(cfg)?;
    job.run_until_completion().await?;

    Ok(())
}
