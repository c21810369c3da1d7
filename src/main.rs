use clap::Parser;
use task_manager_e2e::browser::BrowserSession;
use task_manager_e2e::config::SuiteConfig;
use task_manager_e2e::scenarios;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();

    let config = SuiteConfig::parse();
    let poll = config.poll_config()?;
    let selected = config.selected_scenarios();

    tracing::info!(
        "Running {} scenario(s) against {} (timeout: {}ms, interval: {}ms)",
        selected.len(),
        config.url,
        config.timeout_ms,
        config.interval_ms
    );

    let session = BrowserSession::launch(&config.browser_options()).await?;

    // Run the suite OR stop on a termination signal, whichever comes first
    let report = tokio::select! {
        report = scenarios::run(&session, &config.url, poll, &selected) => Some(report),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received interrupt signal, shutting down");
            None
        }
    };

    // Always kill Chrome before exiting
    let closed = session.close().await;
    scenarios::conclude(report, closed)
}
