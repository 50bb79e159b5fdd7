use anyhow::Result;
use edgemax_exporter::aggregator::spawn_stats_logger;
use edgemax_exporter::exporter::Exporter;
use edgemax_exporter::source::JsonLinesSource;
use edgemax_exporter::{config, routes};
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// How long shutdown waits for the dispatch task to drain the closed feed.
const DISPATCH_GRACE: Duration = Duration::from_secs(5);

/// A stdin feed parks a blocking read on a runtime thread; don't wait on it at exit.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

fn main() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run());
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
    result
}

async fn run() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;

    let mut source = JsonLinesSource::from_config(&app_config.source);
    let (exporter, mut aggregator) = Exporter::new(&mut source, &app_config.metrics)
        .map_err(|e| anyhow::anyhow!("failed to create EdgeMAX exporter: {}", e))?;

    let registry = prometheus::Registry::new();
    registry.register(Box::new(exporter))?;

    let stats_logger = spawn_stats_logger(
        aggregator.stats(),
        Duration::from_secs(app_config.monitoring.stats_log_interval_secs),
    );

    let app = routes::app(registry, &app_config.server);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "Starting EdgeMAX exporter on http://{}{}",
        addr,
        app_config.server.metrics_path
    );

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
        }
    }

    stats_logger.abort();
    aggregator.shutdown()?;
    if !aggregator.join_dispatch(DISPATCH_GRACE).await {
        tracing::warn!(
            grace_secs = DISPATCH_GRACE.as_secs(),
            "dispatch task still running after shutdown"
        );
    }

    Ok(())
}
