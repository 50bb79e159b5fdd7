use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

fn default_metrics_path() -> String {
    "/metrics".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Prefix for every exported metric name (`<namespace>_<subsystem>_<name>`).
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Capacity of each per-category queue. Dispatch waits when a queue is full; nothing is dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_namespace() -> String {
    "edgemax".into()
}

fn default_queue_capacity() -> usize {
    1
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Newline-delimited JSON feed; `-` reads stdin.
    #[serde(default = "default_source_path")]
    pub path: String,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_source_path() -> String {
    "-".into()
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often to log dispatch totals at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.server.metrics_path.starts_with('/') && self.server.metrics_path.len() > 1,
            "server.metrics_path must start with '/' and name a path, got {:?}",
            self.server.metrics_path
        );
        anyhow::ensure!(
            self.server.metrics_path != "/version",
            "server.metrics_path must not shadow /version"
        );
        anyhow::ensure!(
            is_valid_namespace(&self.metrics.namespace),
            "metrics.namespace must match [a-zA-Z_][a-zA-Z0-9_]*, got {:?}",
            self.metrics.namespace
        );
        anyhow::ensure!(
            self.metrics.queue_capacity > 0,
            "metrics.queue_capacity must be > 0, got {}",
            self.metrics.queue_capacity
        );
        anyhow::ensure!(!self.source.path.is_empty(), "source.path must be non-empty");
        anyhow::ensure!(
            self.source.channel_capacity > 0,
            "source.channel_capacity must be > 0, got {}",
            self.source.channel_capacity
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}

fn is_valid_namespace(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
