// Construction errors for the exporter pipeline

use thiserror::Error;

use crate::source::SourceError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExporterError {
    #[error("stat source failed: {0}")]
    Source(#[from] SourceError),

    #[error("invalid metric definition: {0}")]
    Metric(#[from] prometheus::Error),

    #[error("invalid exporter config: {0}")]
    InvalidConfig(String),
}
