use thiserror::Error;

/// Failures surfaced by an [`AudioBackend`](crate::AudioBackend).
///
/// The soundscape treats every variant as recoverable: the affected layer is
/// skipped and the rest of the engine keeps running.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio is not supported on this platform")]
    Unsupported,
    #[error("failed to construct {node}: {reason}")]
    NodeConstruction { node: &'static str, reason: String },
    #[error("audio context is closed")]
    ContextClosed,
}

/// Failures of the remote report service. Never shown to the user; every
/// variant resolves to the local fallback table.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("report service responded with status {0}")]
    Status(u16),
    #[error("malformed report payload: {0}")]
    Malformed(String),
}
