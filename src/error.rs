use thiserror::Error;

/// Faults raised by the recognition-service gateway. All of them are scoped
/// to a single stream generation; none of them crosses a session boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to reach recognition service: {0}")]
    Connect(String),

    #[error("recognition stream failed: {0}")]
    Stream(String),

    #[error("unexpected message from recognition service: {0}")]
    Protocol(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// The stream configuration could not be constructed. Fatal for the
    /// `start` attempt that raised it; the session stays idle and may retry.
    #[error("invalid recognizer configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
