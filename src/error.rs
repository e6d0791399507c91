//! Unified error handling for hubbubd.

use thiserror::Error;

/// Errors that end a session's worker.
///
/// Transport and framing failures tear the session down silently (no
/// leave notice); only a graceful `__QUIT` announces the departure.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("framing error: {0}")]
    Framing(#[from] hubbub_proto::ProtocolError),
}

/// Result type for session workers.
pub type SessionResult = Result<(), SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_io_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer gone");
        let err = SessionError::from(io);
        assert!(matches!(err, SessionError::Transport(_)));
        assert!(err.to_string().contains("peer gone"));
    }
}
