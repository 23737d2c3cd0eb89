use thiserror::Error;

/// Errors surfaced by a [`LeadSink`](crate::LeadSink).
///
/// Transport and application failures stay distinct: the first means the
/// request never produced a response, the second means the sink answered
/// with a non-success status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// DNS, connection, TLS or timeout failure, or the body could not be read.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The sink answered outside the 2xx range.
    #[error("webhook error {status}: {body}")]
    Application { status: u16, body: String },
    /// The delivery configuration cannot produce a client.
    #[error("invalid delivery config: {0}")]
    InvalidConfig(String),
}

impl DeliveryError {
    pub fn is_transport(&self) -> bool {
        matches!(self, DeliveryError::Transport(_))
    }

    /// HTTP status returned by the sink, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            DeliveryError::Application { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_error_display_carries_status_and_body() {
        let err = DeliveryError::Application {
            status: 500,
            body: "Internal Error".into(),
        };
        assert_eq!(err.to_string(), "webhook error 500: Internal Error");
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_transport());
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = DeliveryError::Transport("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.status(), None);
        assert!(err.is_transport());
    }
}
