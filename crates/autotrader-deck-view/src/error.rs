/*
[INPUT]:  Backend acknowledgments, transport errors and serializer failures
[OUTPUT]: User-facing action errors and export errors
[POS]:    Error layer - the only failures this crate surfaces to the viewer
[UPDATE]: When a new user-visible failure category appears
*/

use autotrader_deck_adapter::{ActionAck, DeckError};
use thiserror::Error;

/// Message shown when the backend rejects without saying why
pub const GENERIC_REJECTION: &str = "Action was rejected by the trading backend";

/// Message shown for any transport failure of a manual action
pub const GENERIC_NETWORK_ERROR: &str = "Network error: could not reach the trading backend";

/// Failure of a manual action (toggle, execute, start, stop)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Backend answered with `success = false`
    #[error("{message}")]
    Rejected { message: String },

    /// Request never got a well-formed answer
    #[error("{message}")]
    Network { message: String },
}

impl ActionError {
    pub fn rejected(ack: &ActionAck) -> Self {
        ActionError::Rejected {
            message: ack.reason().unwrap_or(GENERIC_REJECTION).to_string(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ActionError::Rejected { message } | ActionError::Network { message } => message,
        }
    }
}

/// Transport and error-status failures. The cause is logged, never shown.
impl From<DeckError> for ActionError {
    fn from(_: DeckError) -> Self {
        ActionError::Network {
            message: GENERIC_NETWORK_ERROR.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export buffer could not be finalized: {0}")]
    Buffer(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_prefers_backend_message() {
        let err = ActionError::rejected(&ActionAck::rejected("Trader already running"));
        assert_eq!(err.message(), "Trader already running");
    }

    #[test]
    fn rejection_without_reason_is_generic() {
        let ack = ActionAck {
            success: false,
            message: None,
            error: None,
        };
        assert_eq!(ActionError::rejected(&ack).message(), GENERIC_REJECTION);
    }

    #[test]
    fn transport_errors_become_network_errors() {
        let err = ActionError::from(DeckError::Timeout { duration: 30 });
        assert!(matches!(err, ActionError::Network { .. }));
        assert_eq!(err.message(), GENERIC_NETWORK_ERROR);
    }

    #[test]
    fn error_status_bodies_are_not_shown() {
        let err = ActionError::from(DeckError::Api {
            code: 502,
            message: "<html><body>502 Bad Gateway</body></html>".to_string(),
        });
        assert_eq!(
            err,
            ActionError::Network {
                message: GENERIC_NETWORK_ERROR.to_string()
            }
        );
    }
}
