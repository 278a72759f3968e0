//! Errors surfaced to callers of the session, the legacy shim and the
//! configuration layer.
//!
//! Fragment-level problems are [`ParseError`](crate::types::ParseError)s and
//! never show up here; a [`SessionError`] always means the invocation (or the
//! session itself) could not proceed.

use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

/// Error returned by session binding, adaptor registration and pipeline
/// invocations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct SessionError {
    /// Categorised reason for the failure.
    pub kind: Box<SessionErrorKind>,
}

impl SessionError {
    /// Create a new SessionError with the given kind
    pub fn new<T: Into<SessionErrorKind>>(kind: T) -> Self {
        Self {
            kind: Box::new(kind.into()),
        }
    }

    /// Whether this error rejects configuration at bind time.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.kind.as_ref(),
            SessionErrorKind::AdaptorNotRegistered { .. }
                | SessionErrorKind::AdaptorAlreadyRegistered { .. }
                | SessionErrorKind::EmptyDelimiter { .. }
                | SessionErrorKind::DuplicateDelimiter { .. }
                | SessionErrorKind::OverlappingDelimiters { .. }
                | SessionErrorKind::Config(_)
        )
    }
}

/// Describes the specific reason for a [`SessionError`].
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum SessionErrorKind {
    #[error("no document adaptor registered for '{kind}'")]
    AdaptorNotRegistered { kind: &'static str },
    #[error("a document adaptor for '{kind}' is already registered")]
    AdaptorAlreadyRegistered { kind: &'static str },
    #[error("{mode} delimiter pair has an empty {side} string")]
    EmptyDelimiter { mode: &'static str, side: &'static str },
    #[error("delimiter pair ('{open}', '{close}') is listed more than once")]
    DuplicateDelimiter { open: String, close: String },
    #[error("delimiter pairs ('{first}', …) and ('{second}', …) share an opening string")]
    OverlappingDelimiters { first: String, second: String },
    #[error("a typeset invocation is already in progress on this session")]
    InvocationInProgress,
    #[error("pipeline stage '{stage}' run out of order")]
    StageOutOfOrder { stage: &'static str },
    #[error("no typesetting session is ready")]
    SessionNotReady,
    #[error("math anchor no longer points into the document")]
    DetachedAnchor,
    #[error("host document operation failed: {details}")]
    Host { details: String },
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(SessionErrorKind::Config(err.to_string()))
    }
}

impl From<strum::ParseError> for SessionError {
    fn from(err: strum::ParseError) -> Self {
        Self::new(SessionErrorKind::Config(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        let err = SessionError::new(SessionErrorKind::EmptyDelimiter {
            mode: "inline",
            side: "close",
        });
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "inline delimiter pair has an empty close string");

        let busy = SessionError::new(SessionErrorKind::InvocationInProgress);
        assert!(!busy.is_configuration());
    }
}
