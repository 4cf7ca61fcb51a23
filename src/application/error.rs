use std::error::Error as StdError;

use thiserror::Error;

use crate::{
    application::{normalize::NormalizeError, repos::SourceError},
    config::LoadError,
    infra::error::InfraError,
};

/// Why a listing could not be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidShape,
    Unreachable,
    Server,
}

impl FailureKind {
    /// Every listing failure can be retried by the user; nothing retries on its own.
    pub fn retryable(self) -> bool {
        true
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::InvalidShape => "invalid_shape",
            FailureKind::Unreachable => "unreachable",
            FailureKind::Server => "server",
        }
    }
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    InvalidShape(#[from] NormalizeError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ListingError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ListingError::InvalidShape(_) => FailureKind::InvalidShape,
            ListingError::Source(SourceError::Unreachable(_)) => FailureKind::Unreachable,
            ListingError::Source(SourceError::Server { .. }) => FailureKind::Server,
            // A body that is not even JSON is as unusable as one in an unknown envelope.
            ListingError::Source(SourceError::Decode(_)) => FailureKind::InvalidShape,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("listing could not be loaded ({})", .0.as_str())]
    ListingUnavailable(FailureKind),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// The error followed by each of its sources, outermost first.
    pub fn chain(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut current = self.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds_follow_error_variants() {
        let shape = ListingError::from(NormalizeError::InvalidShape { found: "null" });
        assert_eq!(shape.kind(), FailureKind::InvalidShape);

        let down = ListingError::from(SourceError::unreachable("connection refused"));
        assert_eq!(down.kind(), FailureKind::Unreachable);

        let server = ListingError::from(SourceError::Server {
            status: 502,
            body: "bad gateway".to_string(),
        });
        assert_eq!(server.kind(), FailureKind::Server);
        assert!(server.kind().retryable());
    }

    #[test]
    fn chain_lists_sources() {
        let err = AppError::from(InfraError::configuration("bad"));
        assert_eq!(err.chain(), vec!["configuration error: bad".to_string()]);
    }
}
