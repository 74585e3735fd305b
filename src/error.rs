use thiserror::Error;

/// Failures of the four remote calls a tick or reconciliation can make.
///
/// None of these are fatal: callers log them and carry on with the next tick.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("transport failure calling {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        endpoint: &'static str,
        reason: String,
    },
}

impl PipelineError {
    pub(crate) fn from_reqwest(endpoint: &'static str, error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::MalformedResponse {
                endpoint,
                reason: error.to_string(),
            };
        }

        Self::Transport {
            endpoint,
            source: error,
        }
    }

    pub(crate) fn malformed(endpoint: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } | Self::Status { .. } => "transport_failure",
            Self::MalformedResponse { .. } => "malformed_response",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::MalformedResponse { endpoint, .. } => endpoint,
        }
    }

    #[cfg(test)]
    pub(crate) fn unavailable(endpoint: &'static str) -> Self {
        Self::Status {
            endpoint,
            status: 503,
        }
    }
}
