//! Error types for the resolution pipeline.

use thiserror::Error;

/// Outcomes of a resolution that are visible to the caller.
///
/// Every other failure (a source timing out, a bad payload, a missing oracle)
/// is contained by the component that made the call and degrades to "no data".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Malformed address, unsupported chain or missing required field.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Every source was exhausted without usable data.
    #[error("Contract not found or no data available")]
    NotFound { chain_id: String, address: String },
}

impl ResolveError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the caller sent a bad request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Returns `true` if no source knew the contract.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure of a single external call.
///
/// Source implementations produce these internally and fold them into an
/// absence value before returning to the orchestrator.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Connection refused, TLS failure, body read failure, etc.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote answered with a non-success status.
    #[error("{source_name} returned HTTP {status}")]
    Status { source_name: String, status: u16 },

    /// The call exceeded its deadline.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The payload could not be interpreted.
    #[error("Malformed payload from {source_name}: {reason}")]
    Malformed { source_name: String, reason: String },

    /// JSON-RPC error object returned by a node.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The chain has no entry for this source.
    #[error("Chain {chain_id} is not supported by {source_name}")]
    Unsupported { source_name: String, chain_id: String },
}

impl SourceError {
    pub fn malformed(source_name: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` if the failure was a deadline rather than a bad answer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ResolveError::invalid("bad address").is_client_error());
        let nf = ResolveError::NotFound {
            chain_id: "1".into(),
            address: "0x00".into(),
        };
        assert!(nf.is_not_found());
        assert!(!nf.is_client_error());
        assert_eq!(nf.to_string(), "Contract not found or no data available");
    }

    #[test]
    fn source_error_display() {
        let e = SourceError::Status {
            source_name: "blockscout".into(),
            status: 502,
        };
        assert_eq!(e.to_string(), "blockscout returned HTTP 502");
        assert!(SourceError::Timeout { ms: 6000 }.is_timeout());
    }
}
