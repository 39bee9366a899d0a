//! Validated resolution input.

use std::fmt;

use crate::chain::ChainTable;
use crate::error::ResolveError;

/// Chain used when the caller does not name one.
pub const DEFAULT_CHAIN_ID: &str = "1";

/// An immutable, validated `(chain, address)` pair.
///
/// The address is stored in canonical lowercase form, so two queries that
/// differ only in address casing produce the same [`cache_key`](Self::cache_key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractQuery {
    chain_id: String,
    address: String,
}

impl ContractQuery {
    /// Validate raw input against the address pattern `^0x[a-fA-F0-9]{40}$`
    /// and the supported chain table.
    pub fn parse(
        chain_id: Option<&str>,
        address: &str,
        chains: &ChainTable,
    ) -> Result<Self, ResolveError> {
        let chain_id = chain_id.map(str::trim).unwrap_or(DEFAULT_CHAIN_ID);
        if chain_id.is_empty() {
            return Err(ResolveError::invalid("chainId must not be empty"));
        }
        if !chains.supports(chain_id) {
            return Err(ResolveError::invalid(format!(
                "unsupported chainId {chain_id}"
            )));
        }
        if !is_valid_address(address) {
            return Err(ResolveError::invalid(format!(
                "address must be 0x followed by 40 hex characters, got {address:?}"
            )));
        }
        Ok(Self {
            chain_id: chain_id.to_string(),
            address: address.to_ascii_lowercase(),
        })
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Lowercase `0x`-prefixed address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// `chainId:address`, the response cache key.
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.chain_id, self.address)
    }
}

impl fmt::Display for ContractQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.address, self.chain_id)
    }
}

/// `^0x[a-fA-F0-9]{40}$`
pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}
