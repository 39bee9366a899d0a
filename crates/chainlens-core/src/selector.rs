//! 4-byte function selectors and the bytecode selector scan.
//!
//! A selector is the first 4 bytes of `keccak256("name(type1,type2)")`.
//! Solidity dispatchers compare the calldata selector against constants
//! pushed with `PUSH4` (`0x63`), so scanning deployed code for that opcode
//! recovers most of the public interface without source metadata.
//!
//! The scan is deliberately naive: it does not walk instruction boundaries,
//! so a `0x63` byte inside the immediate data of an earlier `PUSHn` also
//! yields a candidate. Downstream enrichment treats every result as a guess.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tiny_keccak::{Hasher, Keccak};

/// `PUSH4` opcode.
pub const PUSH4: u8 = 0x63;

/// A 4-byte function selector, rendered as `0x` + 8 lowercase hex chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector([u8; 4]);

impl Selector {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Selector of a canonical signature, e.g. `transfer(address,uint256)`.
    pub fn from_signature(signature: &str) -> Self {
        let mut hasher = Keccak::v256();
        let mut output = [0u8; 32];
        hasher.update(signature.as_bytes());
        hasher.finalize(&mut output);
        Self([output[0], output[1], output[2], output[3]])
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 8 {
            return Err(format!("selector must be 8 hex characters, got {s:?}"));
        }
        let mut bytes = [0u8; 4];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| format!("{s:?}: {e}"))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Scan hex-encoded bytecode for `PUSH4` immediates.
///
/// Returns each distinct candidate once, in the order it was first seen.
/// Code shorter than 5 bytes, or input that is not hex, yields an empty list.
/// A trailing odd nibble is ignored.
pub fn extract_selectors(bytecode: &str) -> Vec<Selector> {
    let digits = bytecode.strip_prefix("0x").unwrap_or(bytecode).as_bytes();
    let even = &digits[..digits.len() - digits.len() % 2];
    match hex::decode(even) {
        Ok(code) => scan_push4(&code),
        Err(_) => Vec::new(),
    }
}

/// Byte-level form of [`extract_selectors`].
///
/// A `PUSH4` whose immediate ends exactly at the last byte still counts.
pub fn scan_push4(code: &[u8]) -> Vec<Selector> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    if code.len() < 5 {
        return out;
    }
    for i in 0..code.len() - 4 {
        if code[i] != PUSH4 {
            continue;
        }
        let selector = Selector([code[i + 1], code[i + 2], code[i + 3], code[i + 4]]);
        if seen.insert(selector) {
            out.push(selector);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_selector_from_signature() {
        let sel = Selector::from_signature("transfer(address,uint256)");
        assert_eq!(sel.to_string(), "0xa9059cbb");
    }

    #[test]
    fn single_push4() {
        let found = extract_selectors("0x6000600063a9059cbb600052");
        assert_eq!(found, vec!["0xa9059cbb".parse::<Selector>().unwrap()]);
    }

    #[test]
    fn short_code_is_empty() {
        assert!(extract_selectors("0x60").is_empty());
        assert!(extract_selectors("0x").is_empty());
        assert!(extract_selectors("").is_empty());
        assert!(extract_selectors("0x63a9059c").is_empty());
    }

    #[test]
    fn push4_at_the_very_end_counts() {
        let found = extract_selectors("63a9059cbb");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn duplicates_collapse_in_first_seen_order() {
        let code = "0x6370a082311463a9059cbb146370a0823114";
        let found: Vec<String> = extract_selectors(code).iter().map(|s| s.to_string()).collect();
        assert_eq!(found, vec!["0x70a08231", "0xa9059cbb"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let code = "0x608060405234801561001057600080fd5b506004361061003657\
                    60003560e01c806306fdde031461003b578063095ea7b31461005957";
        let a = extract_selectors(code);
        let b = extract_selectors(code);
        assert_eq!(a, b);
        assert!(a.contains(&"0x06fdde03".parse().unwrap()));
        assert!(a.contains(&"0x095ea7b3".parse().unwrap()));
    }

    #[test]
    fn push_data_false_positives_are_kept() {
        // PUSH2 0x6311 followed by bytes: the 0x63 inside the immediate is still scanned.
        let found = extract_selectors("0x61631122334455");
        assert_eq!(found, vec!["0x11223344".parse::<Selector>().unwrap()]);
    }

    #[test]
    fn non_hex_input_is_empty() {
        assert!(extract_selectors("0xzz63a9059cbb00").is_empty());
    }

    #[test]
    fn non_ascii_input_is_empty() {
        assert!(extract_selectors("0x6\u{e9}").is_empty());
        assert!(extract_selectors("63a9059cbb\u{e9}").is_empty());
        assert!(extract_selectors("\u{1F600}").is_empty());
    }

    #[test]
    fn odd_trailing_nibble_ignored() {
        assert_eq!(extract_selectors("0x63a9059cbb0").len(), 1);
    }

    #[test]
    fn selector_parse_and_serde() {
        let sel: Selector = "A9059CBB".parse().unwrap();
        assert_eq!(sel.to_hex(), "0xa9059cbb");
        let json = serde_json::to_string(&sel).unwrap();
        assert_eq!(json, "\"0xa9059cbb\"");
        let back: Selector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sel);
        assert!("0xa9059c".parse::<Selector>().is_err());
    }
}
