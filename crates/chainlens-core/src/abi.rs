//! Solidity JSON ABI entries and the function view the pipeline works with.
//!
//! Parsing is lenient: every field has a default, `null` strings read as
//! empty, and unknown entry types are kept as [`AbiEntryKind::Unknown`].
//! [`AbiEntry::parse_lenient`] goes one step further and skips entries that
//! still fail, so a verified ABI array is never thrown away.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::selector::Selector;

/// The `type` field of an ABI entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiEntryKind {
    /// Omitted `type` means function.
    #[default]
    Function,
    Event,
    Constructor,
    Fallback,
    Receive,
    Error,
    #[serde(other)]
    Unknown,
}

/// One input/output parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiParam {
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub ty: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

impl AbiParam {
    /// Canonical type used in signatures; tuples expand their components.
    pub fn canonical_type(&self) -> String {
        match self.ty.strip_prefix("tuple") {
            Some(suffix) => {
                let inner: Vec<String> = self.components.iter().map(|c| c.canonical_type()).collect();
                format!("({}){}", inner.join(","), suffix)
            }
            None => self.ty.clone(),
        }
    }
}

/// One entry of a JSON ABI array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type", default)]
    pub kind: AbiEntryKind,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    /// Pre-0.5 compilers mark read-only functions with `constant: true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous: Option<bool>,
}

impl AbiEntry {
    /// Entry-by-entry parse of a JSON ABI array. `None` only when `value`
    /// is not an array; entries that do not parse are counted and dropped.
    pub fn parse_lenient(value: &Value) -> Option<ParsedAbi> {
        let items = value.as_array()?;
        let mut parsed = ParsedAbi::default();
        for item in items {
            match AbiEntry::deserialize(item) {
                Ok(entry) => parsed.entries.push(entry),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unparseable ABI entry");
                    parsed.skipped += 1;
                }
            }
        }
        Some(parsed)
    }

    pub fn is_function(&self) -> bool {
        self.kind == AbiEntryKind::Function
    }

    pub fn is_event(&self) -> bool {
        self.kind == AbiEntryKind::Event
    }

    /// Read/write classification (meaningful for functions only).
    pub fn mutability(&self) -> Mutability {
        match self.state_mutability.as_deref() {
            Some("view") | Some("pure") => Mutability::Read,
            Some(_) => Mutability::Write,
            None if self.constant == Some(true) => Mutability::Read,
            None => Mutability::Write,
        }
    }

    /// `name(type1,type2)`
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|p| p.canonical_type()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// Function view of this entry, if it is a function.
    pub fn as_function(&self) -> Option<FunctionDescriptor> {
        if !self.is_function() {
            return None;
        }
        Some(FunctionDescriptor {
            name: self.name.clone(),
            params: self
                .inputs
                .iter()
                .map(|p| (p.canonical_type(), p.name.clone()))
                .collect(),
            mutability: self.mutability(),
        })
    }
}

/// Result of [`AbiEntry::parse_lenient`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAbi {
    pub entries: Vec<AbiEntry>,
    /// Entries that were present but could not be read.
    pub skipped: usize,
}

impl ParsedAbi {
    pub fn is_complete(&self) -> bool {
        self.skipped == 0
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read-only (view/pure) versus state-changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    Read,
    Write,
}

impl std::fmt::Display for Mutability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// A callable function: name, `(type, name)` parameters and mutability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// May be empty for unnamed entries.
    pub name: String,
    pub params: Vec<(String, String)>,
    pub mutability: Mutability,
}

impl FunctionDescriptor {
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.params.iter().map(|(ty, _)| ty.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    pub fn selector(&self) -> Selector {
        Selector::from_signature(&self.signature())
    }
}

/// All functions of an ABI, in declaration order.
pub fn functions(abi: &[AbiEntry]) -> Vec<FunctionDescriptor> {
    abi.iter().filter_map(AbiEntry::as_function).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: Value) -> Vec<AbiEntry> {
        serde_json::from_value(v).unwrap()
    }

    fn erc20_fragment() -> Value {
        json!([
            {"type": "function", "name": "transfer", "stateMutability": "nonpayable",
             "inputs": [{"type": "address", "name": "to"}, {"type": "uint256", "name": "amount"}],
             "outputs": [{"type": "bool", "name": ""}]},
            {"type": "function", "name": "balanceOf", "stateMutability": "view",
             "inputs": [{"type": "address", "name": "owner"}]},
            {"type": "event", "name": "Transfer", "anonymous": false,
             "inputs": [{"type": "address", "name": "from", "indexed": true}]},
            {"type": "receive", "stateMutability": "payable"}
        ])
    }

    #[test]
    fn parse_and_classify() {
        let abi = parse(erc20_fragment());
        assert_eq!(abi.len(), 4);
        let fns = functions(&abi);
        assert_eq!(fns.len(), 2);
        assert_eq!(fns[0].mutability, Mutability::Write);
        assert_eq!(fns[1].mutability, Mutability::Read);
        assert_eq!(fns[0].signature(), "transfer(address,uint256)");
        assert_eq!(fns[0].selector().to_string(), "0xa9059cbb");
        assert_eq!(fns[1].params, vec![("address".to_string(), "owner".to_string())]);
        assert!(abi[2].is_event());
        assert_eq!(abi[3].kind, AbiEntryKind::Receive);
    }

    #[test]
    fn missing_type_defaults_to_function() {
        let abi = parse(json!([{"name": "totalSupply", "constant": true, "inputs": []}]));
        assert!(abi[0].is_function());
        assert_eq!(abi[0].mutability(), Mutability::Read);
    }

    #[test]
    fn unknown_kind_is_kept() {
        let abi = parse(json!([{"type": "someFutureKind", "name": "x"}]));
        assert_eq!(abi[0].kind, AbiEntryKind::Unknown);
    }

    #[test]
    fn tuple_signature() {
        let abi = parse(json!([{"type": "function", "name": "fill", "inputs": [
            {"type": "tuple[]", "name": "orders", "components": [
                {"type": "address", "name": "maker"}, {"type": "uint256", "name": "amount"}]},
            {"type": "bytes", "name": "sig"}]}]));
        assert_eq!(abi[0].signature(), "fill((address,uint256)[],bytes)");
    }

    #[test]
    fn null_and_missing_strings_read_as_empty() {
        let abi = parse(json!([
            {"type": "function", "name": null, "inputs": [{"name": "x"}, {"type": "uint8", "name": null}]}
        ]));
        assert_eq!(abi[0].name, "");
        assert_eq!(abi[0].inputs[0].ty, "");
        assert_eq!(abi[0].inputs[1].name, "");
    }

    #[test]
    fn lenient_parse_skips_bad_entries() {
        let parsed = AbiEntry::parse_lenient(&json!([
            {"type": "function", "name": "owner", "stateMutability": "view", "inputs": []},
            "transfer",
            {"type": "function", "name": 42},
        ]))
        .unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.skipped, 2);
        assert!(!parsed.is_complete());

        assert!(AbiEntry::parse_lenient(&json!({"abi": []})).is_none());
        assert!(AbiEntry::parse_lenient(&json!([])).unwrap().is_complete());
    }

}
