pub mod completion;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod resolver;
pub mod snippet;

pub use error::InsightError;

use alloy::json_abi::Function;
use serde::{Deserialize, Serialize};

/// A pending transaction as handed over by the wallet host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub from: String,
    pub to: String,
    pub data: String,
    pub chain_id: u64,
}

/// A decoded value from a contract call, one variant per ABI primitive
/// category. Numbers are carried as decimal strings since uint256 does not
/// fit in any JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CallArgument {
    Address(String),
    Uint(String),
    Int(String),
    Bool(bool),
    Bytes(String),
    String(String),
    Array(Vec<CallArgument>),
    Tuple(Vec<CallArgument>),
}

/// Result of resolving call data against a contract ABI. An unmatched
/// selector yields an empty name and no arguments; that is a reportable
/// condition, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedCall {
    pub function_name: String,
    pub arguments: Vec<CallArgument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<Function>,
}

impl DecodedCall {
    pub fn unmatched() -> Self {
        Self {
            function_name: String::new(),
            arguments: Vec::new(),
            fragment: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        !self.function_name.is_empty()
    }
}

/// Outcome of the summarization pipeline for a single call.
#[derive(Debug, Clone, Serialize)]
pub struct CallSummary {
    pub text: String,
    pub contract_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<DecodedCall>,
}

/// Everything the orchestrator gathers for one pending transaction.
#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub profile: serde_json::Value,
    pub approvals: serde_json::Value,
    pub summary: CallSummary,
    pub identity_verified: bool,
}
