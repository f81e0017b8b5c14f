pub mod client;
pub mod utils;

pub use client::{ExplorerClient, ExplorerSource};

use alloy::json_abi::JsonAbi;
use serde::{Deserialize, Serialize};

/// Verified-contract metadata fetched from an explorer service. Immutable
/// after fetch; one instance per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractDescriptor {
    pub name: String,
    pub source_text: String,
    pub abi: JsonAbi,
}

/// Outcome of a metadata lookup. An unverified contract is ordinary data
/// here; the pipeline turns it into a warning, not a failure.
#[derive(Debug, Clone)]
pub enum ContractLookup {
    Verified(ContractDescriptor),
    NotVerified,
}

impl ContractLookup {
    pub fn is_verified(&self) -> bool {
        matches!(self, ContractLookup::Verified(_))
    }
}
