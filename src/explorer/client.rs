use alloy::json_abi::JsonAbi;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::ChainConfig;
use crate::insight::InsightError;

use super::{ContractDescriptor, ContractLookup};

/// Explorer source configuration
#[derive(Debug, Clone)]
pub struct ExplorerSource {
    pub api_key: Option<String>,
    pub cache_dir: PathBuf,
}

impl Default for ExplorerSource {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tx-insight")
            .join("contract-cache");

        Self {
            api_key: std::env::var("ETHERSCAN_API_KEY").ok(),
            cache_dir,
        }
    }
}

/// Fetches and caches verified-contract metadata (name, source, ABI) from
/// Etherscan-family explorer APIs.
#[derive(Debug)]
pub struct ExplorerClient {
    client: Client,
    config: ExplorerSource,
    memory_cache: HashMap<String, ContractDescriptor>,
}

impl ExplorerClient {
    pub fn new(config: ExplorerSource) -> Self {
        Self {
            client: Client::new(),
            config,
            memory_cache: HashMap::new(),
        }
    }

    /// Get metadata for a contract, trying cache first, then the explorer.
    /// "Not verified" results are never cached.
    pub async fn get_contract(
        &mut self,
        address: &str,
        chain: &ChainConfig,
    ) -> Result<ContractLookup, InsightError> {
        let address = address.to_lowercase();
        let cache_key = format!("{}_{}", chain.chain_id, address);

        if let Some(descriptor) = self.memory_cache.get(&cache_key) {
            debug!("contract cache hit for {}", address);
            return Ok(ContractLookup::Verified(descriptor.clone()));
        }

        if let Ok(descriptor) = self.load_cached_contract(&cache_key).await {
            debug!("contract disk cache hit for {}", address);
            self.memory_cache.insert(cache_key.clone(), descriptor.clone());
            return Ok(ContractLookup::Verified(descriptor));
        }

        info!("fetching contract metadata from explorer for {}", address);
        let lookup = self.fetch_from_explorer(&address, chain).await?;

        if let ContractLookup::Verified(descriptor) = &lookup {
            if let Err(e) = self.cache_contract(&cache_key, descriptor).await {
                warn!("failed to cache contract metadata for {}: {}", address, e);
            }
            self.memory_cache.insert(cache_key, descriptor.clone());
        }

        Ok(lookup)
    }

    /// Fetch verified source metadata via the getsourcecode endpoint.
    async fn fetch_from_explorer(
        &self,
        address: &str,
        chain: &ChainConfig,
    ) -> Result<ContractLookup, InsightError> {
        let mut url = format!(
            "{}?module=contract&action=getsourcecode&address={}",
            chain.explorer_api_url, address
        );

        if let Some(api_key) = &self.config.api_key {
            url.push_str(&format!("&apikey={}", api_key));
        }

        let response: Value = self.client.get(&url).send().await?.json().await?;

        if response["status"] != "1" {
            let message = response["message"].as_str().unwrap_or("Unknown error");
            let detail = response["result"].as_str().unwrap_or("");
            return Err(InsightError::Lookup(super::utils::interpret_explorer_error(
                &format!("{} {}", message, detail),
                address,
            )));
        }

        let entry = response["result"]
            .get(0)
            .ok_or_else(|| InsightError::Lookup("empty explorer result".to_string()))?;

        let abi_str = entry["ABI"].as_str().unwrap_or_default();
        let source_text = entry["SourceCode"].as_str().unwrap_or_default();

        // Etherscan reports unverified contracts with status 1 and a sentinel
        // ABI string.
        if abi_str.is_empty()
            || abi_str == "Contract source code not verified"
            || source_text.is_empty()
        {
            debug!("contract {} has no verified source", address);
            return Ok(ContractLookup::NotVerified);
        }

        let abi: JsonAbi = serde_json::from_str(abi_str)
            .map_err(|e| InsightError::Lookup(format!("failed to parse ABI JSON: {}", e)))?;

        let name = entry["ContractName"]
            .as_str()
            .unwrap_or("UnknownContract")
            .to_string();

        Ok(ContractLookup::Verified(ContractDescriptor {
            name,
            source_text: source_text.to_string(),
            abi,
        }))
    }

    /// Load contract metadata from disk cache
    async fn load_cached_contract(&self, cache_key: &str) -> Result<ContractDescriptor, InsightError> {
        let cache_path = self.config.cache_dir.join(format!("{}.json", cache_key));

        if !cache_path.exists() {
            return Err(InsightError::Lookup("cache file does not exist".to_string()));
        }

        let content = fs::read_to_string(&cache_path)
            .await
            .map_err(|e| InsightError::Lookup(format!("failed to read cache file: {}", e)))?;

        let descriptor: ContractDescriptor = serde_json::from_str(&content)
            .map_err(|e| InsightError::Lookup(format!("failed to parse cached metadata: {}", e)))?;

        Ok(descriptor)
    }

    /// Save contract metadata to disk cache
    async fn cache_contract(
        &self,
        cache_key: &str,
        descriptor: &ContractDescriptor,
    ) -> Result<(), InsightError> {
        if !self.config.cache_dir.exists() {
            fs::create_dir_all(&self.config.cache_dir)
                .await
                .map_err(|e| InsightError::Lookup(format!("failed to create cache dir: {}", e)))?;
        }

        let cache_path = self.config.cache_dir.join(format!("{}.json", cache_key));
        let content = serde_json::to_string(descriptor)
            .map_err(|e| InsightError::Lookup(format!("failed to serialize metadata: {}", e)))?;

        fs::write(&cache_path, content)
            .await
            .map_err(|e| InsightError::Lookup(format!("failed to write cache file: {}", e)))?;

        debug!("cached contract metadata to {:?}", cache_path);
        Ok(())
    }

    /// Seed metadata manually, bypassing the explorer.
    #[allow(dead_code)]
    pub fn add_manual_contract(
        &mut self,
        address: &str,
        chain_id: u64,
        descriptor: ContractDescriptor,
    ) {
        let cache_key = format!("{}_{}", chain_id, address.to_lowercase());
        self.memory_cache.insert(cache_key, descriptor);
        info!("added manual contract metadata for {}", address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn mainnet() -> ChainConfig {
        ChainConfig {
            chain_id: 1,
            explorer_api_url: "https://api.etherscan.io/api".to_string(),
            explorer_url: None,
        }
    }

    fn token_descriptor() -> ContractDescriptor {
        ContractDescriptor {
            name: "Token".to_string(),
            source_text: "contract Token {}".to_string(),
            abi: serde_json::from_str("[]").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_explorer_client_creation() {
        let temp_dir = tempdir().unwrap();
        let config = ExplorerSource {
            api_key: None,
            cache_dir: temp_dir.path().to_path_buf(),
        };

        let client = ExplorerClient::new(config);
        assert!(client.memory_cache.is_empty());
    }

    #[tokio::test]
    async fn test_manual_contract_is_served_from_memory() {
        let temp_dir = tempdir().unwrap();
        let config = ExplorerSource {
            api_key: None,
            cache_dir: temp_dir.path().to_path_buf(),
        };

        let mut client = ExplorerClient::new(config);
        client.add_manual_contract("0xABC", 1, token_descriptor());

        let lookup = client.get_contract("0xABC", &mainnet()).await.unwrap();
        let ContractLookup::Verified(descriptor) = lookup else {
            panic!("manual contract should resolve as verified");
        };
        assert_eq!(descriptor.name, "Token");
    }

    #[tokio::test]
    async fn test_disk_cache_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config = ExplorerSource {
            api_key: None,
            cache_dir: temp_dir.path().to_path_buf(),
        };

        let client = ExplorerClient::new(config);
        client
            .cache_contract("1_0xabc", &token_descriptor())
            .await
            .unwrap();

        let cached = client.load_cached_contract("1_0xabc").await.unwrap();
        assert_eq!(cached.name, "Token");
        assert_eq!(cached.source_text, "contract Token {}");
    }
}
