use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chains: HashMap<String, ChainConfig>,
    pub default_chain: String,
    pub completion: CompletionConfig,
    pub profile: ProfileConfig,
    pub insight: InsightConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub explorer_api_url: String,
    pub explorer_url: Option<String>,
}

/// Completion-service endpoint (OpenAI-compatible chat API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: Option<u32>,
}

/// Profile / approval-list collaborator (GraphQL over HTTP).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Gates the "verified identity" rendering branch. Off by default; the
    /// report marks an identity verified only when this is enabled and the
    /// caller supplied a world id.
    pub require_identity_verification: bool,
}

impl Default for Config {
    fn default() -> Self {
        let mut chains = HashMap::new();

        chains.insert(
            "ethereum".to_string(),
            ChainConfig {
                chain_id: 1,
                explorer_api_url: "https://api.etherscan.io/api".to_string(),
                explorer_url: Some("https://etherscan.io".to_string()),
            },
        );

        chains.insert(
            "sepolia".to_string(),
            ChainConfig {
                chain_id: 11155111,
                explorer_api_url: "https://api-sepolia.etherscan.io/api".to_string(),
                explorer_url: Some("https://sepolia.etherscan.io".to_string()),
            },
        );

        chains.insert(
            "polygon".to_string(),
            ChainConfig {
                chain_id: 137,
                explorer_api_url: "https://api.polygonscan.com/api".to_string(),
                explorer_url: Some("https://polygonscan.com".to_string()),
            },
        );

        chains.insert(
            "arbitrum".to_string(),
            ChainConfig {
                chain_id: 42161,
                explorer_api_url: "https://api.arbiscan.io/api".to_string(),
                explorer_url: Some("https://arbiscan.io".to_string()),
            },
        );

        Self {
            chains,
            default_chain: "ethereum".to_string(),
            completion: CompletionConfig {
                api_url: "https://api.openai.com/v1/chat/completions".to_string(),
                model: "gpt-4o-mini".to_string(),
                max_tokens: Some(512),
            },
            profile: ProfileConfig {
                api_url: "https://profiles.example.com/graphql".to_string(),
            },
            insight: InsightConfig {
                require_identity_verification: false,
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow!("Failed to create config directory {:?}: {}", parent, e)
                })?;
            }
        }

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path, e))?;

        Ok(())
    }

    /// Load configuration with fallback to default
    pub async fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Self {
        let config = match path {
            Some(path) => match Self::load_from_file(path).await {
                Ok(config) => {
                    tracing::info!("Loaded configuration from file");
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load config file, using defaults: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        config.check_env_vars();
        config
    }

    /// Resolve a chain config by name, falling back to the default chain.
    pub fn chain(&self, chain: Option<&str>) -> Result<&ChainConfig> {
        let name = chain.unwrap_or(&self.default_chain);
        self.chains
            .get(name)
            .ok_or_else(|| anyhow!("Chain '{}' is not configured", name))
    }

    /// Resolve a chain config by its numeric chain id.
    pub fn chain_by_id(&self, chain_id: u64) -> Result<&ChainConfig> {
        self.chains
            .values()
            .find(|c| c.chain_id == chain_id)
            .ok_or_else(|| anyhow!("No configured chain with id {}", chain_id))
    }

    /// Warn about missing credentials; the clients read these lazily from the
    /// environment themselves.
    fn check_env_vars(&self) {
        if std::env::var("ETHERSCAN_API_KEY").is_err() {
            tracing::warn!("ETHERSCAN_API_KEY is not set; explorer requests will be rate-limited");
        }

        if std::env::var("OPENAI_API_KEY").is_err() {
            tracing::warn!(
                "OPENAI_API_KEY is not set; summarization requests will be rejected upstream"
            );
        }
    }

    /// Get default config file path
    pub fn default_config_path() -> Result<std::path::PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("tx-insight").join("config.toml"))
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let sample_config = r#"# tx-insight configuration file
# Configures chains, the completion service, and the profile collaborator.

# Chain to use when a request does not name one
default_chain = "ethereum"

# Chain configurations. explorer_api_url must point at an Etherscan-family API.
[chains.ethereum]
chain_id = 1
explorer_api_url = "https://api.etherscan.io/api"
explorer_url = "https://etherscan.io"

[chains.sepolia]
chain_id = 11155111
explorer_api_url = "https://api-sepolia.etherscan.io/api"
explorer_url = "https://sepolia.etherscan.io"

[chains.polygon]
chain_id = 137
explorer_api_url = "https://api.polygonscan.com/api"
explorer_url = "https://polygonscan.com"

[chains.arbitrum]
chain_id = 42161
explorer_api_url = "https://api.arbiscan.io/api"
explorer_url = "https://arbiscan.io"

# Completion service (OpenAI-compatible chat endpoint)
[completion]
api_url = "https://api.openai.com/v1/chat/completions"
model = "gpt-4o-mini"
max_tokens = 512

# Profile / approval-list service (GraphQL over HTTP)
[profile]
api_url = "https://profiles.example.com/graphql"

[insight]
require_identity_verification = false

# Environment variables:
# ETHERSCAN_API_KEY - explorer API key for contract metadata lookups
# OPENAI_API_KEY    - completion service API key
"#;
        sample_config.to_string()
    }
}
