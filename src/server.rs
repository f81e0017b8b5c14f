use anyhow::Result;
use rmcp::{
    model::{ServerCapabilities, ServerInfo},
    tool,
    transport::stdio,
    ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    config::Config,
    insight::orchestrator::{IdentityContext, InsightEngine},
    insight::PendingTransaction,
};

#[derive(Debug, Clone)]
pub struct TxInsightServer {
    engine: Arc<InsightEngine>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
struct ExplainTransactionRequest {
    /// Sender wallet address
    from: String,
    /// Contract the transaction calls into
    to: String,
    /// Hex-encoded call data
    data: String,
    /// Numeric chain id of the pending transaction
    chain_id: u64,
    /// Caller identity, when one has been assigned
    world_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
struct SummarizeCallRequest {
    contract_address: String,
    /// Hex-encoded call data
    data: String,
    chain: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
struct DecodeCallRequest {
    contract_address: String,
    /// Hex-encoded call data
    data: String,
    chain: Option<String>,
}

impl TxInsightServer {
    pub fn new(config: Config) -> Result<Self> {
        let engine = Arc::new(InsightEngine::new(Arc::new(config)));
        Ok(Self { engine })
    }

    pub async fn run(&self) -> Result<()> {
        info!("Starting tx-insight server");

        let service = self.clone().serve(stdio()).await?;

        info!("tx-insight server started successfully");
        let _ = service.waiting().await;
        Ok(())
    }
}

#[tool(tool_box)]
impl TxInsightServer {
    #[tool(
        description = "Explain a pending transaction: sender profile, touched approvals, and a plain-English summary of the contract call"
    )]
    async fn explain_transaction(&self, #[tool(aggr)] request: ExplainTransactionRequest) -> String {
        let tx = PendingTransaction {
            from: request.from,
            to: request.to,
            data: request.data,
            chain_id: request.chain_id,
        };

        let identity = match request.world_id {
            Some(world_id) => IdentityContext::with_world_id(world_id),
            None => IdentityContext::unset(),
        };

        match self.engine.explain(&tx, &identity).await {
            Ok(report) => serde_json::to_string_pretty(&report)
                .unwrap_or_else(|_| "Failed to serialize insight report".to_string()),
            Err(e) => {
                error!("Failed to explain transaction: {}", e);
                "Error: could not produce a transaction explanation".to_string()
            }
        }
    }

    #[tool(
        description = "Produce a plain-English summary of what a contract call will do, from its verified source"
    )]
    async fn summarize_contract_call(&self, #[tool(aggr)] request: SummarizeCallRequest) -> String {
        match self
            .engine
            .summarize(
                request.chain.as_deref(),
                &request.contract_address,
                &request.data,
            )
            .await
        {
            Ok(summary) => serde_json::to_string_pretty(&summary)
                .unwrap_or_else(|_| "Failed to serialize summary".to_string()),
            Err(e) => {
                error!("Failed to summarize contract call: {}", e);
                "Error: could not summarize the contract call".to_string()
            }
        }
    }

    #[tool(description = "Decode hex call data against a contract's verified ABI")]
    async fn decode_contract_call(&self, #[tool(aggr)] request: DecodeCallRequest) -> String {
        match self
            .engine
            .decode(
                request.chain.as_deref(),
                &request.contract_address,
                &request.data,
            )
            .await
        {
            Ok(decoded) => serde_json::to_string_pretty(&decoded)
                .unwrap_or_else(|_| "Failed to serialize decoded call".to_string()),
            Err(e) => {
                error!("Failed to decode contract call: {}", e);
                format!("Error: {}", e)
            }
        }
    }
}

#[tool(tool_box)]
impl ServerHandler for TxInsightServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Transaction insight server. Explains what a pending contract call will do by \
                 decoding its call data against the verified ABI, extracting the matching source \
                 snippet, and summarizing it in plain English. Also surfaces sender profile and \
                 approval-list lookups."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
