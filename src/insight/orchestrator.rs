use std::sync::Arc;

use crate::config::{ChainConfig, Config};
use crate::explorer::{utils, ContractLookup, ExplorerClient, ExplorerSource};
use crate::profile::{ProfileApi, ProfileClient};

use super::{
    completion::{CompletionApi, OpenAiClient},
    prompt::{prepare_request, SummaryRequest},
    resolver::resolve_function_call,
    CallSummary, DecodedCall, InsightError, InsightReport, PendingTransaction,
};

/// The 4-step summarization pipeline: metadata lookup, ABI decode, snippet
/// extraction, completion relay.
#[derive(Debug)]
pub struct SummaryPipeline<C> {
    explorer: ExplorerClient,
    completion: C,
}

impl<C: CompletionApi> SummaryPipeline<C> {
    pub fn new(explorer: ExplorerClient, completion: C) -> Self {
        Self {
            explorer,
            completion,
        }
    }

    /// Fetch metadata and produce a summary for one contract call.
    pub async fn summarize(
        &mut self,
        chain: &ChainConfig,
        contract_address: &str,
        call_data: &str,
    ) -> Result<CallSummary, InsightError> {
        let lookup = self.explorer.get_contract(contract_address, chain).await?;
        self.summarize_lookup(contract_address, &lookup, call_data).await
    }

    /// Summarize against an already-fetched lookup. Degraded plans return
    /// their warning verbatim without touching the completion service.
    pub async fn summarize_lookup(
        &self,
        contract_address: &str,
        lookup: &ContractLookup,
        call_data: &str,
    ) -> Result<CallSummary, InsightError> {
        match prepare_request(contract_address, lookup, call_data) {
            SummaryRequest::Degraded { warning } => Ok(CallSummary {
                text: warning.to_string(),
                contract_verified: lookup.is_verified(),
                decoded: None,
            }),
            SummaryRequest::Complete { prompt, decoded } => {
                let text = self.completion.complete(&prompt).await?;
                Ok(CallSummary {
                    text,
                    contract_verified: true,
                    decoded: Some(decoded),
                })
            }
        }
    }

    /// Decode call data against the contract's verified ABI without
    /// summarizing.
    pub async fn decode(
        &mut self,
        chain: &ChainConfig,
        contract_address: &str,
        call_data: &str,
    ) -> Result<DecodedCall, InsightError> {
        match self.explorer.get_contract(contract_address, chain).await? {
            ContractLookup::Verified(descriptor) => {
                resolve_function_call(call_data, &descriptor.abi)
            }
            ContractLookup::NotVerified => {
                Err(InsightError::NotVerified(contract_address.to_string()))
            }
        }
    }
}

/// Caller-supplied identity state. Replaces the wallet plugin's ambient
/// "world id" global: starts unset, updated explicitly.
#[derive(Debug, Clone, Default)]
pub struct IdentityContext {
    world_id: Option<String>,
}

impl IdentityContext {
    /// Initial state: no world id has been assigned yet.
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn with_world_id(world_id: impl Into<String>) -> Self {
        Self {
            world_id: Some(world_id.into()),
        }
    }

    #[allow(dead_code)]
    pub fn set_world_id(&mut self, world_id: impl Into<String>) {
        self.world_id = Some(world_id.into());
    }

    #[allow(dead_code)]
    pub fn world_id(&self) -> Option<&str> {
        self.world_id.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.world_id.is_some()
    }
}

/// Gathers everything the wallet needs to render a pending transaction:
/// sender profile, approval list, and the call summary. Generic over its
/// collaborators the same way [`SummaryPipeline`] is.
#[derive(Debug)]
pub struct InsightEngine<C = OpenAiClient, P = ProfileClient> {
    config: Arc<Config>,
    profile: P,
    pipeline: Arc<tokio::sync::Mutex<SummaryPipeline<C>>>,
}

impl InsightEngine {
    pub fn new(config: Arc<Config>) -> Self {
        let explorer = ExplorerClient::new(ExplorerSource::default());
        let completion = OpenAiClient::new(config.completion.clone());
        let profile = ProfileClient::new(config.profile.clone());

        Self::with_parts(config, SummaryPipeline::new(explorer, completion), profile)
    }
}

impl<C: CompletionApi, P: ProfileApi> InsightEngine<C, P> {
    pub fn with_parts(config: Arc<Config>, pipeline: SummaryPipeline<C>, profile: P) -> Self {
        Self {
            config,
            profile,
            pipeline: Arc::new(tokio::sync::Mutex::new(pipeline)),
        }
    }

    /// Run the three lookups concurrently and join them all-or-nothing: the
    /// first failure fails the whole report, and nothing is rendered
    /// partially.
    pub async fn explain(
        &self,
        tx: &PendingTransaction,
        identity: &IdentityContext,
    ) -> Result<InsightReport, InsightError> {
        utils::validate_address(&tx.to)
            .map_err(|e| InsightError::InvalidInput(e.to_string()))?;
        let chain = self.config.chain_by_id(tx.chain_id)?;

        let summary_fut = async {
            let mut pipeline = self.pipeline.lock().await;
            pipeline.summarize(chain, &tx.to, &tx.data).await
        };

        let (profile, approvals, summary) = tokio::try_join!(
            self.profile.profile_by_address(&tx.from),
            self.profile.approvals_for_call(&tx.to, &tx.data, tx.chain_id),
            summary_fut,
        )?;

        let identity_verified =
            self.config.insight.require_identity_verification && identity.is_set();

        Ok(InsightReport {
            profile,
            approvals,
            summary,
            identity_verified,
        })
    }

    /// The summarization pipeline alone, as exposed to remote callers.
    pub async fn summarize(
        &self,
        chain: Option<&str>,
        contract_address: &str,
        call_data: &str,
    ) -> Result<CallSummary, InsightError> {
        utils::validate_address(contract_address)
            .map_err(|e| InsightError::InvalidInput(e.to_string()))?;
        utils::validate_call_data(call_data)
            .map_err(|e| InsightError::InvalidInput(e.to_string()))?;
        let chain = self.config.chain(chain)?;

        let mut pipeline = self.pipeline.lock().await;
        pipeline.summarize(chain, contract_address, call_data).await
    }

    /// Decode without summarizing.
    pub async fn decode(
        &self,
        chain: Option<&str>,
        contract_address: &str,
        call_data: &str,
    ) -> Result<DecodedCall, InsightError> {
        utils::validate_address(contract_address)
            .map_err(|e| InsightError::InvalidInput(e.to_string()))?;
        utils::validate_call_data(call_data)
            .map_err(|e| InsightError::InvalidInput(e.to_string()))?;
        let chain = self.config.chain(chain)?;

        let mut pipeline = self.pipeline.lock().await;
        pipeline.decode(chain, contract_address, call_data).await
    }
}
