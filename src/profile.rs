use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ProfileConfig;
use crate::insight::InsightError;

/// Profile / approval-list collaborator surface. Lookups are idempotent
/// reads; failures surface as-is and are never retried.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// Look up the profile registered for a wallet address.
    async fn profile_by_address(&self, address: &str) -> Result<Value, InsightError>;

    /// Look up token approvals this call would create or touch.
    async fn approvals_for_call(
        &self,
        contract: &str,
        call_data: &str,
        chain_id: u64,
    ) -> Result<Value, InsightError>;
}

const PROFILE_QUERY: &str = "query ($address: String!) { \
    profile(address: $address) { id handle displayName avatarUrl } }";

const APPROVALS_QUERY: &str = "query ($contract: String!, $callData: String!, $chainId: Int!) { \
    approvals(contract: $contract, callData: $callData, chainId: $chainId) { \
    token spender amount } }";

/// Thin GraphQL client for the profile / approval-list collaborator. The
/// payloads are passed through opaquely; the service owns their shape.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    client: Client,
    config: ProfileConfig,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

impl ProfileClient {
    pub fn new(config: ProfileConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn query(
        &self,
        query: &str,
        variables: Value,
        field: &str,
    ) -> Result<Value, InsightError> {
        let body = GraphQlRequest { query, variables };

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InsightError::Lookup(format!(
                "profile service returned status {}",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| InsightError::Lookup(format!("malformed profile response: {}", e)))?;

        if let Some(errors) = payload.get("errors").filter(|e| !e.is_null()) {
            debug!("profile service reported errors: {}", errors);
            return Err(InsightError::Lookup(
                "profile service rejected the query".to_string(),
            ));
        }

        Ok(payload
            .get("data")
            .and_then(|data| data.get(field))
            .cloned()
            .unwrap_or(Value::Null))
    }
}

#[async_trait]
impl ProfileApi for ProfileClient {
    async fn profile_by_address(&self, address: &str) -> Result<Value, InsightError> {
        self.query(PROFILE_QUERY, json!({ "address": address }), "profile")
            .await
    }

    async fn approvals_for_call(
        &self,
        contract: &str,
        call_data: &str,
        chain_id: u64,
    ) -> Result<Value, InsightError> {
        self.query(
            APPROVALS_QUERY,
            json!({ "contract": contract, "callData": call_data, "chainId": chain_id }),
            "approvals",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_request_shape() {
        let body = GraphQlRequest {
            query: PROFILE_QUERY,
            variables: json!({ "address": "0xABC" }),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["variables"]["address"], "0xABC");
        assert!(json["query"].as_str().unwrap().contains("profile(address:"));
    }

    #[test]
    fn test_queries_name_their_root_fields() {
        assert!(PROFILE_QUERY.contains("profile("));
        assert!(APPROVALS_QUERY.contains("approvals("));
        assert!(APPROVALS_QUERY.contains("$chainId: Int!"));
    }
}
