//! JSON-RPC access to a node.

use crate::error::{ClientError, Result};
use crate::types::{ConsensusStatus, ContractAddress, ContractContext, InstanceInfo, InvokeContractResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Node queries the dApp needs. Implementations are scoped to one wallet connection.
#[async_trait]
pub trait RpcClient: Send + Sync {
    async fn get_consensus_status(&self) -> Result<ConsensusStatus>;

    async fn get_instance_info(&self, address: ContractAddress) -> Result<InstanceInfo>;

    async fn invoke_contract(&self, context: ContractContext) -> Result<InvokeContractResult>;
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 client over HTTP.
#[derive(Debug)]
pub struct JsonRpcClient {
    client: Client,
    url: Url,
    next_request_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            next_request_id: AtomicU64::new(1),
        })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        self.call_optional(method, params)
            .await?
            .ok_or_else(|| ClientError::Rpc {
                code: 0,
                message: format!("{method} returned no result"),
            })
    }

    /// A `null` result maps to `None`.
    async fn call_optional<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<Option<T>> {
        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        debug!(method, id, url = %self.url, "Sending JSON-RPC request");
        let response: JsonRpcResponse = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            warn!(method, code = error.code, "JSON-RPC call failed: {}", error.message);
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        match response.result {
            Some(Value::Null) | None => Ok(None),
            Some(result) => Ok(Some(serde_json::from_value(result)?)),
        }
    }
}

#[async_trait]
impl RpcClient for JsonRpcClient {
    async fn get_consensus_status(&self) -> Result<ConsensusStatus> {
        self.call("getConsensusStatus", json!({})).await
    }

    async fn get_instance_info(&self, address: ContractAddress) -> Result<InstanceInfo> {
        self.call_optional(
            "getInstanceInfo",
            json!({ "index": address.index, "subindex": address.subindex }),
        )
        .await?
        .ok_or_else(|| ClientError::ContractNotFound(address.to_string()))
    }

    async fn invoke_contract(&self, context: ContractContext) -> Result<InvokeContractResult> {
        self.call("invokeContract", json!({ "context": context })).await
    }
}
