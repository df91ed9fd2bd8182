//! Wallet connector backed by a local HTTP wallet bridge.
//!
//! The bridge holds the keys. It exposes the active account and the
//! wallet's genesis hash, and signs and submits transactions on request:
//!
//! - `GET  /status`
//! - `GET  /account`
//! - `POST /transactions`
//! - `POST /disconnect`

use crate::config::NetworkConfig;
use crate::error::{ClientError, Result};
use crate::rpc::{JsonRpcClient, RpcClient};
use crate::types::{AccountAddress, TransactionHash, UpdateContractPayload};
use crate::wallet::{ConnectionId, ConnectorFactory, ConnectorType, WalletConnection, WalletConnector};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BridgeStatus {
    connectors: Vec<ConnectorType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BridgeAccount {
    account: Option<AccountAddress>,
    #[serde(default)]
    genesis_hash: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitTransactionRequest<'a> {
    connector: ConnectorType,
    account: &'a AccountAddress,
    payload: UpdateContractPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitTransactionResponse {
    transaction_hash: TransactionHash,
}

async fn bridge_error(response: Response) -> ClientError {
    let status_code = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|e| format!("unreadable response body: {e}"));
    ClientError::Bridge {
        status_code,
        message,
    }
}

/// Joins `path` below `base`, keeping every segment of the base path.
fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .map_err(|e| ClientError::Config(format!("Invalid wallet bridge URL {base}: {e}")))
}

/// Creates [`HttpWalletBridge`] connectors.
#[derive(Debug, Clone)]
pub struct HttpWalletBridgeFactory {
    client: Client,
    bridge_url: Url,
    rpc_timeout: Duration,
}

impl HttpWalletBridgeFactory {
    pub fn new(bridge_url: Url, rpc_timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(rpc_timeout).build()?;
        Ok(Self {
            client,
            bridge_url,
            rpc_timeout,
        })
    }
}

#[async_trait]
impl ConnectorFactory for HttpWalletBridgeFactory {
    async fn create(
        &self,
        connector_type: ConnectorType,
        network: &NetworkConfig,
    ) -> Result<Arc<dyn WalletConnector>> {
        let url = endpoint(&self.bridge_url, "status")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Connector(format!("wallet bridge unreachable: {e}")))?;
        if !response.status().is_success() {
            return Err(ClientError::Connector(bridge_error(response).await.to_string()));
        }

        let status: BridgeStatus = response.json().await?;
        if !status.connectors.contains(&connector_type) {
            return Err(ClientError::Connector(format!(
                "wallet bridge does not support the {connector_type} connector"
            )));
        }

        info!(%connector_type, bridge = %self.bridge_url, "Attached wallet connector");
        Ok(Arc::new(HttpWalletBridge {
            client: self.client.clone(),
            bridge_url: self.bridge_url.clone(),
            connector_type,
            network: network.clone(),
            rpc_timeout: self.rpc_timeout,
            active: Mutex::new(None),
        }))
    }
}

pub struct HttpWalletBridge {
    client: Client,
    bridge_url: Url,
    connector_type: ConnectorType,
    network: NetworkConfig,
    rpc_timeout: Duration,
    active: Mutex<Option<Arc<HttpWalletConnection>>>,
}

#[async_trait]
impl WalletConnector for HttpWalletBridge {
    fn connector_type(&self) -> ConnectorType {
        self.connector_type
    }

    async fn connect(&self) -> Result<Arc<dyn WalletConnection>> {
        let url = endpoint(&self.bridge_url, "account")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Connect(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ClientError::Connect(bridge_error(response).await.to_string()));
        }

        let account: BridgeAccount = response.json().await?;
        let rpc = JsonRpcClient::new(self.network.json_rpc_url.clone(), self.rpc_timeout)?;
        let connection = Arc::new(HttpWalletConnection {
            id: ConnectionId::new(),
            client: self.client.clone(),
            bridge_url: self.bridge_url.clone(),
            connector_type: self.connector_type,
            account: account.account,
            genesis_hash: account.genesis_hash,
            rpc: Arc::new(rpc),
        });

        info!(
            connection = %connection.id,
            account = ?connection.account,
            "Opened wallet connection"
        );
        *self.active.lock() = Some(connection.clone());
        Ok(connection)
    }

    async fn disconnect(&self) -> Result<()> {
        let active = self.active.lock().take();
        if let Some(connection) = active {
            connection.disconnect().await?;
        }
        Ok(())
    }
}

pub struct HttpWalletConnection {
    id: ConnectionId,
    client: Client,
    bridge_url: Url,
    connector_type: ConnectorType,
    account: Option<AccountAddress>,
    genesis_hash: Option<String>,
    rpc: Arc<dyn RpcClient>,
}

#[async_trait]
impl WalletConnection for HttpWalletConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn account(&self) -> Option<AccountAddress> {
        self.account.clone()
    }

    fn genesis_hash(&self) -> Option<String> {
        self.genesis_hash.clone()
    }

    fn rpc(&self) -> Arc<dyn RpcClient> {
        self.rpc.clone()
    }

    async fn sign_and_send_update(
        &self,
        account: &AccountAddress,
        payload: UpdateContractPayload,
    ) -> Result<TransactionHash> {
        debug!(
            connection = %self.id,
            receive_name = %payload.receive_name,
            amount = %payload.amount,
            "Submitting update transaction to wallet bridge"
        );
        let request = SubmitTransactionRequest {
            connector: self.connector_type,
            account,
            payload,
        };
        let response = self
            .client
            .post(endpoint(&self.bridge_url, "transactions")?)
            .json(&request)
            .send()
            .await?;

        if response.status().is_client_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::TransactionRejected(message));
        }
        if !response.status().is_success() {
            return Err(bridge_error(response).await);
        }

        let submitted: SubmitTransactionResponse = response.json().await?;
        info!(tx = %submitted.transaction_hash, "Transaction submitted");
        Ok(submitted.transaction_hash)
    }

    async fn disconnect(&self) -> Result<()> {
        let response = self
            .client
            .post(endpoint(&self.bridge_url, "disconnect")?)
            .send()
            .await?;
        if !response.status().is_success() {
            warn!(connection = %self.id, status = %response.status(), "Wallet bridge refused disconnect");
            return Err(bridge_error(response).await);
        }
        info!(connection = %self.id, "Closed wallet connection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let root = Url::parse("http://127.0.0.1:9090").unwrap();
        assert_eq!(endpoint(&root, "status").unwrap().as_str(), "http://127.0.0.1:9090/status");

        let nested = Url::parse("http://127.0.0.1:9090/wallet").unwrap();
        assert_eq!(
            endpoint(&nested, "status").unwrap().as_str(),
            "http://127.0.0.1:9090/wallet/status"
        );

        let slashed = Url::parse("http://127.0.0.1:9090/wallet/").unwrap();
        assert_eq!(
            endpoint(&slashed, "transactions").unwrap().as_str(),
            "http://127.0.0.1:9090/wallet/transactions"
        );
    }
}
