//! Wallet connector capabilities consumed by the dApp.

use crate::config::NetworkConfig;
use crate::error::{ClientError, Result};
use crate::rpc::RpcClient;
use crate::types::{AccountAddress, TransactionHash, UpdateContractPayload};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorType {
    BrowserWallet,
    WalletConnect,
}

impl FromStr for ConnectorType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "browser" | "browser-wallet" | "browserwallet" => Ok(Self::BrowserWallet),
            "walletconnect" | "wallet-connect" | "mobile" => Ok(Self::WalletConnect),
            other => Err(ClientError::Config(format!("Unknown connector type {other:?}"))),
        }
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BrowserWallet => f.write_str("browser-wallet"),
            Self::WalletConnect => f.write_str("wallet-connect"),
        }
    }
}

/// Identity of a single wallet connection. Two handles to the same
/// connection compare equal; a reconnect yields a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An established session with a wallet.
#[async_trait]
pub trait WalletConnection: Send + Sync {
    fn id(&self) -> ConnectionId;

    /// Account the wallet currently exposes, if any.
    fn account(&self) -> Option<AccountAddress>;

    /// Genesis hash of the network the wallet is on, if it reports one.
    fn genesis_hash(&self) -> Option<String>;

    /// RPC client bound to this connection.
    fn rpc(&self) -> Arc<dyn RpcClient>;

    async fn sign_and_send_update(
        &self,
        account: &AccountAddress,
        payload: UpdateContractPayload,
    ) -> Result<TransactionHash>;

    async fn disconnect(&self) -> Result<()>;
}

/// A mechanism for opening wallet connections (browser extension, mobile, ...).
#[async_trait]
pub trait WalletConnector: Send + Sync {
    fn connector_type(&self) -> ConnectorType;

    async fn connect(&self) -> Result<Arc<dyn WalletConnection>>;

    async fn disconnect(&self) -> Result<()>;
}

/// Attaches connectors on demand.
#[async_trait]
pub trait ConnectorFactory: Send + Sync {
    async fn create(
        &self,
        connector_type: ConnectorType,
        network: &NetworkConfig,
    ) -> Result<Arc<dyn WalletConnector>>;
}
