//! Connector and connection state owned by the app.

use concordium_client::{
    AccountAddress, ConnectionId, ConnectorFactory, ConnectorType, NetworkConfig, Result, WalletConnection,
    WalletConnector,
};
use crate::error_string;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Tracks the active connector and what its connections report.
pub struct ConnectorSession {
    factory: Arc<dyn ConnectorFactory>,
    network: NetworkConfig,
    active_connector_type: Option<ConnectorType>,
    active_connector: Option<Arc<dyn WalletConnector>>,
    active_connector_error: Option<String>,
    connected_accounts: HashMap<ConnectionId, AccountAddress>,
    genesis_hashes: HashMap<ConnectionId, String>,
}

impl ConnectorSession {
    pub fn new(factory: Arc<dyn ConnectorFactory>, network: NetworkConfig) -> Self {
        Self {
            factory,
            network,
            active_connector_type: None,
            active_connector: None,
            active_connector_error: None,
            connected_accounts: HashMap::new(),
            genesis_hashes: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn network(&self) -> &NetworkConfig {
        &self.network
    }

    #[must_use]
    pub const fn active_connector_type(&self) -> Option<ConnectorType> {
        self.active_connector_type
    }

    #[must_use]
    pub fn active_connector(&self) -> Option<Arc<dyn WalletConnector>> {
        self.active_connector.clone()
    }

    #[must_use]
    pub fn active_connector_error(&self) -> Option<&str> {
        self.active_connector_error.as_deref()
    }

    #[must_use]
    pub fn connected_account(&self, id: ConnectionId) -> Option<&AccountAddress> {
        self.connected_accounts.get(&id)
    }

    #[must_use]
    pub fn genesis_hash(&self, id: ConnectionId) -> Option<&str> {
        self.genesis_hashes.get(&id).map(String::as_str)
    }

    /// Selects a connector type. Until [`Self::finish_activate`] runs the
    /// session is attaching.
    pub fn begin_activate(&mut self, connector_type: ConnectorType) {
        self.active_connector_type = Some(connector_type);
        self.active_connector = None;
        self.active_connector_error = None;
    }

    pub fn finish_activate(&mut self, result: Result<Arc<dyn WalletConnector>>) {
        match result {
            Ok(connector) => {
                info!(connector_type = %connector.connector_type(), "Connector attached");
                self.active_connector = Some(connector);
            }
            Err(e) => {
                warn!("Connector failed to attach: {e}");
                self.active_connector_error = Some(error_string(&e));
            }
        }
    }

    pub async fn activate(&mut self, connector_type: ConnectorType) {
        self.begin_activate(connector_type);
        let result = self.factory.create(connector_type, &self.network).await;
        self.finish_activate(result);
    }

    /// Drops the active connector and everything its connections reported.
    pub async fn deactivate(&mut self) {
        if let Some(connector) = self.active_connector.take() {
            if let Err(e) = connector.disconnect().await {
                warn!("Connector disconnect failed: {e}");
            }
        }
        self.active_connector_type = None;
        self.active_connector_error = None;
        self.connected_accounts.clear();
        self.genesis_hashes.clear();
    }

    /// Switching networks tears down the active connector.
    pub async fn set_network(&mut self, network: NetworkConfig) {
        if network == self.network {
            return;
        }
        info!(network = %network.name, "Switching network");
        self.deactivate().await;
        self.network = network;
    }

    /// Records the account and genesis hash a new connection reports.
    pub fn register(&mut self, connection: &Arc<dyn WalletConnection>) {
        let id = connection.id();
        if let Some(account) = connection.account() {
            self.connected_accounts.insert(id, account);
        }
        if let Some(hash) = connection.genesis_hash() {
            self.genesis_hashes.insert(id, hash);
        }
    }
}

/// The connection currently in use, if any.
#[derive(Default)]
pub struct ConnectionSelection {
    connection: Option<Arc<dyn WalletConnection>>,
}

impl ConnectionSelection {
    #[must_use]
    pub fn connection(&self) -> Option<&Arc<dyn WalletConnection>> {
        self.connection.as_ref()
    }

    pub fn set(&mut self, connection: Option<Arc<dyn WalletConnection>>) {
        self.connection = connection;
    }

    #[must_use]
    pub fn account<'a>(&self, session: &'a ConnectorSession) -> Option<&'a AccountAddress> {
        self.connection
            .as_ref()
            .and_then(|c| session.connected_account(c.id()))
    }

    #[must_use]
    pub fn genesis_hash<'a>(&self, session: &'a ConnectorSession) -> Option<&'a str> {
        self.connection
            .as_ref()
            .and_then(|c| session.genesis_hash(c.id()))
    }
}
