use crate::error_string;
use crate::session::{ConnectionSelection, ConnectorSession};
use concordium_client::{Result, WalletConnection};
use std::sync::Arc;
use tracing::{info, warn};

/// User-initiated connect through the active connector. Never retried on its own.
#[derive(Debug, Default)]
pub struct ConnectFlow {
    is_connecting: bool,
    connect_error: Option<String>,
}

impl ConnectFlow {
    #[must_use]
    pub const fn is_connecting(&self) -> bool {
        self.is_connecting
    }

    #[must_use]
    pub fn connect_error(&self) -> Option<&str> {
        self.connect_error.as_deref()
    }

    pub fn begin(&mut self) {
        self.is_connecting = true;
        self.connect_error = None;
    }

    pub fn finish(
        &mut self,
        result: Result<Arc<dyn WalletConnection>>,
        session: &mut ConnectorSession,
        selection: &mut ConnectionSelection,
    ) {
        self.is_connecting = false;
        match result {
            Ok(connection) => {
                info!(connection = %connection.id(), "Wallet connected");
                session.register(&connection);
                selection.set(Some(connection));
            }
            Err(e) => {
                warn!("Wallet connection failed: {e}");
                self.connect_error = Some(error_string(&e));
            }
        }
    }

    /// Does nothing without an attached connector.
    pub async fn connect(&mut self, session: &mut ConnectorSession, selection: &mut ConnectionSelection) {
        let Some(connector) = session.active_connector() else {
            warn!("Connect requested without an attached connector");
            return;
        };
        self.begin();
        let result = connector.connect().await;
        self.finish(result, session, selection);
    }

    pub fn reset(&mut self) {
        self.is_connecting = false;
        self.connect_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockConnection, MockConnector, MockFactory, MockRpc, OWNER};
    use concordium_client::{ConnectorType, TESTNET};

    async fn session_with(connector: MockConnector) -> ConnectorSession {
        let mut session = ConnectorSession::new(Arc::new(MockFactory::new(Arc::new(connector))), TESTNET.clone());
        session.activate(ConnectorType::BrowserWallet).await;
        session
    }

    #[tokio::test]
    async fn test_connect_selects_connection() {
        let rpc = Arc::new(MockRpc::new(TESTNET.genesis_hash.as_str()));
        let connection = MockConnection::new(Some(OWNER), rpc).into_dyn();
        let mut session = session_with(MockConnector::new(ConnectorType::BrowserWallet, connection.clone())).await;
        let mut selection = ConnectionSelection::default();
        let mut flow = ConnectFlow::default();

        flow.connect(&mut session, &mut selection).await;

        assert!(!flow.is_connecting());
        assert!(flow.connect_error().is_none());
        assert_eq!(selection.connection().map(|c| c.id()), Some(connection.id()));
        assert_eq!(selection.account(&session).map(|a| a.as_str()), Some(OWNER));
    }

    #[tokio::test]
    async fn test_connect_error_is_kept_until_retry() {
        let mut session =
            session_with(MockConnector::refusing(ConnectorType::BrowserWallet, "user rejected")).await;
        let mut selection = ConnectionSelection::default();
        let mut flow = ConnectFlow::default();

        flow.connect(&mut session, &mut selection).await;
        assert_eq!(flow.connect_error(), Some("user rejected"));
        assert!(selection.connection().is_none());

        flow.begin();
        assert!(flow.is_connecting());
        assert!(flow.connect_error().is_none());
    }

    #[tokio::test]
    async fn test_connect_without_connector_is_noop() {
        let mut session = ConnectorSession::new(Arc::new(MockFactory::failing("missing")), TESTNET.clone());
        let mut selection = ConnectionSelection::default();
        let mut flow = ConnectFlow::default();

        flow.connect(&mut session, &mut selection).await;
        assert!(!flow.is_connecting());
        assert!(flow.connect_error().is_none());
    }
}
