//! In-memory wallet, connector and node doubles.

use async_trait::async_trait;
use concordium_client::{
    AccountAddress, ClientError, ConnectionId, ConnectorFactory, ConnectorType, ConsensusStatus,
    ContractAddress, ContractContext, InstanceInfo, InvokeContractResult, NetworkConfig, Result,
    RpcClient, TransactionHash, UpdateContractPayload, WalletConnection, WalletConnector, TESTNET,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

pub const OWNER: &str = "4k9owner";

pub fn donation_instance() -> InstanceInfo {
    serde_json::from_value(serde_json::json!({
        "name": "init_donation",
        "owner": OWNER,
        "amount": "1000000",
        "methods": ["donation.give", "donation.closed", "donation.view"]
    }))
    .unwrap()
}

pub struct MockRpc {
    genesis: std::result::Result<String, String>,
    instance: Mutex<Option<InstanceInfo>>,
    view_return: Mutex<String>,
    consensus_gate: Mutex<Option<oneshot::Receiver<()>>>,
    instance_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub consensus_calls: AtomicUsize,
    pub instance_calls: AtomicUsize,
    pub invoke_calls: AtomicUsize,
}

impl MockRpc {
    pub fn new(genesis: &str) -> Self {
        Self {
            genesis: Ok(genesis.to_string()),
            instance: Mutex::new(Some(donation_instance())),
            view_return: Mutex::new("0040420f0000000000".to_string()),
            consensus_gate: Mutex::new(None),
            instance_gate: Mutex::new(None),
            consensus_calls: AtomicUsize::new(0),
            instance_calls: AtomicUsize::new(0),
            invoke_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            genesis: Err(message.to_string()),
            ..Self::new(TESTNET.genesis_hash.as_str())
        }
    }

    pub fn without_instance(self) -> Self {
        *self.instance.lock() = None;
        self
    }

    /// Makes the donation instance resolvable again.
    pub fn restore_instance(&self) {
        *self.instance.lock() = Some(donation_instance());
    }

    pub fn set_view_return(&self, hex: &str) {
        *self.view_return.lock() = hex.to_string();
    }

    /// Holds the next consensus status call until the returned sender fires.
    pub fn gate_consensus(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.consensus_gate.lock() = Some(rx);
        tx
    }

    pub fn gate_instance(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.instance_gate.lock() = Some(rx);
        tx
    }

    pub fn consensus_calls(&self) -> usize {
        self.consensus_calls.load(Ordering::SeqCst)
    }

    pub fn instance_calls(&self) -> usize {
        self.instance_calls.load(Ordering::SeqCst)
    }

    pub fn invoke_calls(&self) -> usize {
        self.invoke_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcClient for MockRpc {
    async fn get_consensus_status(&self) -> Result<ConsensusStatus> {
        self.consensus_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.consensus_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match &self.genesis {
            Ok(hash) => Ok(ConsensusStatus {
                genesis_block: hash.clone(),
                last_finalized_block: None,
                best_block: None,
                protocol_version: None,
            }),
            Err(message) => Err(ClientError::Rpc {
                code: -32000,
                message: message.clone(),
            }),
        }
    }

    async fn get_instance_info(&self, address: ContractAddress) -> Result<InstanceInfo> {
        self.instance_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.instance_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.instance
            .lock()
            .clone()
            .ok_or_else(|| ClientError::ContractNotFound(address.to_string()))
    }

    async fn invoke_contract(&self, _context: ContractContext) -> Result<InvokeContractResult> {
        self.invoke_calls.fetch_add(1, Ordering::SeqCst);
        Ok(InvokeContractResult::Success {
            return_value: Some(self.view_return.lock().clone()),
            used_energy: 100,
        })
    }
}

pub struct MockConnection {
    id: ConnectionId,
    account: Option<AccountAddress>,
    genesis_hash: Option<String>,
    pub rpc: Arc<MockRpc>,
    pub submitted: Mutex<Vec<UpdateContractPayload>>,
    reject_with: Option<String>,
}

impl MockConnection {
    pub fn new(account: Option<&str>, rpc: Arc<MockRpc>) -> Self {
        Self {
            id: ConnectionId::new(),
            account: account.map(AccountAddress::from),
            genesis_hash: Some(TESTNET.genesis_hash.clone()),
            rpc,
            submitted: Mutex::new(Vec::new()),
            reject_with: None,
        }
    }

    pub fn with_wallet_genesis(mut self, genesis_hash: Option<&str>) -> Self {
        self.genesis_hash = genesis_hash.map(str::to_string);
        self
    }

    pub fn rejecting(mut self, reason: &str) -> Self {
        self.reject_with = Some(reason.to_string());
        self
    }

    pub fn into_dyn(self) -> Arc<dyn WalletConnection> {
        Arc::new(self)
    }
}

#[async_trait]
impl WalletConnection for MockConnection {
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
        _account: &AccountAddress,
        payload: UpdateContractPayload,
    ) -> Result<TransactionHash> {
        if let Some(reason) = &self.reject_with {
            return Err(ClientError::TransactionRejected(reason.clone()));
        }
        let mut submitted = self.submitted.lock();
        submitted.push(payload);
        Ok(TransactionHash(format!("tx{}", submitted.len())))
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}

pub struct MockConnector {
    connector_type: ConnectorType,
    connection: Mutex<Option<Arc<dyn WalletConnection>>>,
    connect_error: Option<String>,
    pub disconnects: AtomicUsize,
}

impl MockConnector {
    pub fn new(connector_type: ConnectorType, connection: Arc<dyn WalletConnection>) -> Self {
        Self {
            connector_type,
            connection: Mutex::new(Some(connection)),
            connect_error: None,
            disconnects: AtomicUsize::new(0),
        }
    }

    pub fn refusing(connector_type: ConnectorType, message: &str) -> Self {
        Self {
            connector_type,
            connection: Mutex::new(None),
            connect_error: Some(message.to_string()),
            disconnects: AtomicUsize::new(0),
        }
    }

    /// Connection handed out by the next `connect`.
    pub fn set_connection(&self, connection: Arc<dyn WalletConnection>) {
        *self.connection.lock() = Some(connection);
    }
}

#[async_trait]
impl WalletConnector for MockConnector {
    fn connector_type(&self) -> ConnectorType {
        self.connector_type
    }

    async fn connect(&self) -> Result<Arc<dyn WalletConnection>> {
        if let Some(message) = &self.connect_error {
            return Err(ClientError::Connect(message.clone()));
        }
        self.connection
            .lock()
            .clone()
            .ok_or_else(|| ClientError::Connect("no wallet available".to_string()))
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MockFactory {
    connector: Option<Arc<MockConnector>>,
    error: Option<String>,
}

impl MockFactory {
    pub fn new(connector: Arc<MockConnector>) -> Self {
        Self {
            connector: Some(connector),
            error: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            connector: None,
            error: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl ConnectorFactory for MockFactory {
    async fn create(
        &self,
        _connector_type: ConnectorType,
        _network: &NetworkConfig,
    ) -> Result<Arc<dyn WalletConnector>> {
        match (&self.connector, &self.error) {
            (Some(connector), _) => Ok(connector.clone()),
            (None, Some(message)) => Err(ClientError::Connector(message.clone())),
            (None, None) => Err(ClientError::Connector("no connector".to_string())),
        }
    }
}
