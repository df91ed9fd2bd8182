//! Resolves the dApp's contract instance and renders its details.

use crate::error_string;
use crate::view::{AlertVariant, DetailRow, Element};
use concordium_client::{ConnectionId, ContractAddress, ContractInfo, WalletConnection};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContractSelection {
    #[default]
    Idle,
    Loading,
    Selected(ContractInfo),
    Failed(String),
}

impl ContractSelection {
    #[must_use]
    pub const fn selected(&self) -> Option<&ContractInfo> {
        match self {
            Self::Selected(info) => Some(info),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Debug, Default)]
struct SelectorState {
    generation: u64,
    selection: ContractSelection,
}

#[derive(Default)]
pub struct ContractSelector {
    state: Arc<RwLock<SelectorState>>,
    key: Option<(ConnectionId, String)>,
    pending: Option<JoinHandle<()>>,
}

impl ContractSelector {
    #[must_use]
    pub fn selection(&self) -> ContractSelection {
        self.state.read().selection.clone()
    }

    /// Resolves `index` through the connection's RPC client. Repeating the
    /// same connection and index is a no-op; use [`Self::reselect`] to refetch.
    pub fn select(&mut self, connection: Option<&Arc<dyn WalletConnection>>, index: &str) -> bool {
        let key = connection.map(|c| (c.id(), index.to_string()));
        if key == self.key {
            return false;
        }
        self.key = key;
        self.start(connection, index)
    }

    pub fn reselect(&mut self, connection: Option<&Arc<dyn WalletConnection>>, index: &str) -> bool {
        self.key = connection.map(|c| (c.id(), index.to_string()));
        self.start(connection, index)
    }

    fn start(&mut self, connection: Option<&Arc<dyn WalletConnection>>, index: &str) -> bool {
        let parsed = index.parse::<ContractAddress>();
        let next = match (connection, &parsed) {
            (None, _) => ContractSelection::Idle,
            (Some(_), Err(e)) => ContractSelection::Failed(error_string(e)),
            (Some(_), Ok(_)) => ContractSelection::Loading,
        };

        let generation = {
            let mut state = self.state.write();
            state.generation += 1;
            state.selection = next;
            state.generation
        };

        let (Some(connection), Ok(address)) = (connection, parsed) else {
            self.pending = None;
            return false;
        };

        let rpc = connection.rpc();
        let state = self.state.clone();
        debug!(%address, generation, "Resolving contract instance");

        self.pending = Some(tokio::spawn(async move {
            let result = rpc.get_instance_info(address).await;

            let mut state = state.write();
            if state.generation != generation {
                debug!(%address, "Discarding stale contract resolution");
                return;
            }
            state.selection = match result {
                Ok(info) => {
                    let contract = ContractInfo::from_instance(address, info);
                    info!(%address, name = %contract.name, "Contract resolved");
                    ContractSelection::Selected(contract)
                }
                Err(e) => {
                    warn!(%address, "Contract resolution failed: {e}");
                    ContractSelection::Failed(error_string(&e))
                }
            };
        }));
        true
    }

    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                warn!("Contract resolution task failed: {e}");
            }
        }
    }
}

#[must_use]
pub fn render_details(contract: &ContractInfo) -> Element {
    Element::Details {
        variant: AlertVariant::Secondary,
        rows: vec![
            DetailRow::code("Contract Name:", contract.name.clone()),
            DetailRow::code("Index:", contract.index.to_string()),
            DetailRow::code("Owner:", contract.owner.address.to_string()),
            DetailRow::text("Total donation:", contract.amount.to_string()),
        ],
    }
}

#[must_use]
pub fn render_failure(message: &str) -> Element {
    Element::alert(
        AlertVariant::Danger,
        format!("Contract resolution error: {message}."),
    )
}
