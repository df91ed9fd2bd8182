//! Donate, close and view actions against the selected contract.

use crate::error_string;
use crate::view::{Action, AlertVariant, Button, DetailRow, Element};
use concordium_client::{
    AccountAddress, CcdAmount, ClientError, ConnectionId, ContractAddress, ContractContext, ContractInfo,
    DonationState, DonationView, InvokeContractResult, NetworkConfig, Result, TransactionHash,
    UpdateContractPayload, WalletConnection,
};
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const MAX_CONTRACT_EXECUTION_ENERGY: u64 = 30_000;

/// Everything an invocation needs, forwarded from the root.
#[derive(Clone)]
pub struct InvocationContext {
    pub network: NetworkConfig,
    pub connection: Arc<dyn WalletConnection>,
    pub account: AccountAddress,
    pub contract: ContractInfo,
}

impl InvocationContext {
    fn key(&self) -> (ConnectionId, ContractAddress) {
        (self.connection.id(), self.contract.address())
    }

    fn update(&self, entrypoint: &str, amount: CcdAmount) -> UpdateContractPayload {
        UpdateContractPayload {
            amount,
            address: self.contract.address(),
            receive_name: self.contract.receive_name(entrypoint),
            max_contract_execution_energy: MAX_CONTRACT_EXECUTION_ENERGY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokerState {
    pub busy: bool,
    pub tx_hash: Option<TransactionHash>,
    pub error: Option<String>,
    pub view: Option<DonationView>,
}

#[derive(Debug, Default)]
struct Shared {
    generation: u64,
    state: InvokerState,
}

enum Outcome {
    Submitted(TransactionHash),
    Viewed(DonationView),
}

#[derive(Default)]
pub struct ContractInvoker {
    shared: Arc<RwLock<Shared>>,
    key: Option<(ConnectionId, ContractAddress)>,
    pending: Option<JoinHandle<()>>,
}

impl ContractInvoker {
    #[must_use]
    pub fn state(&self) -> InvokerState {
        self.shared.read().state.clone()
    }

    /// Resets results whenever the connection or contract changes.
    pub fn bind(&mut self, context: Option<&InvocationContext>) {
        let key = context.map(InvocationContext::key);
        if key == self.key {
            return;
        }
        self.key = key;
        let mut shared = self.shared.write();
        shared.generation += 1;
        shared.state = InvokerState::default();
        self.pending = None;
    }

    /// Sends `amount` (whole μCCD) to the contract's `give` entrypoint.
    pub fn donate(&mut self, context: &InvocationContext, amount: &str) -> bool {
        let amount = match CcdAmount::parse_positive(amount) {
            Ok(amount) => amount,
            Err(e) => {
                self.shared.write().state.error = Some(error_string(&e));
                return false;
            }
        };
        let payload = context.update("give", amount);
        let connection = context.connection.clone();
        let account = context.account.clone();
        info!(amount = %amount, contract = %context.contract.address(), "Donating");
        self.run(context, async move {
            connection
                .sign_and_send_update(&account, payload)
                .await
                .map(Outcome::Submitted)
        })
    }

    /// Closes the donation and pays out the balance. Only the owner may close.
    pub fn close(&mut self, context: &InvocationContext) -> bool {
        if context.account != context.contract.owner.address {
            self.shared.write().state.error = Some("Only the contract owner can close the donation".to_string());
            return false;
        }
        let payload = context.update("closed", CcdAmount::default());
        let connection = context.connection.clone();
        let account = context.account.clone();
        info!(contract = %context.contract.address(), "Closing donation");
        self.run(context, async move {
            connection
                .sign_and_send_update(&account, payload)
                .await
                .map(Outcome::Submitted)
        })
    }

    /// Dry-runs the `view` entrypoint to read the donation state and balance.
    pub fn refresh_view(&mut self, context: &InvocationContext) -> bool {
        let rpc = context.connection.rpc();
        let invoke = ContractContext {
            contract: context.contract.address(),
            method: context.contract.receive_name("view"),
            invoker: Some(context.account.clone()),
            amount: 0,
        };
        self.run(context, async move {
            match rpc.invoke_contract(invoke).await? {
                InvokeContractResult::Success {
                    return_value: Some(value),
                    ..
                } => DonationView::decode_hex(&value).map(Outcome::Viewed),
                InvokeContractResult::Success { return_value: None, .. } => {
                    Err(ClientError::Decode("view returned no value".to_string()))
                }
                InvokeContractResult::Failure { reason, .. } => {
                    Err(ClientError::TransactionRejected(reason.to_string()))
                }
            }
        })
    }

    fn run<F>(&mut self, context: &InvocationContext, task: F) -> bool
    where
        F: Future<Output = Result<Outcome>> + Send + 'static,
    {
        self.bind(Some(context));
        let generation = {
            let mut shared = self.shared.write();
            if shared.state.busy {
                warn!("Invocation already in progress");
                return false;
            }
            shared.state.busy = true;
            shared.state.error = None;
            shared.generation
        };

        let shared = self.shared.clone();
        self.pending = Some(tokio::spawn(async move {
            let result = task.await;

            let mut shared = shared.write();
            if shared.generation != generation {
                return;
            }
            shared.state.busy = false;
            match result {
                Ok(Outcome::Submitted(hash)) => {
                    shared.state.tx_hash = Some(hash);
                }
                Ok(Outcome::Viewed(view)) => {
                    shared.state.view = Some(view);
                }
                Err(e) => {
                    warn!("Contract invocation failed: {e}");
                    shared.state.error = Some(error_string(&e));
                }
            }
        }));
        true
    }

    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                warn!("Contract invocation task failed: {e}");
            }
        }
    }
}

#[must_use]
pub fn render(state: &InvokerState, context: &InvocationContext) -> Vec<Element> {
    let mut elements = vec![Element::Details {
        variant: AlertVariant::Secondary,
        rows: vec![
            DetailRow::text(
                "Donation state:",
                state
                    .view
                    .map_or_else(|| "Unknown".to_string(), |v| v.state.to_string()),
            ),
            DetailRow::text(
                "Contract balance:",
                state
                    .view
                    .map_or_else(|| "Unknown".to_string(), |v| v.balance.to_string()),
            ),
            DetailRow::code("Donating as:", context.account.to_string()),
        ],
    }];

    let closed = state.view.is_some_and(|v| v.state == DonationState::Closed);
    let is_owner = context.account == context.contract.owner.address;
    let open = state.view.is_some_and(|v| v.state == DonationState::Active);

    elements.push(Element::Button(
        Button::new(if state.busy { "Submitting..." } else { "Donate" }, Action::Donate)
            .disabled(state.busy || closed),
    ));
    if is_owner {
        elements.push(Element::Button(
            Button::new("Close donation", Action::CloseDonation).disabled(state.busy || !open),
        ));
    }
    elements.push(Element::Button(
        Button::new("Refresh", Action::RefreshView).disabled(state.busy),
    ));

    if let Some(hash) = &state.tx_hash {
        elements.push(Element::alert(
            AlertVariant::Success,
            format!("Transaction submitted: {hash}"),
        ));
        if let Some(base) = &context.network.ccd_scan_base_url {
            elements.push(Element::Link {
                label: "View on CCDScan".to_string(),
                href: format!(
                    "{}?dcount=1&dentity=transaction&dhash={hash}",
                    base.as_str().trim_end_matches('/')
                ),
            });
        }
    }
    if let Some(error) = &state.error {
        elements.push(Element::alert(AlertVariant::Danger, format!("Error: {error}")));
    }
    elements
}
