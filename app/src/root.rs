//! Top-level composition: connector, connection, consensus check, contract.

use crate::connect::ConnectFlow;
use crate::consensus::{ConsensusStatusFetcher, FetchSnapshot};
use crate::consistency;
use crate::contract::{self, ContractSelection, ContractSelector};
use crate::invoker::{self, ContractInvoker, InvocationContext, InvokerState};
use crate::session::{ConnectionSelection, ConnectorSession};
use crate::view::{Action, AlertVariant, Button, Element, Page};
use concordium_client::{AccountAddress, Config, ConnectorFactory, ConnectorType, NetworkConfig};
use futures::future::join3;
use std::sync::Arc;
use tracing::{debug, info};

pub const BRAND: &str = "Donation Concordium";

/// Where the user is in the connect lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionPhase {
    Disconnected,
    Attaching(ConnectorType),
    ConnectorFailed(String),
    ConnectedNoAccount,
    Ready(AccountAddress),
}

pub struct DonationApp {
    session: ConnectorSession,
    selection: ConnectionSelection,
    connect: ConnectFlow,
    consensus: ConsensusStatusFetcher,
    contract: ContractSelector,
    invoker: ContractInvoker,
    contract_index: String,
}

impl DonationApp {
    pub fn new(
        factory: Arc<dyn ConnectorFactory>,
        network: NetworkConfig,
        contract_index: impl Into<String>,
    ) -> Self {
        Self {
            session: ConnectorSession::new(factory, network),
            selection: ConnectionSelection::default(),
            connect: ConnectFlow::default(),
            consensus: ConsensusStatusFetcher::default(),
            contract: ContractSelector::default(),
            invoker: ContractInvoker::default(),
            contract_index: contract_index.into(),
        }
    }

    pub fn from_config(factory: Arc<dyn ConnectorFactory>, config: &Config) -> Self {
        Self::new(factory, config.network.clone(), config.contract_index.clone())
    }

    #[must_use]
    pub const fn network(&self) -> &NetworkConfig {
        self.session.network()
    }

    #[must_use]
    pub fn account(&self) -> Option<&AccountAddress> {
        self.selection.account(&self.session)
    }

    #[must_use]
    pub fn consensus(&self) -> FetchSnapshot {
        self.consensus.snapshot()
    }

    #[must_use]
    pub fn contract(&self) -> ContractSelection {
        self.contract.selection()
    }

    #[must_use]
    pub fn invoker(&self) -> InvokerState {
        self.invoker.state()
    }

    #[must_use]
    pub fn phase(&self) -> ConnectionPhase {
        if let Some(error) = self.session.active_connector_error() {
            return ConnectionPhase::ConnectorFailed(error.to_string());
        }
        let Some(connector_type) = self.session.active_connector_type() else {
            return ConnectionPhase::Disconnected;
        };
        if self.session.active_connector().is_none() {
            return ConnectionPhase::Attaching(connector_type);
        }
        match self.account() {
            Some(account) => ConnectionPhase::Ready(account.clone()),
            None => ConnectionPhase::ConnectedNoAccount,
        }
    }

    pub async fn activate_connector(&mut self, connector_type: ConnectorType) {
        if self.session.active_connector_type().is_some() {
            self.deactivate_connector().await;
        }
        self.session.activate(connector_type).await;
        self.sync();
    }

    pub async fn deactivate_connector(&mut self) {
        self.session.deactivate().await;
        self.selection.set(None);
        self.connect.reset();
        self.sync();
    }

    /// Mirrors the navbar connector button: selecting the active type turns it off.
    pub async fn toggle_connector(&mut self, connector_type: ConnectorType) {
        if self.session.active_connector_type() == Some(connector_type) {
            self.deactivate_connector().await;
        } else {
            self.activate_connector(connector_type).await;
        }
    }

    pub async fn connect(&mut self) {
        self.connect.connect(&mut self.session, &mut self.selection).await;
        self.sync();
    }

    /// Switches network and reattaches the previously selected connector.
    pub async fn select_network(&mut self, network: NetworkConfig) {
        if network == *self.session.network() {
            return;
        }
        let previous = self.session.active_connector_type();
        self.session.set_network(network).await;
        self.selection.set(None);
        self.connect.reset();
        if let Some(connector_type) = previous {
            self.session.activate(connector_type).await;
        }
        self.sync();
    }

    /// Propagates the current connection to the dependent fetches. Unchanged
    /// state issues no RPC calls.
    pub fn sync(&mut self) {
        let connection = self.selection.connection().cloned();
        if self.consensus.on_connection_changed(connection.as_ref()) {
            debug!("Consensus status refresh started");
        }
        self.contract.select(connection.as_ref(), &self.contract_index);
        let context = self.invocation_context();
        self.invoker.bind(context.as_ref());
    }

    /// Resolves the contract again, e.g. after a failed lookup.
    pub fn reselect_contract(&mut self) -> bool {
        let connection = self.selection.connection().cloned();
        let started = self.contract.reselect(connection.as_ref(), &self.contract_index);
        self.invoker.bind(None);
        started
    }

    /// Waits for every in-flight fetch and invocation.
    pub async fn settle(&mut self) {
        join3(self.consensus.settle(), self.contract.settle(), self.invoker.settle()).await;
        let context = self.invocation_context();
        self.invoker.bind(context.as_ref());
    }

    #[must_use]
    pub fn invocation_context(&self) -> Option<InvocationContext> {
        let connection = self.selection.connection()?.clone();
        let account = self.account()?.clone();
        let contract = self.contract.selection().selected()?.clone();
        Some(InvocationContext {
            network: self.network().clone(),
            connection,
            account,
            contract,
        })
    }

    pub fn donate(&mut self, amount: &str) -> bool {
        let Some(context) = self.invocation_context() else {
            return false;
        };
        self.invoker.donate(&context, amount)
    }

    pub fn close_donation(&mut self) -> bool {
        let Some(context) = self.invocation_context() else {
            return false;
        };
        self.invoker.close(&context)
    }

    pub fn refresh_view(&mut self) -> bool {
        let Some(context) = self.invocation_context() else {
            return false;
        };
        info!(contract = %context.contract.address(), "Refreshing donation view");
        self.invoker.refresh_view(&context)
    }

    /// Runs the operation behind a rendered button. `amount` is only read by
    /// [`Action::Donate`].
    pub async fn dispatch(&mut self, action: Action, amount: &str) -> bool {
        debug!(?action, "Dispatching action");
        match action {
            Action::ToggleConnector(connector_type) => {
                self.toggle_connector(connector_type).await;
                true
            }
            Action::Connect => {
                self.connect().await;
                true
            }
            Action::Donate => self.donate(amount),
            Action::CloseDonation => self.close_donation(),
            Action::RefreshView => self.refresh_view(),
            Action::ReselectContract => self.reselect_contract(),
        }
    }

    #[must_use]
    pub fn render(&self) -> Page {
        let mut page = Page::default();
        page.push(self.render_navbar());

        let phase = self.phase();
        match &phase {
            ConnectionPhase::Disconnected => {}
            ConnectionPhase::Attaching(_) => page.push(Element::Spinner),
            ConnectionPhase::ConnectorFailed(error) => page.push(Element::alert(
                AlertVariant::Danger,
                format!("Connector error: {error}."),
            )),
            ConnectionPhase::ConnectedNoAccount => {
                page.extend(self.render_connect_error());
                page.push(self.render_connect_button());
            }
            ConnectionPhase::Ready(_) => page.extend(self.render_connect_error()),
        }

        page.extend(self.render_connected_account());

        if matches!(phase, ConnectionPhase::Ready(_)) {
            self.render_ready(&mut page);
        } else if let (Some(_), Some(error)) =
            (self.selection.connection(), self.consensus.snapshot().error)
        {
            page.push(Element::alert(AlertVariant::Warning, format!("RPC error: {error}")));
        }
        page
    }

    fn render_navbar(&self) -> Element {
        Element::Navbar {
            brand: BRAND.to_string(),
            buttons: vec![Button::new(
                "Connect Wallet",
                Action::ToggleConnector(ConnectorType::BrowserWallet),
            )
            .active(self.session.active_connector_type() == Some(ConnectorType::BrowserWallet))],
        }
    }

    fn render_connect_error(&self) -> Option<Element> {
        self.connect.connect_error().map(|error| {
            Element::alert(AlertVariant::Danger, format!("Connection error: {error}."))
        })
    }

    fn render_connect_button(&self) -> Element {
        let label = if self.connect.is_connecting() {
            "Connecting..."
        } else {
            match self.session.active_connector_type() {
                Some(ConnectorType::WalletConnect) => "Connect Mobile Wallet",
                _ => "Connect Browser Wallet",
            }
        };
        Element::Button(Button::new(label, Action::Connect).disabled(self.connect.is_connecting()))
    }

    fn render_connected_account(&self) -> Vec<Element> {
        match self.account() {
            Some(account) => {
                let mut elements = vec![Element::Text(format!("Connected to account {account}"))];
                if let Some(url) = self.network().account_explorer_url(account.as_str()) {
                    elements.push(Element::Link {
                        label: "View on CCDScan".to_string(),
                        href: url.to_string(),
                    });
                }
                elements
            }
            None => vec![Element::Text("No account connected.".to_string())],
        }
    }

    fn render_ready(&self, page: &mut Page) {
        let snapshot = self.consensus.snapshot();
        let consistency = consistency::check(
            &self.network().genesis_hash,
            self.selection.genesis_hash(&self.session),
            snapshot.genesis_hash.as_deref(),
        );
        page.extend(consistency.render());

        if let Some(error) = &snapshot.error {
            page.push(Element::alert(AlertVariant::Warning, format!("RPC error: {error}")));
        }

        match self.contract.selection() {
            ContractSelection::Idle => {}
            ContractSelection::Loading => page.push(Element::Spinner),
            ContractSelection::Failed(error) => {
                page.push(contract::render_failure(&error));
                page.push(Element::Button(Button::new("Retry", Action::ReselectContract)));
            }
            ContractSelection::Selected(_) => {
                if let Some(context) = self.invocation_context() {
                    page.push(Element::Columns(vec![
                        vec![contract::render_details(&context.contract)],
                        invoker::render(&self.invoker.state(), &context),
                    ]));
                }
            }
        }
    }
}
