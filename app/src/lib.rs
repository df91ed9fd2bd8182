#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod connect;
pub mod consensus;
pub mod consistency;
pub mod contract;
pub mod invoker;
pub mod root;
pub mod session;
pub mod view;

#[cfg(test)]
mod test_utils;

pub use consensus::{ConsensusStatusFetcher, FetchSnapshot};
pub use contract::{ContractSelection, ContractSelector};
pub use invoker::{ContractInvoker, InvocationContext, InvokerState};
pub use root::{ConnectionPhase, DonationApp};
pub use view::{Action, AlertVariant, Button, Element, Page};

use concordium_client::ClientError;

/// Message shown to the user for an error. Connector and connect errors
/// carry their own wording, which the views wrap.
#[must_use]
pub fn error_string(error: &ClientError) -> String {
    match error {
        ClientError::Connector(message) | ClientError::Connect(message) => message.clone(),
        other => other.to_string(),
    }
}
