//! Fetches the genesis hash the node reports, once per connection.
//!
//! Every trigger bumps a generation counter; a fetch commits its result only
//! if the generation it started under is still current, so a late answer for
//! an old connection can never overwrite the state of the new one.

use crate::error_string;
use concordium_client::{ConnectionId, WalletConnection};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSnapshot {
    pub genesis_hash: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct FetchState {
    generation: u64,
    snapshot: FetchSnapshot,
}

#[derive(Default)]
pub struct ConsensusStatusFetcher {
    state: Arc<RwLock<FetchState>>,
    current: Option<ConnectionId>,
    pending: Option<JoinHandle<()>>,
}

impl ConsensusStatusFetcher {
    #[must_use]
    pub fn snapshot(&self) -> FetchSnapshot {
        self.state.read().snapshot.clone()
    }

    /// Returns `true` when the call started a new fetch. An unchanged
    /// connection identity is a no-op.
    pub fn on_connection_changed(&mut self, connection: Option<&Arc<dyn WalletConnection>>) -> bool {
        let id = connection.map(|c| c.id());
        if id == self.current {
            return false;
        }
        self.current = id;

        let generation = {
            let mut state = self.state.write();
            state.generation += 1;
            state.snapshot.genesis_hash = None;
            state.generation
        };

        let Some(connection) = connection else {
            debug!("Connection cleared; discarding consensus status");
            self.state.write().snapshot.error = None;
            self.pending = None;
            return false;
        };

        let rpc = connection.rpc();
        let connection_id = connection.id();
        let state = self.state.clone();
        debug!(connection = %connection_id, generation, "Fetching consensus status");

        self.pending = Some(tokio::spawn(async move {
            let result = rpc.get_consensus_status().await;

            let mut state = state.write();
            if state.generation != generation {
                debug!(connection = %connection_id, "Discarding stale consensus status");
                return;
            }
            match result {
                Ok(status) => {
                    info!(genesis = %status.genesis_block, "Fetched consensus status");
                    state.snapshot.genesis_hash = Some(status.genesis_block);
                    state.snapshot.error = None;
                }
                Err(e) => {
                    warn!("Consensus status fetch failed: {e}");
                    state.snapshot.genesis_hash = None;
                    state.snapshot.error = Some(error_string(&e));
                }
            }
        }));
        true
    }

    /// Waits for the latest fetch, if any, to finish.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                warn!("Consensus status task failed: {e}");
            }
        }
    }
}
