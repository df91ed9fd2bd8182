#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod rpc;
pub mod types;
pub mod wallet;

pub use bridge::{HttpWalletBridge, HttpWalletBridgeFactory, HttpWalletConnection};
pub use config::{Config, NetworkConfig, DONATION_CONTRACT_INDEX, MAINNET, TESTNET};
pub use error::{ClientError, Result};
pub use rpc::{JsonRpcClient, RpcClient};
pub use types::*;
pub use wallet::{ConnectionId, ConnectorFactory, ConnectorType, WalletConnection, WalletConnector};
