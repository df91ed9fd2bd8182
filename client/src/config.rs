use crate::error::{ClientError, Result};
use crate::wallet::ConnectorType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Contract instance the dApp is built around.
pub const DONATION_CONTRACT_INDEX: &str = "3025";

pub const TESTNET_GENESIS_HASH: &str =
    "4221332d34e1694168c2a0c0b3fd0f273809612cb13d000d5c2e00e85f50f796";
pub const MAINNET_GENESIS_HASH: &str =
    "9dd9ca4d19e9393877d2c44b70f89acbfc0883c2243e5eeaecc0d1cd0503f478";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub genesis_hash: String,
    pub json_rpc_url: Url,
    pub ccd_scan_base_url: Option<Url>,
}

pub static TESTNET: Lazy<NetworkConfig> = Lazy::new(|| NetworkConfig {
    name: "testnet".to_string(),
    genesis_hash: TESTNET_GENESIS_HASH.to_string(),
    json_rpc_url: Url::parse("https://json-rpc.testnet.concordium.com").expect("static url"),
    ccd_scan_base_url: Url::parse("https://testnet.ccdscan.io").ok(),
});

pub static MAINNET: Lazy<NetworkConfig> = Lazy::new(|| NetworkConfig {
    name: "mainnet".to_string(),
    genesis_hash: MAINNET_GENESIS_HASH.to_string(),
    json_rpc_url: Url::parse("https://json-rpc.mainnet.concordium.software").expect("static url"),
    ccd_scan_base_url: Url::parse("https://ccdscan.io").ok(),
});

impl NetworkConfig {
    pub fn by_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "testnet" => Ok(TESTNET.clone()),
            "mainnet" => Ok(MAINNET.clone()),
            other => Err(ClientError::Config(format!(
                "Unknown network {other:?} (expected testnet or mainnet)"
            ))),
        }
    }

    /// CCDScan link for an account, when the network has an explorer.
    #[must_use]
    pub fn account_explorer_url(&self, account: &str) -> Option<Url> {
        let base = self.ccd_scan_base_url.as_ref()?;
        let mut url = base.clone();
        url.set_query(Some(&format!("dcount=1&dentity=account&daddress={account}")));
        Some(url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub connector: ConnectorType,
    pub contract_index: String,
    pub wallet_bridge_url: Url,
    pub rpc_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let network_name = env::var("DONATION_NETWORK").unwrap_or_else(|_| "testnet".to_string());
        let mut network = NetworkConfig::by_name(&network_name)?;

        if let Ok(rpc_url) = env::var("DONATION_JSON_RPC_URL") {
            network.json_rpc_url = Url::parse(&rpc_url)
                .map_err(|e| ClientError::Config(format!("Invalid DONATION_JSON_RPC_URL: {e}")))?;
        }

        let connector = match env::var("DONATION_CONNECTOR") {
            Ok(value) => value.parse()?,
            Err(_) => ConnectorType::BrowserWallet,
        };

        let wallet_bridge_url = env::var("DONATION_WALLET_BRIDGE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:9090".to_string());
        let wallet_bridge_url = Url::parse(&wallet_bridge_url)
            .map_err(|e| ClientError::Config(format!("Invalid DONATION_WALLET_BRIDGE_URL: {e}")))?;

        let rpc_timeout_seconds = match env::var("DONATION_RPC_TIMEOUT_SECONDS") {
            Ok(value) => value.trim().parse().map_err(|e| {
                ClientError::Config(format!("Invalid DONATION_RPC_TIMEOUT_SECONDS {value:?}: {e}"))
            })?,
            Err(_) => 30,
        };

        let config = Self {
            network,
            connector,
            contract_index: env::var("DONATION_CONTRACT_INDEX")
                .unwrap_or_else(|_| DONATION_CONTRACT_INDEX.to_string()),
            wallet_bridge_url,
            rpc_timeout_seconds,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.network.genesis_hash.len() != 64
            || !self.network.genesis_hash.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(ClientError::Config(format!(
                "Genesis hash for {} must be 64 hex characters",
                self.network.name
            )));
        }

        if self.contract_index.trim().parse::<u64>().is_err() {
            return Err(ClientError::InvalidContractIndex(self.contract_index.clone()));
        }

        if self.rpc_timeout_seconds == 0 {
            return Err(ClientError::Config(
                "RPC timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: TESTNET.clone(),
            connector: ConnectorType::BrowserWallet,
            contract_index: DONATION_CONTRACT_INDEX.to_string(),
            wallet_bridge_url: Url::parse("http://127.0.0.1:9090").expect("static url"),
            rpc_timeout_seconds: 30,
        }
    }
}
