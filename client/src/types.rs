use crate::error::{ClientError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies a deployed contract instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractAddress {
    pub index: u64,
    pub subindex: u64,
}

impl ContractAddress {
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self { index, subindex: 0 }
    }
}

impl FromStr for ContractAddress {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(Self::new)
            .map_err(|e| ClientError::InvalidContractIndex(format!("{s:?}: {e}")))
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.index, self.subindex)
    }
}

/// Amount in micro CCD. Displays as `<n> μCCD`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CcdAmount {
    #[serde(rename = "microCcdAmount", deserialize_with = "micro_ccd_from_string_or_number")]
    pub micro_ccd: u64,
}

impl CcdAmount {
    #[must_use]
    pub const fn from_micro_ccd(micro_ccd: u64) -> Self {
        Self { micro_ccd }
    }

    /// Parses user input as a positive integer of μCCD.
    pub fn parse_positive(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let micro_ccd: u64 = trimmed
            .parse()
            .map_err(|_| ClientError::InvalidAmount(format!("{trimmed:?} is not a whole number of μCCD")))?;
        if micro_ccd == 0 {
            return Err(ClientError::InvalidAmount("amount must be greater than zero".to_string()));
        }
        Ok(Self { micro_ccd })
    }
}

impl fmt::Display for CcdAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} μCCD", self.micro_ccd)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHash(pub String);

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusStatus {
    pub genesis_block: String,
    #[serde(default)]
    pub last_finalized_block: Option<String>,
    #[serde(default)]
    pub best_block: Option<String>,
    #[serde(default)]
    pub protocol_version: Option<u64>,
}

/// Instance info as reported by the node.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    pub name: String,
    pub owner: AccountAddress,
    #[serde(deserialize_with = "micro_ccd_from_string_or_number")]
    pub amount: u64,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub source_module: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub address: AccountAddress,
}

/// Snapshot of the selected contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub name: String,
    pub index: u64,
    pub subindex: u64,
    pub owner: Owner,
    pub amount: CcdAmount,
    pub methods: Vec<String>,
    pub source_module: Option<String>,
}

impl ContractInfo {
    #[must_use]
    pub fn from_instance(address: ContractAddress, info: InstanceInfo) -> Self {
        let name = info
            .name
            .strip_prefix("init_")
            .unwrap_or(&info.name)
            .to_string();
        Self {
            name,
            index: address.index,
            subindex: address.subindex,
            owner: Owner { address: info.owner },
            amount: CcdAmount::from_micro_ccd(info.amount),
            methods: info.methods,
            source_module: info.source_module,
        }
    }

    #[must_use]
    pub const fn address(&self) -> ContractAddress {
        ContractAddress {
            index: self.index,
            subindex: self.subindex,
        }
    }

    /// Fully qualified receive name, e.g. `donation.give`.
    #[must_use]
    pub fn receive_name(&self, entrypoint: &str) -> String {
        format!("{}.{entrypoint}", self.name)
    }
}

/// Parameters for an `invokeContract` dry run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractContext {
    pub contract: ContractAddress,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoker: Option<AccountAddress>,
    pub amount: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum InvokeContractResult {
    #[serde(rename_all = "camelCase")]
    Success {
        #[serde(default)]
        return_value: Option<String>,
        used_energy: u64,
    },
    #[serde(rename_all = "camelCase")]
    Failure {
        reason: serde_json::Value,
        used_energy: u64,
    },
}

/// Payload of an update-contract transaction handed to the wallet for signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContractPayload {
    pub amount: CcdAmount,
    pub address: ContractAddress,
    pub receive_name: String,
    pub max_contract_execution_energy: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationState {
    Active,
    Closed,
}

impl fmt::Display for DonationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Closed => f.write_str("Closed"),
        }
    }
}

/// Return value of the donation contract's `view` entrypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationView {
    pub state: DonationState,
    pub balance: CcdAmount,
}

impl DonationView {
    /// Decodes the hex return value: one state tag byte, then a little-endian `u64` balance.
    pub fn decode_hex(return_value: &str) -> Result<Self> {
        let bytes = hex::decode(return_value)?;
        if bytes.len() != 9 {
            return Err(ClientError::Decode(format!(
                "expected 9 bytes in view return value, got {}",
                bytes.len()
            )));
        }
        let state = match bytes[0] {
            0 => DonationState::Active,
            1 => DonationState::Closed,
            tag => return Err(ClientError::Decode(format!("unknown donation state tag {tag}"))),
        };
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&bytes[1..9]);
        Ok(Self {
            state,
            balance: CcdAmount::from_micro_ccd(u64::from_le_bytes(amount)),
        })
    }
}

fn micro_ccd_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
