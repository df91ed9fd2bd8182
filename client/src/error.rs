use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connector error: {0}")]
    Connector(String),

    #[error("Connect error: {0}")]
    Connect(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid contract index: {0}")]
    InvalidContractIndex(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Contract not found: {0}")]
    ContractNotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("Transaction rejected: {0}")]
    TransactionRejected(String),

    #[error("Wallet bridge returned {status_code}: {message}")]
    Bridge { status_code: u16, message: String },
}
