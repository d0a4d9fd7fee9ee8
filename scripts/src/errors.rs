//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Error reading the `deployments.json` file
    ReadDeployments(String),
    /// Error writing the `deployments.json` file
    WriteDeployments(String),
    /// Error reading the named accounts file
    ReadAccounts(String),
    /// Error parsing a contract compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// An address string is not a `0x`-prefixed, 40 hex character address
    InvalidAddressFormat(String),
    /// The configured deployer is not the account signing transactions
    DeployerMismatch(String),
    /// The proxy needs upgrading but the signer is not the proxy owner.
    /// Carries the calldata the owner must submit to the proxy.
    UnauthorizedUpgrade(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::ReadAccounts(s) => write!(f, "error reading named accounts: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::InvalidAddressFormat(s) => write!(f, "invalid address format: {}", s),
            ScriptError::DeployerMismatch(s) => write!(f, "deployer mismatch: {}", s),
            ScriptError::UnauthorizedUpgrade(s) => write!(f, "unauthorized upgrade: {}", s),
        }
    }
}

impl Error for ScriptError {}
