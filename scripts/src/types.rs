//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::Deserialize;

/// The role-labeled accounts a deployment is configured with
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedAccounts {
    /// The account expected to sign the deployment transactions, if pinned
    #[serde(default)]
    pub deployer: Option<Address>,
    /// The beacon chain deposit contract
    pub deposit_contract: Address,
    /// The owner of the River proxy, the only account allowed to upgrade it
    pub proxy_administrator: Address,
    /// The administrator of the River system & its allowlist
    pub system_administrator: Address,
    /// The recipient of the protocol fees
    pub treasury: Address,
}

/// The ordered arguments of River's `initRiverV1` method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiverInitParams {
    /// The beacon chain deposit contract
    pub deposit_contract: Address,
    /// The withdrawal credentials validators are funded with
    pub withdrawal_credentials: B256,
    /// The administrator of the River system
    pub system_administrator: Address,
    /// The administrator of the allowlist
    pub allowlist_administrator: Address,
    /// The recipient of the protocol fees
    pub treasury: Address,
    /// The global fee
    pub global_fee: U256,
    /// The share of the rewards going to the node operators
    pub operator_rewards_share: U256,
}

impl RiverInitParams {
    /// Assemble the initialization arguments from the named accounts.
    ///
    /// The system administrator also administers the allowlist.
    pub fn new(
        accounts: &NamedAccounts,
        withdrawal_credentials: B256,
        global_fee: u64,
        operator_rewards_share: u64,
    ) -> Self {
        Self {
            deposit_contract: accounts.deposit_contract,
            withdrawal_credentials,
            system_administrator: accounts.system_administrator,
            allowlist_administrator: accounts.system_administrator,
            treasury: accounts.treasury,
            global_fee: U256::from(global_fee),
            operator_rewards_share: U256::from(operator_rewards_share),
        }
    }
}

/// A compiled contract, as read from its artifact file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// The name of the contract
    pub contract_name: String,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
    /// The runtime bytecode, empty if the artifact does not carry it
    pub deployed_bytecode: Bytes,
}

/// The bytecode field of an artifact, either a bare hex string (Hardhat)
/// or an object wrapping it (Foundry)
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ArtifactBytecode {
    /// A hex string
    Hex(Bytes),
    /// An object holding the hex string under `object`
    Object {
        /// The hex string
        object: Bytes,
    },
}

impl From<ArtifactBytecode> for Bytes {
    fn from(bytecode: ArtifactBytecode) -> Self {
        match bytecode {
            ArtifactBytecode::Hex(bytes) | ArtifactBytecode::Object { object: bytes } => bytes,
        }
    }
}

/// The subset of an artifact file the scripts read
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawArtifact {
    /// The name of the contract
    #[serde(default)]
    pub contract_name: Option<String>,
    /// The creation bytecode
    pub bytecode: ArtifactBytecode,
    /// The runtime bytecode
    #[serde(default)]
    pub deployed_bytecode: Option<ArtifactBytecode>,
}

/// What a deploy-or-upgrade did to the proxied contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentOutcome {
    /// A new proxy was deployed & initialized
    Deployed,
    /// An existing proxy was pointed at a new implementation
    Upgraded,
    /// The existing proxy already pointed at the implementation
    Unchanged,
}

impl Display for DeploymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentOutcome::Deployed => write!(f, "deployed"),
            DeploymentOutcome::Upgraded => write!(f, "upgraded"),
            DeploymentOutcome::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// The addresses making up a proxied contract after a deploy-or-upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyDeployment {
    /// The proxy, i.e. the address users interact with
    pub proxy: Address,
    /// The implementation the proxy delegates to
    pub implementation: Address,
    /// The proxy admin, as read from the proxy's storage
    pub admin: Address,
    /// What the deploy-or-upgrade did
    pub outcome: DeploymentOutcome,
}
