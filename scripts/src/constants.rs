//! Constants used in the deploy scripts

/// The prefix of a hex-encoded value
pub const HEX_PREFIX: &str = "0x";

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The withdrawal credentials version byte designating that the credentials
/// point to an execution-layer address.
///
/// See https://github.com/ethereum/consensus-specs/blob/dev/specs/phase0/validator.md#eth1_address_withdrawal_prefix
pub const ETH1_ADDRESS_WITHDRAWAL_PREFIX: &[u8] = &[0x01];

/// The number of zero bytes between the version byte and the address
/// in the withdrawal credentials
pub const WITHDRAWAL_CREDENTIALS_PADDING_BYTES: usize =
    NUM_BYTES_STORAGE_SLOT - ETH1_ADDRESS_WITHDRAWAL_PREFIX.len() - NUM_BYTES_ADDRESS;

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: &str =
    "0xb53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103";

/// The storage slot containing the implementation contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub const PROXY_IMPLEMENTATION_STORAGE_SLOT: &str =
    "0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc";

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The default path of the `deployments.json` file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The suffix appended to a contract name for its proxy entry in the deployments file
pub const PROXY_KEY_SUFFIX: &str = "_Proxy";

/// The suffix appended to a contract name for its implementation entry in the deployments file
pub const IMPLEMENTATION_KEY_SUFFIX: &str = "_Implementation";

/// The extension of a contract compilation artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The name of the River contract
pub const RIVER_CONTRACT_NAME: &str = "RiverV1";

/// The name of the withdrawal contract whose address backs the withdrawal credentials
pub const WITHDRAW_CONTRACT_NAME: &str = "WithdrawV1";

/// The name of the transparent upgradeable proxy contract wrapping River
pub const PROXY_CONTRACT_NAME: &str = "TUPProxy";

/// The default global fee passed to `initRiverV1`, in basis points
pub const DEFAULT_GLOBAL_FEE: u64 = 500;

/// The default operator rewards share passed to `initRiverV1`
pub const DEFAULT_OPERATOR_REWARDS_SHARE: u64 = 50_000;

/// The number of times a transaction receipt is polled for before giving up
pub const RECEIPT_POLL_ATTEMPTS: usize = 120;

/// The delay between two polls for a transaction receipt, in milliseconds
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 1_000;
