//! Utilities for the deploy scripts.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use alloy::{
    network::{Ethereum, EthereumWallet, ReceiptResponse, TransactionBuilder},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    constants::{
        ARTIFACT_EXTENSION, DEPLOYMENTS_KEY, NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT,
        RECEIPT_POLL_ATTEMPTS, RECEIPT_POLL_INTERVAL_MS,
    },
    errors::ScriptError,
    solidity::initRiverV1Call,
    types::{Artifact, NamedAccounts, RawArtifact, RiverInitParams},
};

/// The client type used to send transactions
pub type Client = DynProvider<Ethereum>;

/// Parse the deployer's private key into a local signer
pub fn parse_signer(priv_key: &str) -> Result<PrivateKeySigner, ScriptError> {
    PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}

/// Sets up the client with which to send transactions, signing with the given signer
pub async fn setup_client(signer: PrivateKeySigner, rpc_url: &str) -> Result<Client, ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(url);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    debug!("Connected to chain {chain_id} at {rpc_url}");

    Ok(DynProvider::new(provider))
}

// ---------------
// | Deployments |
// ---------------

/// Read & parse the JSON contents of the given file
pub fn get_json_from_file(file_path: &Path) -> Result<Value, ScriptError> {
    let file_contents = fs::read_to_string(file_path).map_err(|e| {
        ScriptError::ReadDeployments(format!("{}: {}", file_path.display(), e))
    })?;

    serde_json::from_str(&file_contents)
        .map_err(|e| ScriptError::ReadDeployments(format!("{}: {}", file_path.display(), e)))
}

/// Read the address recorded for `contract_key` in the deployments file,
/// exactly as it is written there
pub fn read_deployment(file_path: &Path, contract_key: &str) -> Result<String, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    parsed_json[DEPLOYMENTS_KEY][contract_key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            ScriptError::ReadDeployments(format!(
                "no address for {contract_key} in {}",
                file_path.display()
            ))
        })
}

/// Read & parse the address recorded for `contract_key` in the deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &Path,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let address = read_deployment(file_path, contract_key)?;
    Address::from_str(&address).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Look up the address recorded for `contract_key`, returning `None`
/// if neither the deployments file nor the key exists
pub fn find_deployment(
    file_path: &Path,
    contract_key: &str,
) -> Result<Option<Address>, ScriptError> {
    if !file_path.exists() {
        return Ok(None);
    }

    let parsed_json = get_json_from_file(file_path)?;
    match parsed_json[DEPLOYMENTS_KEY][contract_key].as_str() {
        Some(address) => Address::from_str(address)
            .map(Some)
            .map_err(|e| ScriptError::ReadDeployments(e.to_string())),
        None => Ok(None),
    }
}

/// Record `address` under `contract_key` in the deployments file,
/// creating the file if it doesn't exist
pub fn write_deployed_address(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut parsed_json = if file_path.exists() {
        get_json_from_file(file_path)?
    } else {
        Value::Object(Map::new())
    };

    let root = parsed_json.as_object_mut().ok_or_else(|| {
        ScriptError::WriteDeployments(format!("{} is not a JSON object", file_path.display()))
    })?;
    let deployments = root
        .entry(DEPLOYMENTS_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| {
            ScriptError::WriteDeployments(format!("`{DEPLOYMENTS_KEY}` is not a JSON object"))
        })?;
    deployments.insert(
        contract_key.to_string(),
        Value::String(format!("{address:#x}")),
    );

    let contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

    debug!("Recorded {contract_key} at {address:#x} in {}", file_path.display());
    Ok(())
}

// ----------
// | Config |
// ----------

/// Read the named accounts from the given JSON file
pub fn read_named_accounts(file_path: &Path) -> Result<NamedAccounts, ScriptError> {
    let contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadAccounts(format!("{}: {}", file_path.display(), e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ReadAccounts(format!("{}: {}", file_path.display(), e)))
}

/// Ensure the signer is the deployer pinned in the named accounts, if any
pub fn check_deployer(accounts: &NamedAccounts, signer: Address) -> Result<(), ScriptError> {
    match accounts.deployer {
        Some(deployer) if deployer != signer => Err(ScriptError::DeployerMismatch(format!(
            "named deployer is {deployer:#x} but transactions are signed by {signer:#x}"
        ))),
        _ => Ok(()),
    }
}

/// Get the path of the artifact for `contract_name` in `artifacts_dir`
pub fn artifact_path(artifacts_dir: &Path, contract_name: &str) -> PathBuf {
    artifacts_dir.join(contract_name).with_extension(ARTIFACT_EXTENSION)
}

/// Load the compilation artifact for `contract_name` from `artifacts_dir`
pub fn load_artifact(artifacts_dir: &Path, contract_name: &str) -> Result<Artifact, ScriptError> {
    let path = artifact_path(artifacts_dir, contract_name);
    let contents = fs::read_to_string(&path)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

    let raw: RawArtifact = serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

    let bytecode = Bytes::from(raw.bytecode);
    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "{} has no creation bytecode",
            path.display()
        )));
    }

    Ok(Artifact {
        contract_name: raw.contract_name.unwrap_or_else(|| contract_name.to_string()),
        bytecode,
        deployed_bytecode: raw.deployed_bytecode.map(Bytes::from).unwrap_or_default(),
    })
}

// ------------
// | Calldata |
// ------------

/// Prepare calldata for the River contract's `initRiverV1` method
pub fn river_initialize_calldata(params: &RiverInitParams) -> Vec<u8> {
    initRiverV1Call::new((
        params.deposit_contract,
        params.withdrawal_credentials,
        params.system_administrator,
        params.allowlist_administrator,
        params.treasury,
        params.global_fee,
        params.operator_rewards_share,
    ))
    .abi_encode()
}

// ----------------
// | Transactions |
// ----------------

/// Deploy the given creation code (constructor arguments included),
/// returning the address of the new contract
pub async fn deploy_bytecode(client: &Client, code: Bytes) -> Result<Address, ScriptError> {
    let tx = TransactionRequest::default().with_deploy_code(code);

    let receipt = send_tx(client, tx).await.map_err(ScriptError::ContractDeployment)?;
    ensure_success(&receipt).map_err(ScriptError::ContractDeployment)?;

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "no contract address in receipt of {:#x}",
            receipt.transaction_hash
        ))
    })
}

/// Send a transaction and poll for its receipt
pub async fn send_tx(
    client: &Client,
    tx: TransactionRequest,
) -> Result<TransactionReceipt, String> {
    let pending_tx = client.send_transaction(tx).await.map_err(|e| e.to_string())?;
    let tx_hash = *pending_tx.tx_hash();
    debug!("Sent transaction {tx_hash:#x}");

    // Watching the pending transaction stalls on some nodes, poll for the receipt instead
    for _ in 0..RECEIPT_POLL_ATTEMPTS {
        if let Some(receipt) =
            client.get_transaction_receipt(tx_hash).await.map_err(|e| e.to_string())?
        {
            return Ok(receipt);
        }
        tokio::time::sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await;
    }

    Err(format!("no receipt for {tx_hash:#x} after {RECEIPT_POLL_ATTEMPTS} attempts"))
}

/// Check that the transaction behind `receipt` did not revert
pub fn ensure_success(receipt: &TransactionReceipt) -> Result<(), String> {
    if receipt.status() {
        Ok(())
    } else {
        Err(format!("transaction {:#x} reverted", receipt.transaction_hash))
    }
}

/// Read an address stored in the given storage slot of `contract`
pub async fn read_address_slot(
    client: &Client,
    contract: Address,
    slot: &str,
) -> Result<Address, ScriptError> {
    let slot = U256::from_str(slot)
        .map_err(|e| ScriptError::ContractInteraction(format!("storage slot {slot}: {e}")))?;

    let value = client
        .get_storage_at(contract, slot)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(Address::from_slice(
        &B256::from(value)[NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..NUM_BYTES_STORAGE_SLOT],
    ))
}

/// Fetch the runtime code deployed at `address`
pub async fn get_code(client: &Client, address: Address) -> Result<Bytes, ScriptError> {
    client
        .get_code_at(address)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, b256};
    use tempfile::tempdir;

    use super::*;
    use crate::constants::{DEFAULT_GLOBAL_FEE, DEFAULT_OPERATOR_REWARDS_SHARE};

    /// A named accounts file with every role filled in
    const ACCOUNTS_JSON: &str = r#"{
        "depositContract": "0x00000000219ab540356cbb839cbe05303d7705fa",
        "proxyAdministrator": "0x1111111111111111111111111111111111111111",
        "systemAdministrator": "0x2222222222222222222222222222222222222222",
        "treasury": "0x3333333333333333333333333333333333333333"
    }"#;

    #[test]
    fn test_write_then_read_deployments() -> eyre::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deployments.json");
        let withdraw = address!("1234567890123456789012345678901234567890");
        let river = address!("abcdefabcdefabcdefabcdefabcdefabcdefabcd");

        assert_eq!(find_deployment(&path, "WithdrawV1")?, None);

        write_deployed_address(&path, "WithdrawV1", withdraw)?;
        write_deployed_address(&path, "RiverV1", river)?;

        assert_eq!(
            read_deployment(&path, "WithdrawV1")?,
            "0x1234567890123456789012345678901234567890"
        );
        assert_eq!(parse_addr_from_deployments_file(&path, "RiverV1")?, river);
        assert_eq!(find_deployment(&path, "WithdrawV1")?, Some(withdraw));
        assert_eq!(find_deployment(&path, "OracleV1")?, None);
        Ok(())
    }

    #[test]
    fn test_read_deployment_verbatim() -> eyre::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deployments.json");
        fs::write(
            &path,
            r#"{ "deployments": { "WithdrawV1": "0xAbC1230000000000000000000000000000000099" } }"#,
        )?;

        assert_eq!(
            read_deployment(&path, "WithdrawV1")?,
            "0xAbC1230000000000000000000000000000000099"
        );
        Ok(())
    }

    #[test]
    fn test_read_missing_deployment() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");

        assert!(matches!(
            read_deployment(&path, "WithdrawV1"),
            Err(ScriptError::ReadDeployments(_))
        ));

        fs::write(&path, r#"{ "deployments": {} }"#).unwrap();
        assert!(matches!(
            read_deployment(&path, "WithdrawV1"),
            Err(ScriptError::ReadDeployments(_))
        ));
    }

    #[test]
    fn test_read_named_accounts() -> eyre::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("accounts.json");
        fs::write(&path, ACCOUNTS_JSON)?;

        let accounts = read_named_accounts(&path)?;
        assert_eq!(accounts.deployer, None);
        assert_eq!(
            accounts.deposit_contract,
            address!("00000000219ab540356cbb839cbe05303d7705fa")
        );
        assert_eq!(
            accounts.proxy_administrator,
            address!("1111111111111111111111111111111111111111")
        );
        assert_eq!(accounts.treasury, address!("3333333333333333333333333333333333333333"));
        Ok(())
    }

    #[test]
    fn test_named_accounts_missing_role() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        fs::write(&path, r#"{ "depositContract": "0x00000000219ab540356cbb839cbe05303d7705fa" }"#)
            .unwrap();

        assert!(matches!(read_named_accounts(&path), Err(ScriptError::ReadAccounts(_))));
    }

    #[test]
    fn test_check_deployer() {
        let mut accounts: NamedAccounts = serde_json::from_str(ACCOUNTS_JSON).unwrap();
        let signer = address!("4444444444444444444444444444444444444444");

        assert!(check_deployer(&accounts, signer).is_ok());

        accounts.deployer = Some(signer);
        assert!(check_deployer(&accounts, signer).is_ok());

        accounts.deployer = Some(Address::ZERO);
        assert!(matches!(
            check_deployer(&accounts, signer),
            Err(ScriptError::DeployerMismatch(_))
        ));
    }

    #[test]
    fn test_load_hardhat_and_foundry_artifacts() -> eyre::Result<()> {
        let dir = tempdir()?;
        fs::write(
            artifact_path(dir.path(), "RiverV1"),
            r#"{ "contractName": "RiverV1", "abi": [], "bytecode": "0x6080", "deployedBytecode": "0x60aa" }"#,
        )?;
        fs::write(
            artifact_path(dir.path(), "TUPProxy"),
            r#"{ "abi": [], "bytecode": { "object": "0x6001" } }"#,
        )?;

        let river = load_artifact(dir.path(), "RiverV1")?;
        assert_eq!(river.contract_name, "RiverV1");
        assert_eq!(river.bytecode, Bytes::from(vec![0x60, 0x80]));
        assert_eq!(river.deployed_bytecode, Bytes::from(vec![0x60, 0xaa]));

        let proxy = load_artifact(dir.path(), "TUPProxy")?;
        assert_eq!(proxy.contract_name, "TUPProxy");
        assert_eq!(proxy.bytecode, Bytes::from(vec![0x60, 0x01]));
        assert!(proxy.deployed_bytecode.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_artifact_bytecode_rejected() {
        let dir = tempdir().unwrap();
        fs::write(artifact_path(dir.path(), "RiverV1"), r#"{ "bytecode": "0x" }"#).unwrap();

        assert!(matches!(
            load_artifact(dir.path(), "RiverV1"),
            Err(ScriptError::ArtifactParsing(_))
        ));
    }

    #[test]
    fn test_river_initialize_calldata() {
        let accounts: NamedAccounts = serde_json::from_str(ACCOUNTS_JSON).unwrap();
        let credentials =
            b256!("0100000000000000000000001234567890123456789012345678901234567890");
        let params = RiverInitParams::new(
            &accounts,
            credentials,
            DEFAULT_GLOBAL_FEE,
            DEFAULT_OPERATOR_REWARDS_SHARE,
        );

        let calldata = river_initialize_calldata(&params);
        assert_eq!(&calldata[..4], initRiverV1Call::SELECTOR.as_slice());

        let decoded = initRiverV1Call::abi_decode(&calldata, true).unwrap();
        assert_eq!(decoded.depositContractAddress, accounts.deposit_contract);
        assert_eq!(decoded.withdrawalCredentials, credentials);
        assert_eq!(decoded.systemAdministratorAddress, accounts.system_administrator);
        assert_eq!(decoded.allowlistAdminAddress, accounts.system_administrator);
        assert_eq!(decoded.treasuryAddress, accounts.treasury);
        assert_eq!(decoded.globalFee, U256::from(500));
        assert_eq!(decoded.operatorRewardsShare, U256::from(50_000));
    }
}
