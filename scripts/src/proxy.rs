//! Deploy-or-upgrade of a contract behind a transparent upgradeable proxy.
//!
//! The proxy is a [`TransparentUpgradeableProxy`](https://docs.openzeppelin.com/contracts/4.x/api/proxy#TransparentUpgradeableProxy)
//! constructed as `(implementation, admin, initialization calldata)`.
//! Calls made directly to the proxy are forwarded to the implementation,
//! except those made by the admin, which is the only account allowed to upgrade it.
//!
//! Addresses are recorded in the deployments file under `<Name>` (the proxy),
//! `<Name>_Proxy` and `<Name>_Implementation`.

use std::path::Path;

use alloy_primitives::{hex, Address, Bytes};
use alloy_sol_types::{SolCall, SolValue};
use tracing::{info, warn};

use crate::{
    constants::{
        IMPLEMENTATION_KEY_SUFFIX, PROXY_ADMIN_STORAGE_SLOT, PROXY_IMPLEMENTATION_STORAGE_SLOT,
        PROXY_KEY_SUFFIX,
    },
    errors::ScriptError,
    solidity::ITUPProxy,
    types::{Artifact, DeploymentOutcome, ProxyDeployment},
    utils::{
        deploy_bytecode, ensure_success, find_deployment, get_code, read_address_slot, send_tx,
        write_deployed_address, Client,
    },
};

/// The proxy configuration of a deploy-or-upgrade
pub struct ProxyConfig<'a> {
    /// The compiled proxy contract
    pub proxy_artifact: &'a Artifact,
    /// The admin of the proxy
    pub owner: Address,
    /// The calldata the proxy calls the implementation with upon construction
    pub init_calldata: Bytes,
}

/// Deploy `implementation` behind a proxy, or upgrade the proxy recorded
/// for `name` if it points at different code.
///
/// Initialization is only executed when the proxy is first deployed.
pub async fn deploy_or_upgrade(
    client: &Client,
    signer: Address,
    name: &str,
    implementation: &Artifact,
    proxy_config: ProxyConfig<'_>,
    deployments_path: &Path,
) -> Result<ProxyDeployment, ScriptError> {
    let implementation_key = format!("{name}{IMPLEMENTATION_KEY_SUFFIX}");
    let proxy_key = format!("{name}{PROXY_KEY_SUFFIX}");

    let implementation_address =
        deploy_implementation(client, &implementation_key, implementation, deployments_path)
            .await?;

    let Some(proxy_address) = find_deployment(deployments_path, &proxy_key)? else {
        let proxy_address =
            deploy_proxy(client, implementation_address, proxy_config).await?;
        write_deployed_address(deployments_path, &proxy_key, proxy_address)?;
        write_deployed_address(deployments_path, name, proxy_address)?;

        let admin = read_address_slot(client, proxy_address, PROXY_ADMIN_STORAGE_SLOT).await?;
        info!("{name} proxy deployed at {proxy_address:#x}, administered by {admin:#x}");

        return Ok(ProxyDeployment {
            proxy: proxy_address,
            implementation: implementation_address,
            admin,
            outcome: DeploymentOutcome::Deployed,
        });
    };

    let admin = read_address_slot(client, proxy_address, PROXY_ADMIN_STORAGE_SLOT).await?;
    if admin != proxy_config.owner {
        warn!(
            "{name} proxy at {proxy_address:#x} is administered by {admin:#x}, not the configured owner {:#x}",
            proxy_config.owner
        );
    }

    let current_implementation =
        read_address_slot(client, proxy_address, PROXY_IMPLEMENTATION_STORAGE_SLOT).await?;
    let outcome = if current_implementation == implementation_address {
        info!("{name} proxy at {proxy_address:#x} is up to date");
        DeploymentOutcome::Unchanged
    } else {
        upgrade_proxy(client, signer, admin, proxy_address, implementation_address).await?;
        info!(
            "{name} proxy at {proxy_address:#x} upgraded from {current_implementation:#x} to {implementation_address:#x}"
        );
        DeploymentOutcome::Upgraded
    };

    write_deployed_address(deployments_path, name, proxy_address)?;

    Ok(ProxyDeployment {
        proxy: proxy_address,
        implementation: implementation_address,
        admin,
        outcome,
    })
}

/// Deploy the implementation contract, reusing the recorded deployment
/// if its on-chain code matches the artifact
async fn deploy_implementation(
    client: &Client,
    implementation_key: &str,
    implementation: &Artifact,
    deployments_path: &Path,
) -> Result<Address, ScriptError> {
    if let Some(recorded) = find_deployment(deployments_path, implementation_key)? {
        let code = get_code(client, recorded).await?;
        if !code.is_empty() && code == implementation.deployed_bytecode {
            info!(
                "Reusing {} implementation at {recorded:#x}",
                implementation.contract_name
            );
            return Ok(recorded);
        }
    }

    let address = deploy_bytecode(client, implementation.bytecode.clone()).await?;
    info!(
        "{} implementation deployed at {address:#x}",
        implementation.contract_name
    );
    write_deployed_address(deployments_path, implementation_key, address)?;

    Ok(address)
}

/// Deploy the proxy pointing at `implementation`, initializing it in the same transaction
async fn deploy_proxy(
    client: &Client,
    implementation: Address,
    proxy_config: ProxyConfig<'_>,
) -> Result<Address, ScriptError> {
    let code = proxy_creation_code(
        proxy_config.proxy_artifact,
        implementation,
        proxy_config.owner,
        proxy_config.init_calldata,
    );

    deploy_bytecode(client, code).await
}

/// Append the ABI-encoded proxy constructor arguments to the proxy's creation bytecode
pub fn proxy_creation_code(
    proxy_artifact: &Artifact,
    implementation: Address,
    owner: Address,
    init_calldata: Bytes,
) -> Bytes {
    let constructor_args = (implementation, owner, init_calldata).abi_encode_params();
    [proxy_artifact.bytecode.as_ref(), constructor_args.as_slice()]
        .concat()
        .into()
}

/// Point the proxy at a new implementation.
///
/// Only the proxy admin may do so; if the signer is not the admin the
/// calldata the admin has to send is returned in the error.
async fn upgrade_proxy(
    client: &Client,
    signer: Address,
    admin: Address,
    proxy: Address,
    implementation: Address,
) -> Result<(), ScriptError> {
    if signer != admin {
        let calldata = ITUPProxy::upgradeToCall {
            newImplementation: implementation,
        }
        .abi_encode();

        return Err(ScriptError::UnauthorizedUpgrade(format!(
            "{signer:#x} cannot upgrade proxy {proxy:#x}, its admin {admin:#x} must send {}",
            hex::encode_prefixed(calldata)
        )));
    }

    let tx = ITUPProxy::new(proxy, client.clone())
        .upgradeTo(implementation)
        .into_transaction_request();
    let receipt = send_tx(client, tx)
        .await
        .map_err(ScriptError::ContractInteraction)?;

    ensure_success(&receipt).map_err(ScriptError::ContractInteraction)?;
    info!("Upgrade of {proxy:#x} sent in {:#x}", receipt.transaction_hash);

    Ok(())
}
