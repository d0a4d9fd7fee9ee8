//! Implementations of the various deploy scripts

use std::path::Path;

use alloy_primitives::Bytes;
use tracing::info;

use crate::{
    cli::{DeployRiverArgs, WithdrawalCredentialsArgs},
    constants::{PROXY_CONTRACT_NAME, RIVER_CONTRACT_NAME, WITHDRAW_CONTRACT_NAME},
    errors::ScriptError,
    proxy::{deploy_or_upgrade, ProxyConfig},
    types::RiverInitParams,
    utils::{
        check_deployer, load_artifact, parse_signer, read_deployment, read_named_accounts,
        river_initialize_calldata, setup_client,
    },
    withdrawal_credentials::{build_withdrawal_credentials, withdrawal_credentials_word},
};

/// Deploy River behind a `TUPProxy` owned by the proxy administrator,
/// initializing it with withdrawal credentials pointing at `WithdrawV1`
pub async fn deploy_river(
    args: DeployRiverArgs,
    deployments_path: &Path,
) -> Result<(), ScriptError> {
    info!("=== deploy-river START");

    let accounts = read_named_accounts(&args.accounts)?;
    let signer = parse_signer(&args.rpc.priv_key)?;
    let deployer = signer.address();
    check_deployer(&accounts, deployer)?;

    // Derive the credentials before anything is sent, a malformed address aborts the deployment
    let withdraw_address = read_deployment(deployments_path, WITHDRAW_CONTRACT_NAME)?;
    let withdrawal_credentials = withdrawal_credentials_word(&withdraw_address)?;
    info!("Withdrawal credentials: {withdrawal_credentials:#x}");

    let init_params = RiverInitParams::new(
        &accounts,
        withdrawal_credentials,
        args.global_fee,
        args.operator_rewards_share,
    );
    let init_calldata = Bytes::from(river_initialize_calldata(&init_params));

    let river_artifact = load_artifact(&args.artifacts_dir, RIVER_CONTRACT_NAME)?;
    let proxy_artifact = load_artifact(&args.artifacts_dir, PROXY_CONTRACT_NAME)?;

    let client = setup_client(signer, &args.rpc.rpc_url).await?;
    info!("Deploying {RIVER_CONTRACT_NAME} from {deployer:#x}");

    let deployment = deploy_or_upgrade(
        &client,
        deployer,
        RIVER_CONTRACT_NAME,
        &river_artifact,
        ProxyConfig {
            proxy_artifact: &proxy_artifact,
            owner: accounts.proxy_administrator,
            init_calldata,
        },
        deployments_path,
    )
    .await?;

    info!(
        "{RIVER_CONTRACT_NAME} {}: proxy at {:#x}, implementation at {:#x}, proxy admin {:#x}",
        deployment.outcome, deployment.proxy, deployment.implementation, deployment.admin
    );
    info!("=== deploy-river END");

    Ok(())
}

/// Print the withdrawal credentials pointing at the given address,
/// or at the given deployment's address
pub fn print_withdrawal_credentials(
    args: WithdrawalCredentialsArgs,
    deployments_path: &Path,
) -> Result<(), ScriptError> {
    let address = match args.address {
        Some(address) => address,
        None => read_deployment(deployments_path, &args.deployment)?,
    };

    let withdrawal_credentials = build_withdrawal_credentials(&address)?;
    println!("{withdrawal_credentials}");

    Ok(())
}
